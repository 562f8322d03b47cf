use std::fmt;
use std::time::Duration;

use crate::Command;

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    Serial(serialport::Error),
    Timeout { command: Command, after: Duration },
    Cancelled(Command),
    Join(tokio::task::JoinError),
    InvalidQuery,
    UnknownCommand(String),
    UnknownSensor(String),
    UnknownReadingType(String),
}

impl Error {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serialport::Error> for Error {
    fn from(err: serialport::Error) -> Self {
        Self::Serial(err)
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Join(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "io error: {err}"),
            Self::Serial(err) => write!(f, "serial port error: {err}"),
            Self::Timeout { command, after } => {
                write!(f, "{command} timed out after {}ms", after.as_millis())
            }
            Self::Cancelled(command) => write!(f, "{command} was cancelled"),
            Self::Join(err) => write!(f, "exchange task failed: {err}"),
            Self::InvalidQuery => {
                write!(f, "invalid query: restrict by reading type or by sensor, not both")
            }
            Self::UnknownCommand(value) => write!(f, "unknown command {value}"),
            Self::UnknownSensor(value) => write!(
                f,
                "invalid sensor {value}, expected one of am2320, ds18x20, lux"
            ),
            Self::UnknownReadingType(value) => write!(
                f,
                "invalid reading type {value}, expected one of temperature/temp, humidity/hum, lux"
            ),
        }
    }
}

impl std::error::Error for Error {}
