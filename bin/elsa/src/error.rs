use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum Error {
    Mcu(mcu::Error),
    Collector(collector::Error),
    MissingSensorName,
    PortNotFound(PathBuf),
    InvalidVar { name: &'static str, value: String },
}

impl From<mcu::Error> for Error {
    fn from(err: mcu::Error) -> Self {
        Self::Mcu(err)
    }
}

impl From<collector::Error> for Error {
    fn from(err: collector::Error) -> Self {
        Self::Collector(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mcu(err) => write!(f, "mcu error: {err}"),
            Self::Collector(err) => write!(f, "collector error: {err}"),
            Self::MissingSensorName => write!(f, "SENSOR_NAME is required when sending"),
            Self::PortNotFound(path) => write!(f, "{} does not exist", path.display()),
            Self::InvalidVar { name, value } => write!(f, "invalid value {value:?} for {name}"),
        }
    }
}

impl std::error::Error for Error {}
