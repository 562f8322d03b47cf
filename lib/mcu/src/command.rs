use std::fmt;
use std::str::FromStr;

use crate::{Error, Result, SensorKind};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    Am2320Temperature,
    Am2320Humidity,
    Ds18x20Temperature,
    Lux,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Sensor {
    Am2320,
    Ds18x20,
    Lux,
}

impl Command {
    /// Every command the module understands, in poll order.
    pub const ALL: [Command; 4] = [
        Self::Am2320Temperature,
        Self::Am2320Humidity,
        Self::Ds18x20Temperature,
        Self::Lux,
    ];

    pub const fn token(self) -> &'static str {
        match self {
            Self::Am2320Temperature => "am2320_temp",
            Self::Am2320Humidity => "am2320_humidity",
            Self::Ds18x20Temperature => "ds18x20_temp",
            Self::Lux => "lux",
        }
    }

    pub const fn kind(self) -> SensorKind {
        match self {
            Self::Am2320Temperature | Self::Ds18x20Temperature => SensorKind::Temperature,
            Self::Am2320Humidity => SensorKind::Humidity,
            Self::Lux => SensorKind::Lux,
        }
    }

    pub const fn sensor(self) -> Sensor {
        match self {
            Self::Am2320Temperature | Self::Am2320Humidity => Sensor::Am2320,
            Self::Ds18x20Temperature => Sensor::Ds18x20,
            Self::Lux => Sensor::Lux,
        }
    }

    /// Bytes written to the link: the token followed by a carriage return.
    pub fn wire_bytes(self) -> Vec<u8> {
        let mut bytes = self.token().as_bytes().to_vec();
        bytes.push(b'\r');
        bytes
    }

    pub fn select(reading_type: Option<SensorKind>, sensor: Option<Sensor>) -> Result<Vec<Self>> {
        let commands = match (reading_type, sensor) {
            (None, None) => Self::ALL.to_vec(),
            (Some(kind), None) => Self::ALL
                .into_iter()
                .filter(|command| command.kind() == kind)
                .collect(),
            (None, Some(sensor)) => Self::ALL
                .into_iter()
                .filter(|command| command.sensor() == sensor)
                .collect(),
            (Some(_), Some(_)) => return Err(Error::InvalidQuery),
        };

        Ok(commands)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Command {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|command| command.token() == s)
            .ok_or_else(|| Error::UnknownCommand(s.to_string()))
    }
}

impl fmt::Display for Sensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Am2320 => "am2320",
            Self::Ds18x20 => "ds18x20",
            Self::Lux => "lux",
        })
    }
}

impl FromStr for Sensor {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "am2320" => Ok(Self::Am2320),
            "ds18x20" => Ok(Self::Ds18x20),
            "lux" => Ok(Self::Lux),
            _ => Err(Error::UnknownSensor(s.to_string())),
        }
    }
}
