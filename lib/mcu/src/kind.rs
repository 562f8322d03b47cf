use std::fmt;
use std::str::FromStr;

use crate::Error;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SensorKind {
    Temperature,
    Humidity,
    Lux,
}

impl SensorKind {
    pub const ALL: [SensorKind; 3] = [Self::Temperature, Self::Humidity, Self::Lux];

    /// Exclusive plausibility bounds. Readings on or outside them are invalid.
    pub const fn range(self) -> (f64, f64) {
        match self {
            Self::Temperature => (0.0, 120.0),
            Self::Humidity => (0.0, 100.0),
            Self::Lux => (0.0, 65336.0),
        }
    }

    /// Reading type identifier understood by the collector.
    pub const fn code(self) -> u8 {
        match self {
            Self::Temperature => 1,
            Self::Humidity => 2,
            Self::Lux => 3,
        }
    }
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Temperature => "temperature",
            Self::Humidity => "humidity",
            Self::Lux => "lux",
        })
    }
}

impl FromStr for SensorKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "temperature" | "temp" => Ok(Self::Temperature),
            "humidity" | "hum" => Ok(Self::Humidity),
            "lux" => Ok(Self::Lux),
            _ => Err(Error::UnknownReadingType(s.to_string())),
        }
    }
}
