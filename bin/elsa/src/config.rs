use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use collector::HttpSubmitter;
use mcu::{Command, Sensor, SensorKind};

use crate::{Error, Result};

const DEFAULT_PORT: &str = "/dev/ttyACM0";
const DEFAULT_BAUD_RATE: u32 = 115_200;
const DEFAULT_ENDPOINT: &str = "http://localhost:3000/readings";

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub port: PathBuf,
    pub baud_rate: u32,
    pub endpoint: String,
    pub sensor_name: Option<String>,
    pub send: bool,
    pub verbose: bool,
    pub command_timeout: Duration,
    pub retries: u8,
    pub commands: Vec<Command>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: PathBuf::from(DEFAULT_PORT),
            baud_rate: DEFAULT_BAUD_RATE,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            sensor_name: None,
            send: false,
            verbose: false,
            command_timeout: mcu::DEFAULT_TIMEOUT,
            retries: 0,
            commands: Command::ALL.to_vec(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let reading_type = parse_var::<SensorKind>(&var, "READING_TYPE")?;
        let sensor = parse_var::<Sensor>(&var, "SENSOR")?;

        let config = Self {
            port: var("SERIAL_PORT").map_or(defaults.port, PathBuf::from),
            baud_rate: parse_var(&var, "SERIAL_BAUD_RATE")?.unwrap_or(defaults.baud_rate),
            endpoint: var("COLLECTOR_ENDPOINT").unwrap_or(defaults.endpoint),
            sensor_name: var("SENSOR_NAME").filter(|name| !name.is_empty()),
            send: flag(&var, "SUBMIT")?,
            verbose: flag(&var, "VERBOSE")?,
            command_timeout: parse_var(&var, "COMMAND_TIMEOUT_SECS")?
                .map_or(defaults.command_timeout, Duration::from_secs),
            retries: parse_var(&var, "COMMAND_RETRIES")?.unwrap_or(defaults.retries),
            commands: Command::select(reading_type, sensor)?,
        };

        if config.send && config.sensor_name.is_none() {
            return Err(Error::MissingSensorName);
        }

        Ok(config)
    }

    /// Collector client, only built when readings are going to be sent.
    pub fn submitter(&self) -> Result<Option<HttpSubmitter>> {
        if !self.send {
            return Ok(None);
        }

        Ok(Some(HttpSubmitter::new(&self.endpoint)?))
    }

    pub fn check_port(&self) -> Result<()> {
        if self.port.exists() {
            Ok(())
        } else {
            Err(Error::PortNotFound(self.port.clone()))
        }
    }
}

fn parse_var<T: FromStr>(var: &impl Fn(&str) -> Option<String>, name: &'static str) -> Result<Option<T>> {
    match var(name) {
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| Error::InvalidVar { name, value }),
        None => Ok(None),
    }
}

fn flag(var: &impl Fn(&str) -> Option<String>, name: &'static str) -> Result<bool> {
    match var(name).as_deref() {
        None | Some("") | Some("0") | Some("false") | Some("no") => Ok(false),
        Some("1") | Some("true") | Some("yes") => Ok(true),
        Some(value) => Err(Error::InvalidVar {
            name,
            value: value.to_string(),
        }),
    }
}
