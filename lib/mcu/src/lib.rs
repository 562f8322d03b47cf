mod channel;
mod command;
mod error;
mod kind;
mod link;
mod parser;
mod response;
mod timed;

#[cfg(any(test, feature = "stub"))]
mod stub;

pub use channel::{CommandChannel, SETTLE_INTERVAL};
pub use command::{Command, Sensor};
pub use error::Error;
pub use kind::SensorKind;
pub use link::{open, Port, SerialLink, READ_TIMEOUT};
pub use parser::{parse, ParseError};
pub use response::{RawResponse, RESPONSE_CAPACITY};
pub use timed::{TimedCommand, DEFAULT_TIMEOUT};

#[cfg(any(test, feature = "stub"))]
pub use stub::{Journal, StubLink, StubReply};

pub type Result<T> = std::result::Result<T, Error>;
