mod error;
pub use error::Error;

mod request;
pub use request::{CreateReading, ReadingType};

mod submitter;
pub use submitter::{HttpSubmitter, Submitter};

pub type Result<T> = std::result::Result<T, Error>;
