mod config;
pub use config::Config;

mod error;
pub use error::Error;

mod gate;
pub use gate::{should_submit, SubmissionGate};

mod poller;
pub use poller::{PollSummary, Poller};

mod reading;
pub use reading::{aggregate, is_valid, AggregatedReading, Reading};

pub type Result<T> = std::result::Result<T, Error>;
