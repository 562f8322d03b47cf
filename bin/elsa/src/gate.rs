use collector::Submitter;
use log::debug;

use crate::AggregatedReading;

/// True only for a reading built from at least one valid source.
pub fn should_submit(aggregated: Option<&AggregatedReading>) -> bool {
    aggregated.map_or(false, |aggregated| aggregated.sources > 0)
}

/// Forwards aggregated readings to the collector when sending is enabled.
pub struct SubmissionGate<S> {
    submitter: S,
    sensor_name: Option<String>,
}

impl<S: Submitter> SubmissionGate<S> {
    pub fn enabled(submitter: S, sensor_name: String) -> Self {
        Self {
            submitter,
            sensor_name: Some(sensor_name),
        }
    }

    pub fn disabled(submitter: S) -> Self {
        Self {
            submitter,
            sensor_name: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.sensor_name.is_some()
    }

    pub async fn submit(&self, aggregated: &AggregatedReading, sensor_name: &str) -> collector::Result<()> {
        self.submitter
            .submit(sensor_name, aggregated.kind, aggregated.value)
            .await
    }

    /// `None` when nothing was handed to the submitter.
    pub async fn forward(&self, aggregated: Option<&AggregatedReading>) -> Option<collector::Result<()>> {
        let sensor_name = self.sensor_name.as_deref()?;

        let Some(aggregated) = aggregated.filter(|aggregated| should_submit(Some(*aggregated))) else {
            debug!("nothing to submit");
            return None;
        };

        Some(self.submit(aggregated, sensor_name).await)
    }
}
