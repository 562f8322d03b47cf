use std::time::Duration;

use collector::Submitter;
use log::{debug, error, info};
use mcu::{Command, CommandChannel, SensorKind, SerialLink, TimedCommand};

use crate::{aggregate, AggregatedReading, Config, Reading, Result, SubmissionGate};

#[derive(Debug, Default)]
pub struct PollSummary {
    pub readings: Vec<Reading>,
    pub aggregated: Vec<AggregatedReading>,
    pub submitted: Vec<SensorKind>,
    pub failed: Vec<SensorKind>,
}

/// One poll cycle: query every configured command in turn, reconcile the
/// readings per kind and hand the results to the gate.
pub struct Poller<L, S> {
    timed: TimedCommand<L>,
    gate: Option<SubmissionGate<S>>,
    commands: Vec<Command>,
    timeout: Duration,
    retries: u8,
}

impl<L: SerialLink, S: Submitter> Poller<L, S> {
    pub fn new(channel: CommandChannel<L>, submitter: S, config: &Config) -> Self {
        let gate = match (config.send, &config.sensor_name) {
            (true, Some(sensor_name)) => SubmissionGate::enabled(submitter, sensor_name.clone()),
            _ => SubmissionGate::disabled(submitter),
        };

        Self::with_gate(channel, Some(gate), config)
    }

    /// Poller over `link` with the default settle interval.
    pub fn from_link(link: L, submitter: S, config: &Config) -> Self {
        Self::new(CommandChannel::new(link), submitter, config)
    }

    /// Poller that never submits and needs no submitter at all.
    pub fn polling_only(channel: CommandChannel<L>, config: &Config) -> Self {
        Self::with_gate(channel, None, config)
    }

    fn with_gate(channel: CommandChannel<L>, gate: Option<SubmissionGate<S>>, config: &Config) -> Self {
        Self {
            timed: TimedCommand::new(channel),
            gate,
            commands: config.commands.clone(),
            timeout: config.command_timeout,
            retries: config.retries,
        }
    }

    pub async fn run(&mut self) -> Result<PollSummary> {
        let readings = self.poll().await?;
        let aggregated = Self::reconcile(&readings);

        let mut summary = PollSummary {
            readings,
            aggregated,
            ..Default::default()
        };

        let Some(gate) = &self.gate else {
            return Ok(summary);
        };

        for kind in SensorKind::ALL {
            let aggregated = summary.aggregated.iter().find(|aggregated| aggregated.kind == kind);

            match gate.forward(aggregated).await {
                Some(Ok(())) => {
                    info!("submitted {kind}");
                    summary.submitted.push(kind);
                }
                Some(Err(err)) => {
                    error!("unable to submit {kind}: {err}");
                    summary.failed.push(kind);
                }
                None => (),
            }
        }

        Ok(summary)
    }

    /// Commands run strictly one after another; only I/O failures abort.
    pub async fn poll(&mut self) -> Result<Vec<Reading>> {
        let mut readings = Vec::with_capacity(self.commands.len());

        for command in self.commands.clone() {
            if let Some(reading) = self.read(command).await? {
                readings.push(reading);
            }
        }

        Ok(readings)
    }

    pub fn reconcile(readings: &[Reading]) -> Vec<AggregatedReading> {
        SensorKind::ALL
            .into_iter()
            .filter_map(|kind| aggregate(readings, kind))
            .inspect(|aggregated| {
                debug!(
                    "{} {} from {} source(s)",
                    aggregated.kind, aggregated.value, aggregated.sources
                )
            })
            .collect()
    }

    async fn read(&mut self, command: Command) -> Result<Option<Reading>> {
        let mut attempt = 0;

        let response = loop {
            match self.timed.send_with_deadline(command, self.timeout).await {
                Ok(response) => break response,
                Err(err) if err.is_timeout() && attempt < self.retries => {
                    attempt += 1;
                    debug!("{err}, retrying ({attempt}/{})", self.retries);
                }
                Err(err) if err.is_timeout() => {
                    debug!("{err}, skipping");
                    return Ok(None);
                }
                Err(err) => return Err(err.into()),
            }
        };

        let value = match mcu::parse(&response) {
            Ok(value) => value,
            Err(err) => {
                debug!("{command} answered {response:?}: {err}");
                return Ok(None);
            }
        };

        let reading = Reading::new(command, value);

        if reading.is_valid() {
            info!("{command}: {value}");
        } else {
            debug!("{command}: {value} is out of range for {}", reading.kind);
        }

        Ok(Some(reading))
    }
}
