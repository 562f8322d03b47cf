use std::time::Duration;

use log::{debug, trace};
use tokio::task::{self, JoinHandle};
use tokio::time;
use tokio_util::sync::CancellationToken;

use crate::{Command, CommandChannel, Error, RawResponse, Result, SerialLink};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Runs [`CommandChannel`] exchanges under a deadline.
///
/// A timed out exchange is cancelled and kept as a receipt: the next command
/// is only issued once the abandoned one has let go of the link. Answers the
/// abandoned exchange never read are cleared from the link before the next
/// write.
pub struct TimedCommand<L> {
    channel: CommandChannel<L>,
    abandoned: Option<(Command, JoinHandle<Result<RawResponse>>)>,
}

impl<L: SerialLink> TimedCommand<L> {
    pub fn new(channel: CommandChannel<L>) -> Self {
        Self {
            channel,
            abandoned: None,
        }
    }

    pub async fn send_with_deadline(&mut self, command: Command, timeout: Duration) -> Result<RawResponse> {
        self.collect_abandoned().await;

        let token = CancellationToken::new();
        let mut exchange = {
            let channel = self.channel.clone();
            let token = token.clone();
            task::spawn(async move { channel.exchange(command, token).await })
        };

        tokio::select! {
            biased;

            result = &mut exchange => {
                result.unwrap_or_else(|err| Err(err.into()))
            }
            _ = time::sleep(timeout) => {
                debug!("{} timed out after {}ms", command, timeout.as_millis());

                token.cancel();
                self.abandoned = Some((command, exchange));

                Err(Error::Timeout { command, after: timeout })
            }
        }
    }

    async fn collect_abandoned(&mut self) {
        let (command, exchange) = match self.abandoned.take() {
            Some(abandoned) => abandoned,
            None => return,
        };

        trace!("waiting for abandoned {} to release the link", command);

        match exchange.await {
            Ok(Ok(response)) => trace!("discarding late answer to {}: {:?}", command, response),
            Ok(Err(err)) => trace!("abandoned {} ended with {}", command, err),
            Err(err) => trace!("abandoned {} task failed: {}", command, err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{StubLink, StubReply};

    const SETTLE: Duration = Duration::from_millis(10);

    fn timed(link: StubLink) -> TimedCommand<StubLink> {
        TimedCommand::new(CommandChannel::new(link).with_settle_interval(SETTLE))
    }

    #[test]
    fn test_silent_read_ends_before_deadline() {
        assert!(crate::SETTLE_INTERVAL + crate::READ_TIMEOUT < DEFAULT_TIMEOUT);
    }

    #[tokio::test]
    async fn test_answer_within_deadline() {
        let mut timed = timed(StubLink::new().reply(Command::Lux, StubReply::text("800.0")));

        let response = timed
            .send_with_deadline(Command::Lux, Duration::from_secs(1))
            .await
            .unwrap();

        assert_eq!(response.as_bytes(), b"800.0");
    }

    #[tokio::test]
    async fn test_slow_device_times_out() {
        let mut timed = timed(StubLink::new().reply(
            Command::Am2320Temperature,
            StubReply::delayed(Duration::from_millis(400), "72.4"),
        ));

        let err = timed
            .send_with_deadline(Command::Am2320Temperature, Duration::from_millis(100))
            .await
            .unwrap_err();

        assert!(err.is_timeout());
        assert!(matches!(
            err,
            Error::Timeout {
                command: Command::Am2320Temperature,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_io_error_is_not_a_timeout() {
        let mut timed = timed(StubLink::new().reply(Command::Lux, StubReply::Fail));

        let err = timed
            .send_with_deadline(Command::Lux, Duration::from_secs(1))
            .await
            .unwrap_err();

        assert!(!err.is_timeout());
        assert!(matches!(err, Error::Io(_)));
    }

    #[tokio::test]
    async fn test_late_answer_is_not_mistaken_for_next() {
        let link = StubLink::new()
            .reply(
                Command::Am2320Temperature,
                StubReply::delayed(Duration::from_millis(300), "72.4"),
            )
            .reply(Command::Ds18x20Temperature, StubReply::text("98.6"));
        let journal = link.journal();
        let mut timed = timed(link);

        let first = timed
            .send_with_deadline(Command::Am2320Temperature, Duration::from_millis(50))
            .await;
        assert!(first.unwrap_err().is_timeout());

        let second = timed
            .send_with_deadline(Command::Ds18x20Temperature, Duration::from_secs(1))
            .await
            .unwrap();

        assert_eq!(second.as_bytes(), b"98.6");
        assert_eq!(
            journal.reads(),
            vec![Command::Am2320Temperature, Command::Ds18x20Temperature]
        );
    }

    #[tokio::test]
    async fn test_timeout_during_settle_cancels_read() {
        let link = StubLink::new()
            .reply(Command::Am2320Temperature, StubReply::text("72.4"))
            .reply(Command::Lux, StubReply::text("800.0"));
        let journal = link.journal();
        let channel = CommandChannel::new(link).with_settle_interval(Duration::from_millis(200));
        let mut timed = TimedCommand::new(channel);

        let first = timed
            .send_with_deadline(Command::Am2320Temperature, Duration::from_millis(50))
            .await;
        assert!(first.unwrap_err().is_timeout());

        let second = timed
            .send_with_deadline(Command::Lux, Duration::from_secs(1))
            .await
            .unwrap();

        assert_eq!(second.as_bytes(), b"800.0");
        assert_eq!(journal.reads(), vec![Command::Lux]);
        assert_eq!(journal.discarded(), vec![Command::Am2320Temperature]);
        assert_eq!(
            journal.written_bytes(),
            b"am2320_temp\rlux\r".to_vec()
        );
    }
}
