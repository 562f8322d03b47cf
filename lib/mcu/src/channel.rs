use std::io;
use std::sync::Arc;
use std::time::Duration;

use log::trace;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tokio::task;
use tokio::time;
use tokio_util::sync::CancellationToken;

use crate::{Command, Error, RawResponse, Result, SerialLink, RESPONSE_CAPACITY};

/// Time the module gets to produce an answer between the write and the read.
pub const SETTLE_INTERVAL: Duration = Duration::from_secs(1);

/// One write/settle/read exchange at a time over a shared link.
pub struct CommandChannel<L> {
    link: Arc<Mutex<L>>,
    settle: Duration,
}

impl<L> Clone for CommandChannel<L> {
    fn clone(&self) -> Self {
        Self {
            link: self.link.clone(),
            settle: self.settle,
        }
    }
}

impl<L: SerialLink> CommandChannel<L> {
    pub fn new(link: L) -> Self {
        Self {
            link: Arc::new(Mutex::new(link)),
            settle: SETTLE_INTERVAL,
        }
    }

    pub fn with_settle_interval(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }

    pub fn settle_interval(&self) -> Duration {
        self.settle
    }

    /// Blocking exchange. Must not be called from within an async context.
    pub fn send(&self, command: Command) -> Result<RawResponse> {
        let mut link = self.link.blocking_lock();

        write_command(&mut *link, command)?;
        std::thread::sleep(self.settle);
        read_response(&mut *link, command)
    }

    /// Exchange that stops short of the link once `token` is cancelled.
    ///
    /// The link stays locked from the write until the read has returned. The
    /// token is checked before writing and after the settle interval; a read
    /// that has already started runs until the port gives up on it.
    pub async fn exchange(&self, command: Command, token: CancellationToken) -> Result<RawResponse> {
        let guard = self.link.clone().lock_owned().await;

        if token.is_cancelled() {
            return Err(Error::Cancelled(command));
        }

        let (guard, written) = blocking(guard, move |link| write_command(link, command)).await?;
        written?;

        tokio::select! {
            _ = token.cancelled() => {
                trace!("{} cancelled before read", command);
                return Err(Error::Cancelled(command));
            }
            _ = time::sleep(self.settle) => {}
        }

        let (_guard, response) = blocking(guard, move |link| read_response(link, command)).await?;
        response
    }
}

async fn blocking<L, T, F>(mut guard: OwnedMutexGuard<L>, f: F) -> Result<(OwnedMutexGuard<L>, T)>
where
    L: SerialLink,
    T: Send + 'static,
    F: FnOnce(&mut L) -> T + Send + 'static,
{
    let result = task::spawn_blocking(move || {
        let value = f(&mut *guard);
        (guard, value)
    })
    .await?;

    Ok(result)
}

fn write_command<L: SerialLink + ?Sized>(link: &mut L, command: Command) -> Result<()> {
    // an abandoned command may have been answered after its exchange gave up
    link.clear_input()?;

    let bytes = command.wire_bytes();
    let mut written = 0;

    while written < bytes.len() {
        match link.write(&bytes[written..]) {
            Ok(0) => {
                return Err(io::Error::new(io::ErrorKind::WriteZero, "link accepted no bytes").into())
            }
            Ok(count) => written += count,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err.into()),
        }
    }

    trace!("sent {}", command);
    Ok(())
}

fn read_response<L: SerialLink + ?Sized>(link: &mut L, command: Command) -> Result<RawResponse> {
    let mut buffer = [0; RESPONSE_CAPACITY];
    let count = link.read(&mut buffer)?;

    if count == 0 {
        trace!("{} produced no data", command);
        return Ok(RawResponse::no_data());
    }

    let response = RawResponse::from_slice(&buffer[..count]);
    trace!("{} answered {:?}", command, response);

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{StubLink, StubReply};

    const SETTLE: Duration = Duration::from_millis(10);

    #[tokio::test]
    async fn test_exchange_writes_command_with_carriage_return() {
        let link = StubLink::new().reply(Command::Lux, StubReply::text("800.0"));
        let journal = link.journal();
        let channel = CommandChannel::new(link).with_settle_interval(SETTLE);

        let response = channel
            .exchange(Command::Lux, CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(response.as_bytes(), b"800.0");
        assert_eq!(journal.writes(), vec![b"lux\r".to_vec()]);
        assert_eq!(journal.reads(), vec![Command::Lux]);
    }

    #[tokio::test]
    async fn test_silent_device_is_no_data() {
        let link = StubLink::new().reply(Command::Lux, StubReply::Silent);
        let channel = CommandChannel::new(link).with_settle_interval(SETTLE);

        let response = channel
            .exchange(Command::Lux, CancellationToken::new())
            .await
            .unwrap();

        assert!(response.is_no_data());
    }

    #[tokio::test]
    async fn test_read_failure_is_io_error() {
        let link = StubLink::new().reply(Command::Lux, StubReply::Fail);
        let channel = CommandChannel::new(link).with_settle_interval(SETTLE);

        let result = channel
            .exchange(Command::Lux, CancellationToken::new())
            .await;

        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[tokio::test]
    async fn test_partial_writes_are_completed() {
        let link = StubLink::new()
            .reply(Command::Am2320Humidity, StubReply::text("45.1"))
            .with_write_chunk(4);
        let journal = link.journal();
        let channel = CommandChannel::new(link).with_settle_interval(SETTLE);

        channel
            .exchange(Command::Am2320Humidity, CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(journal.written_bytes(), b"am2320_humidity\r".to_vec());
    }

    #[tokio::test]
    async fn test_cancelled_token_never_touches_link() {
        let link = StubLink::new().reply(Command::Lux, StubReply::text("800.0"));
        let journal = link.journal();
        let channel = CommandChannel::new(link).with_settle_interval(SETTLE);

        let token = CancellationToken::new();
        token.cancel();

        let result = channel.exchange(Command::Lux, token).await;

        assert!(matches!(result, Err(Error::Cancelled(Command::Lux))));
        assert!(journal.writes().is_empty());
        assert!(journal.reads().is_empty());
    }

    #[tokio::test]
    async fn test_cancel_during_settle_skips_read() {
        let link = StubLink::new().reply(Command::Lux, StubReply::text("800.0"));
        let journal = link.journal();
        let channel = CommandChannel::new(link).with_settle_interval(Duration::from_secs(10));

        let token = CancellationToken::new();
        let exchange = {
            let channel = channel.clone();
            let token = token.clone();
            tokio::spawn(async move { channel.exchange(Command::Lux, token).await })
        };

        time::sleep(Duration::from_millis(50)).await;
        token.cancel();

        let result = exchange.await.unwrap();

        assert!(matches!(result, Err(Error::Cancelled(Command::Lux))));
        assert_eq!(journal.writes().len(), 1);
        assert!(journal.reads().is_empty());
    }

    #[tokio::test]
    async fn test_unread_answer_is_dropped_before_next_command() {
        let link = StubLink::new()
            .reply(Command::Am2320Temperature, StubReply::text("72.4\r\n"))
            .reply(Command::Lux, StubReply::text("800.0\r\n"));
        let journal = link.journal();
        let channel = CommandChannel::new(link).with_settle_interval(Duration::from_millis(200));

        let token = CancellationToken::new();
        let exchange = {
            let channel = channel.clone();
            let token = token.clone();
            tokio::spawn(async move { channel.exchange(Command::Am2320Temperature, token).await })
        };

        time::sleep(Duration::from_millis(50)).await;
        token.cancel();
        assert!(exchange.await.unwrap().is_err());

        let response = channel
            .exchange(Command::Lux, CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(response.as_bytes(), b"800.0\r\n");
        assert_eq!(crate::parse(&response).unwrap(), 800.0);
        assert_eq!(journal.discarded(), vec![Command::Am2320Temperature]);
    }

    #[test]
    fn test_blocking_send() {
        let link = StubLink::new().reply(Command::Ds18x20Temperature, StubReply::text("98.6\r\n"));
        let channel = CommandChannel::new(link).with_settle_interval(SETTLE);

        let response = channel.send(Command::Ds18x20Temperature).unwrap();

        assert_eq!(response.as_bytes(), b"98.6\r\n");
    }
}
