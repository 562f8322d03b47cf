use std::io::{self, Read, Write};
use std::path::Path;
use std::time::Duration;

use log::debug;
use serialport::{ClearBuffer, DataBits, FlowControl, Parity, SerialPort, StopBits};

use crate::Result;

pub type Port = Box<dyn SerialPort>;

/// Bound on a single read of the port. Kept well under the command deadline
/// minus the settle interval so a silent module ends as "no data".
pub const READ_TIMEOUT: Duration = Duration::from_secs(1);

/// Byte-level access to the sensor module.
pub trait SerialLink: Send + 'static {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize>;
    fn read(&mut self, buffer: &mut [u8]) -> io::Result<usize>;

    /// Drops whatever was received but not read yet.
    fn clear_input(&mut self) -> io::Result<()>;
}

impl SerialLink for Port {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        Write::write(self, bytes)
    }

    fn read(&mut self, buffer: &mut [u8]) -> io::Result<usize> {
        match Read::read(self, buffer) {
            Err(err) if err.kind() == io::ErrorKind::TimedOut => Ok(0),
            result => result,
        }
    }

    fn clear_input(&mut self) -> io::Result<()> {
        self.clear(ClearBuffer::Input).map_err(io::Error::from)
    }
}

/// Opens the module's serial device (8E1, no flow control).
///
/// `read_timeout` bounds every single read; a read that runs into it
/// reports zero bytes instead of failing.
pub fn open(path: &Path, baud_rate: u32, read_timeout: Duration) -> Result<Port> {
    debug!("opening {} at {} baud", path.display(), baud_rate);

    let port = serialport::new(path.to_string_lossy(), baud_rate)
        .parity(Parity::Even)
        .data_bits(DataBits::Eight)
        .stop_bits(StopBits::One)
        .flow_control(FlowControl::None)
        .timeout(read_timeout)
        .open()?;

    Ok(port)
}
