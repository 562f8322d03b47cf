use std::fmt;

pub const RESPONSE_CAPACITY: usize = 12;

/// Bytes read back after one command, at most [`RESPONSE_CAPACITY`] of them.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct RawResponse {
    buffer: [u8; RESPONSE_CAPACITY],
    len: usize,
}

impl RawResponse {
    /// The device produced nothing before the read returned.
    pub const fn no_data() -> Self {
        Self {
            buffer: [0; RESPONSE_CAPACITY],
            len: 0,
        }
    }

    pub fn from_slice(bytes: &[u8]) -> Self {
        let len = bytes.len().min(RESPONSE_CAPACITY);

        let mut buffer = [0; RESPONSE_CAPACITY];
        buffer[..len].copy_from_slice(&bytes[..len]);

        Self { buffer, len }
    }

    pub fn is_no_data(&self) -> bool {
        self.len == 0
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer[..self.len]
    }
}

impl fmt::Debug for RawResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_no_data() {
            write!(f, "RawResponse(no data)")
        } else {
            write!(f, "RawResponse({:?})", String::from_utf8_lossy(self.as_bytes()))
        }
    }
}
