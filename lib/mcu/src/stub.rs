use std::collections::{HashMap, VecDeque};
use std::io;
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

use log::info;

use crate::{Command, SerialLink};

#[derive(Clone, Debug)]
pub enum StubReply {
    Text(String),
    Silent,
    Delayed(Duration, String),
    Fail,
}

impl StubReply {
    pub fn text(text: &str) -> Self {
        Self::Text(text.to_string())
    }

    pub fn delayed(delay: Duration, text: &str) -> Self {
        Self::Delayed(delay, text.to_string())
    }
}

#[derive(Default)]
struct Entries {
    writes: Vec<Vec<u8>>,
    reads: Vec<Command>,
    discarded: Vec<Command>,
}

/// Shared record of what a [`StubLink`] saw, readable after the link moved.
#[derive(Clone, Default)]
pub struct Journal {
    entries: Arc<Mutex<Entries>>,
}

impl Journal {
    fn lock(&self) -> MutexGuard<'_, Entries> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.lock().writes.clone()
    }

    pub fn written_bytes(&self) -> Vec<u8> {
        self.lock().writes.concat()
    }

    /// Commands whose answer was actually read back, in order.
    pub fn reads(&self) -> Vec<Command> {
        self.lock().reads.clone()
    }

    /// Commands whose answer was dropped from the input buffer unread.
    pub fn discarded(&self) -> Vec<Command> {
        self.lock().discarded.clone()
    }
}

/// Scripted stand-in for the sensor module.
///
/// Every complete command written queues its scripted answer in the input
/// buffer, like a real port: answers nobody read are still there for the next
/// read unless the input is cleared. Commands without a script stay silent.
#[derive(Default)]
pub struct StubLink {
    replies: HashMap<Command, StubReply>,
    write_chunk: Option<usize>,
    line: Vec<u8>,
    input: VecDeque<Command>,
    journal: Journal,
}

impl StubLink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A module that answers every command with a plausible value.
    pub fn healthy() -> Self {
        Self::new()
            .reply(Command::Am2320Temperature, StubReply::text("21.4\r\n"))
            .reply(Command::Am2320Humidity, StubReply::text("45.1\r\n"))
            .reply(Command::Ds18x20Temperature, StubReply::text("21.9\r\n"))
            .reply(Command::Lux, StubReply::text("800\r\n"))
    }

    pub fn reply(mut self, command: Command, reply: StubReply) -> Self {
        self.replies.insert(command, reply);
        self
    }

    /// Accept at most `chunk` bytes per write call.
    pub fn with_write_chunk(mut self, chunk: usize) -> Self {
        self.write_chunk = Some(chunk);
        self
    }

    pub fn journal(&self) -> Journal {
        self.journal.clone()
    }
}

impl SerialLink for StubLink {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        let count = self.write_chunk.map_or(bytes.len(), |chunk| chunk.min(bytes.len()));
        let accepted = &bytes[..count];

        self.journal.lock().writes.push(accepted.to_vec());

        for byte in accepted {
            if *byte == b'\r' {
                let token = String::from_utf8_lossy(&self.line).into_owned();
                self.line.clear();

                match token.parse() {
                    Ok(command) => self.input.push_back(command),
                    Err(_) => info!("stub link ignores unknown command {token:?}"),
                }
            } else {
                self.line.push(*byte);
            }
        }

        Ok(count)
    }

    fn read(&mut self, buffer: &mut [u8]) -> io::Result<usize> {
        let mut text = String::new();

        while let Some(command) = self.input.pop_front() {
            match self.replies.get(&command).cloned() {
                Some(StubReply::Text(answer)) => text.push_str(&answer),
                Some(StubReply::Delayed(delay, answer)) => {
                    thread::sleep(delay);
                    text.push_str(&answer);
                }
                Some(StubReply::Fail) => {
                    return Err(io::Error::new(io::ErrorKind::BrokenPipe, "stub link failure"))
                }
                Some(StubReply::Silent) | None => (),
            }

            self.journal.lock().reads.push(command);
        }

        let count = text.len().min(buffer.len());
        buffer[..count].copy_from_slice(&text.as_bytes()[..count]);

        Ok(count)
    }

    fn clear_input(&mut self) -> io::Result<()> {
        let mut journal = self.journal.lock();
        journal.discarded.extend(self.input.drain(..));

        Ok(())
    }
}
