//! Serial transport to the device under test.
//!
//! The run controller only ever needs "read one line, bounded" and
//! "write some bytes", so that is the whole trait. The real
//! implementation sits on top of a host serial port; tests substitute a
//! scripted mock.

use std::io::{self, Read, Write};
use std::thread;
use std::time::Duration;

use log::*;

/// Result of one bounded read attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    /// A complete line, including its terminator
    Line(String),
    /// The per-read timeout expired before a full line arrived
    TimedOut,
    /// The other end went away
    Closed,
}

/// Byte stream to the device under test
pub trait Transport {
    /// Reads until a newline or the configured read timeout, whichever
    /// comes first. Partial input is retained for the next call.
    fn read_line(&mut self) -> io::Result<ReadOutcome>;

    /// Writes raw bytes to the device
    fn write(&mut self, data: &[u8]) -> io::Result<()>;
}

/// [`Transport`] over a host serial port
pub struct SerialTransport {
    port: Box<dyn serialport::SerialPort>,
    /// Bytes of a line still in flight across read timeouts
    pending: Vec<u8>,
}

impl SerialTransport {
    /// Opens the serial device and waits out the settle time. The wait
    /// is not optional: opening the port asserts DTR, which resets the
    /// device, and anything read before it has rebooted is noise.
    pub fn open(
        device: &str,
        baud_rate: u32,
        read_timeout: Duration,
        settle_time: Duration,
    ) -> anyhow::Result<Self> {
        let port = serialport::new(device, baud_rate)
            .timeout(read_timeout)
            .open()?;
        debug!("Opened {} at {} baud, settling", device, baud_rate);
        thread::sleep(settle_time);
        Ok(Self {
            port,
            pending: Vec::new(),
        })
    }
}

impl Transport for SerialTransport {
    fn read_line(&mut self) -> io::Result<ReadOutcome> {
        let mut byte = [0u8; 1];
        loop {
            match self.port.read(&mut byte) {
                Ok(0) => return Ok(ReadOutcome::Closed),
                Ok(_) => {
                    self.pending.push(byte[0]);
                    if byte[0] == b'\n' {
                        let line = String::from_utf8_lossy(&self.pending).into_owned();
                        self.pending.clear();
                        return Ok(ReadOutcome::Line(line));
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::TimedOut => {
                    return Ok(ReadOutcome::TimedOut)
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn write(&mut self, data: &[u8]) -> io::Result<()> {
        self.port.write_all(data)
    }
}

#[cfg(test)]
pub mod testing {
    //! Scripted transport for exercising the run controller without
    //! hardware

    use super::*;
    use std::collections::VecDeque;

    pub struct ScriptedTransport {
        script: VecDeque<io::Result<ReadOutcome>>,
        pub written: Vec<u8>,
    }

    impl ScriptedTransport {
        pub fn new(script: impl IntoIterator<Item = io::Result<ReadOutcome>>) -> Self {
            Self {
                script: script.into_iter().collect(),
                written: Vec::new(),
            }
        }

        /// Convenience constructor: each entry becomes one received line
        pub fn lines(lines: &[&str]) -> Self {
            Self::new(
                lines
                    .iter()
                    .map(|l| Ok(ReadOutcome::Line((*l).to_string())))
                    .collect::<Vec<_>>(),
            )
        }
    }

    impl Transport for ScriptedTransport {
        fn read_line(&mut self) -> io::Result<ReadOutcome> {
            self.script
                .pop_front()
                .unwrap_or_else(|| Ok(ReadOutcome::Closed))
        }

        fn write(&mut self, data: &[u8]) -> io::Result<()> {
            self.written.extend_from_slice(data);
            Ok(())
        }
    }
}
