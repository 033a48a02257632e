//! Harness configuration.
//!
//! Everything the session needs is passed in explicitly through this
//! struct; the core reads no environment variables and keeps no global
//! state.

use std::time::Duration;

/// Default avrdude programmer id
pub const DEFAULT_PROGRAMMER: &str = "arduino";
/// Default AVR part number
pub const DEFAULT_PART: &str = "ATMEGA328P";
/// Default baud rate for both programming and the report link
pub const DEFAULT_BAUD_RATE: u32 = 19200;
/// Time the device needs to come out of the open-triggered reset
pub const DEFAULT_SETTLE_TIME: Duration = Duration::from_secs(2);
/// Per-read liveness bound on the serial link
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(1);
/// Overall wall-clock budget for one run
pub const DEFAULT_RUN_DEADLINE: Duration = Duration::from_secs(60);

/// Full configuration for one harness session
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Serial device path, e.g. /dev/ttyUSB0
    pub device: String,
    /// Baud rate used by the device programmer
    pub programming_baud: u32,
    /// Baud rate of the report link
    pub comm_baud: u32,
    /// Programmer id passed to the loader tool
    pub programmer: String,
    /// Target part number
    pub part: String,
    pub settle_time: Duration,
    pub read_timeout: Duration,
    /// `None` leaves the run bounded only by the per-read timeout
    pub run_deadline: Option<Duration>,
}

impl HarnessConfig {
    pub fn new(device: impl Into<String>) -> Self {
        Self {
            device: device.into(),
            programming_baud: DEFAULT_BAUD_RATE,
            comm_baud: DEFAULT_BAUD_RATE,
            programmer: DEFAULT_PROGRAMMER.to_string(),
            part: DEFAULT_PART.to_string(),
            settle_time: DEFAULT_SETTLE_TIME,
            read_timeout: DEFAULT_READ_TIMEOUT,
            run_deadline: Some(DEFAULT_RUN_DEADLINE),
        }
    }
}
