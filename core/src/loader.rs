//! Firmware loader collaborator.
//!
//! Flashing is delegated to avrdude as an external process. The harness
//! only cares whether the image made it onto the part; any failure
//! detail beyond that is logged and folded into a single error.

use std::path::Path;
use std::process::Command;

use log::*;
use thiserror::Error;

use crate::config::HarnessConfig;

const LOADER_BINARY: &str = "avrdude";

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("could not run {LOADER_BINARY}: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("{LOADER_BINARY} exited with {code:?}")]
    Failed { code: Option<i32> },
}

/// Writes a firmware image onto the device under test
pub trait FirmwareLoader {
    fn load(&self, image: &Path) -> Result<(), LoadError>;
}

/// [`FirmwareLoader`] shelling out to avrdude
pub struct AvrdudeLoader {
    device: String,
    programmer: String,
    part: String,
    baud_rate: u32,
}

impl AvrdudeLoader {
    pub fn new(config: &HarnessConfig) -> Self {
        Self {
            device: config.device.clone(),
            programmer: config.programmer.clone(),
            part: config.part.clone(),
            baud_rate: config.programming_baud,
        }
    }
}

impl FirmwareLoader for AvrdudeLoader {
    fn load(&self, image: &Path) -> Result<(), LoadError> {
        let output = Command::new(LOADER_BINARY)
            .args(["-c", &self.programmer])
            .args(["-p", &self.part])
            .args(["-P", &self.device])
            .args(["-b", &self.baud_rate.to_string()])
            .args(["-U", &format!("flash:w:{}", image.display())])
            // Clone boards often carry mismatched signatures; skipping
            // readback verification keeps flashing fast
            .args(["-F", "-V"])
            .output()?;

        if !output.stdout.is_empty() {
            info!("{}", String::from_utf8_lossy(&output.stdout));
        }
        if !output.stderr.is_empty() {
            info!("{}", String::from_utf8_lossy(&output.stderr));
        }

        if output.status.success() {
            Ok(())
        } else {
            Err(LoadError::Failed {
                code: output.status.code(),
            })
        }
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;

    /// Loader stub that succeeds or fails without touching hardware
    pub struct StubLoader {
        pub succeed: bool,
    }

    impl FirmwareLoader for StubLoader {
        fn load(&self, _image: &Path) -> Result<(), LoadError> {
            if self.succeed {
                Ok(())
            } else {
                Err(LoadError::Failed { code: Some(1) })
            }
        }
    }
}
