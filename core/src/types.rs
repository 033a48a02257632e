use serde::{Deserialize, Serialize};

/// Identifier of a single sub-test, as reported by the firmware
pub type TestId = u32;

/// One decoded register snapshot value. The test firmware reports both
/// 8-bit register contents and 16-bit register addresses; 32 bits covers
/// either without caring which.
pub type RegisterValue = u32;

/// Final tri-state outcome of a test run
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Every accepted report satisfied its verifier
    Pass,
    /// At least one report failed verification, or the run timed out
    Fail,
    /// The firmware image could not be loaded; the run is inconclusive
    Skip,
}

impl Verdict {
    /// Maps the verdict to the automake-style test exit convention
    /// (77 = test inconclusive).
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::Pass => 0,
            Self::Fail => 1,
            Self::Skip => 77,
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pass => write!(f, "PASS"),
            Self::Fail => write!(f, "FAIL"),
            Self::Skip => write!(f, "SKIP"),
        }
    }
}
