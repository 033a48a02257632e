//! Per-firmware verifier tables.
//!
//! Each test firmware image has a table describing every report it
//! emits; the tables are pure data consumed by [`crate::verifier`].

pub mod pwm;

use crate::verifier::Check;

/// Known test firmware suites
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString, strum::EnumIter,
)]
#[strum(serialize_all = "lowercase")]
pub enum Suite {
    /// PWM subsystem test firmware
    Pwm,
}

impl Suite {
    /// The verifier table for this suite's reports
    pub const fn checks(self) -> &'static [Check] {
        match self {
            Self::Pwm => pwm::CHECKS,
        }
    }

    /// Default firmware image file name for this suite
    pub const fn image_name(self) -> &'static str {
        match self {
            Self::Pwm => "testpwm.hex",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verifier::Registry;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_all_tables_build() {
        // Every shipped table must produce a valid registry
        for suite in Suite::iter() {
            let registry = Registry::new(suite.checks()).unwrap();
            assert!(!registry.is_empty());
        }
    }

    #[test]
    fn test_suite_from_str() {
        assert_eq!(Suite::from_str("pwm").unwrap(), Suite::Pwm);
        assert!(Suite::from_str("nonsense").is_err());
    }
}
