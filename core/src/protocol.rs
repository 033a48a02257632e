//! Decoder for the report line protocol spoken by the test firmware.
//!
//! Each report is one ASCII line of the form `<test_id>:<hex>,<hex>,...`,
//! where the test id is decimal and every value is an unsigned base-16
//! register snapshot. There is no further framing; a corrupted line is
//! simply rejected and the caller decides what to do with it.

use thiserror::Error;

use crate::types::{RegisterValue, TestId};

/// Failure to decode a single report line.
///
/// All variants are discard-class: the serial link picks up garbage when
/// the device goes through power-on reset, so the run controller drops
/// undecodable lines instead of aborting on them.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DecodeError {
    #[error("expected exactly one ':' separator")]
    Framing,
    #[error("invalid test id field")]
    TestId,
    #[error("invalid register value token '{0}'")]
    Value(String),
}

/// One decoded report: a test id plus the positional register snapshot
/// values that test emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub test_id: TestId,
    pub values: Vec<RegisterValue>,
}

impl Report {
    /// Decodes one line received from the device.
    pub fn parse(line: &str) -> Result<Self, DecodeError> {
        let line = line.trim_end_matches(['\r', '\n']);

        let mut fields = line.split(':');
        let (Some(id_field), Some(value_field), None) =
            (fields.next(), fields.next(), fields.next())
        else {
            return Err(DecodeError::Framing);
        };

        let test_id: TestId = id_field.trim().parse().map_err(|_| DecodeError::TestId)?;
        let values = value_field
            .split(',')
            .map(|token| {
                let token = token.trim();
                // A 0x prefix is neither required nor forbidden
                let digits = token.strip_prefix("0x").unwrap_or(token);
                RegisterValue::from_str_radix(digits, 16)
                    .map_err(|_| DecodeError::Value(token.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { test_id, values })
    }
}
