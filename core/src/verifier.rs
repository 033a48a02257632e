//! Verifier registry: maps a test id to the expectation its report must
//! satisfy.
//!
//! Expectations are pure data (see [`crate::tables`]) interpreted by a
//! small fixed set of verifier kinds, instead of one hand-written check
//! function per sub-test.

use std::collections::HashMap;

use itertools::Itertools;
use thiserror::Error;

use crate::types::{RegisterValue, TestId};

/// A single masked-bits expectation at a fixed position in the snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaskedCheck {
    pub index: usize,
    pub mask: RegisterValue,
    pub expected: RegisterValue,
}

/// How to verify a decoded report's values.
///
/// Verifiers are positional: each kind encodes the fixed offsets and bit
/// patterns appropriate to the sub-test it checks. A snapshot that is too
/// short (or otherwise malformed) fails verification; it never panics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifierKind {
    /// Consecutive value pairs must be equal (register contents written
    /// through the driver must match the datasheet addresses)
    EqualPairs,
    /// Selected bits at fixed positions must match
    MaskedBits(&'static [MaskedCheck]),
    /// The whole snapshot must equal this sequence
    ExactRegisters(&'static [RegisterValue]),
    /// The output-compare value at `index` must equal the duty-cycle byte
    DutyCycle {
        index: usize,
        expected: RegisterValue,
    },
}

impl VerifierKind {
    /// Decides whether a decoded snapshot matches the expectation.
    /// Pure; safe to invoke repeatedly.
    pub fn verify(&self, values: &[RegisterValue]) -> bool {
        match self {
            Self::EqualPairs => {
                !values.is_empty()
                    && values.len() % 2 == 0
                    && values.iter().tuples().all(|(a, b)| a == b)
            }
            Self::MaskedBits(checks) => checks.iter().all(|c| {
                values
                    .get(c.index)
                    .is_some_and(|&v| v & c.mask == c.expected)
            }),
            Self::ExactRegisters(expected) => values == *expected,
            Self::DutyCycle { index, expected } => {
                values.get(*index).is_some_and(|&v| v == *expected)
            }
        }
    }
}

/// One registry entry: a test id and the expectation for its report
#[derive(Debug, Clone, Copy)]
pub struct Check {
    pub test_id: TestId,
    pub kind: VerifierKind,
}

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("duplicate test id {0} in verifier table")]
    DuplicateTestId(TestId),
}

/// The full set of expected sub-tests for one run. Built once at session
/// start and immutable afterwards; its key set defines how many distinct
/// reports the run controller accepts before concluding.
pub struct Registry {
    checks: HashMap<TestId, Check>,
}

impl Registry {
    pub fn new(table: &'static [Check]) -> Result<Self, RegistryError> {
        let mut checks = HashMap::with_capacity(table.len());
        for check in table {
            if checks.insert(check.test_id, *check).is_some() {
                return Err(RegistryError::DuplicateTestId(check.test_id));
            }
        }
        Ok(Self { checks })
    }

    /// Looks up the verifier for a test id. `None` is a registry miss,
    /// which callers must treat as fatal for the run.
    pub fn get(&self, test_id: TestId) -> Option<&Check> {
        self.checks.get(&test_id)
    }

    /// Number of distinct sub-tests this registry expects
    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_pairs() {
        let v = VerifierKind::EqualPairs;
        assert!(v.verify(&[0x2a, 0x2a]));
        assert!(v.verify(&[0xb2, 0xb2, 0x37, 0x37, 0x44, 0x44]));
        assert!(!v.verify(&[0x2a, 0x2b]));
        assert!(!v.verify(&[0x2a, 0x2a, 0x50]));
        assert!(!v.verify(&[]));
    }

    #[test]
    fn test_masked_bits() {
        const CHECKS: &[MaskedCheck] = &[
            MaskedCheck {
                index: 0,
                mask: 0xc0,
                expected: 0x80,
            },
            MaskedCheck {
                index: 1,
                mask: 0x40,
                expected: 0x40,
            },
        ];
        let v = VerifierKind::MaskedBits(CHECKS);
        assert!(v.verify(&[0x83, 0x40]));
        // Bits outside the mask are ignored
        assert!(v.verify(&[0x80, 0xff]));
        assert!(!v.verify(&[0x43, 0x40]));
        assert!(!v.verify(&[0x83, 0x00]));
        // Snapshot too short fails, does not panic
        assert!(!v.verify(&[0x83]));
    }

    #[test]
    fn test_exact_registers() {
        let v = VerifierKind::ExactRegisters(&[0x03, 0x01]);
        assert!(v.verify(&[0x03, 0x01]));
        assert!(!v.verify(&[0x03, 0x02]));
        assert!(!v.verify(&[0x03]));
        assert!(!v.verify(&[0x03, 0x01, 0x00]));
    }

    #[test]
    fn test_duty_cycle() {
        let v = VerifierKind::DutyCycle {
            index: 1,
            expected: 0x7f,
        };
        assert!(v.verify(&[0x00, 0x7f]));
        assert!(!v.verify(&[0x7f, 0x00]));
        assert!(!v.verify(&[0x00]));
    }

    #[test]
    fn test_registry_lookup() {
        static TABLE: &[Check] = &[
            Check {
                test_id: 1,
                kind: VerifierKind::EqualPairs,
            },
            Check {
                test_id: 7,
                kind: VerifierKind::ExactRegisters(&[0x00]),
            },
        ];
        let registry = Registry::new(TABLE).unwrap();
        assert_eq!(registry.len(), 2);
        assert!(registry.get(1).is_some());
        assert!(registry.get(7).is_some());
        // Unknown id is a registry miss
        assert!(registry.get(2).is_none());
    }

    #[test]
    fn test_registry_duplicate_id() {
        static TABLE: &[Check] = &[
            Check {
                test_id: 1,
                kind: VerifierKind::EqualPairs,
            },
            Check {
                test_id: 1,
                kind: VerifierKind::EqualPairs,
            },
        ];
        assert!(matches!(
            Registry::new(TABLE),
            Err(RegistryError::DuplicateTestId(1))
        ));
    }
}
