//! Expectations for the PWM test firmware (testpwm.hex) on the
//! ATmega328P.
//!
//! Report ids 1-2 are the init snapshots (driver register pointers
//! interleaved with the datasheet addresses, pairwise equal). Ids 3-10
//! cover channel enable/disable: the COM bits in TCCRnA plus the data
//! direction bit of the output-compare pin. Ids 11-52 sweep
//! rfs_pwm8_set_frequency across the prescaler boundaries of timer 0
//! and timer 2; each report is the resulting (TCCRnA, TCCRnB) pair.
//!
//! The frequency sweep expectations follow the driver's candidate
//! model: for each divisor the timer can run fast PWM (F_CPU / (d * 256))
//! or phase-correct PWM (F_CPU / (d * 512)), and the driver picks the
//! lowest candidate at or above the requested frequency, clamping to
//! the fastest configuration when the request is out of range.

use crate::verifier::{Check, MaskedCheck, VerifierKind};

// TCCRnA waveform generation bits
const FAST_PWM: u32 = 0x03; // WGM01 | WGM00
const PHASE_PWM: u32 = 0x01; // WGM00

// Timer 0 clock select (TCCR0B), divisors 1/8/64/256/1024
const T0_CS_1: u32 = 0x01;
const T0_CS_8: u32 = 0x02;
const T0_CS_64: u32 = 0x03;
const T0_CS_256: u32 = 0x04;
const T0_CS_1024: u32 = 0x05;

// Timer 2 clock select (TCCR2B), divisors 1/8/32/64/128/256/1024
const T2_CS_1: u32 = 0x01;
const T2_CS_8: u32 = 0x02;
const T2_CS_32: u32 = 0x03;
const T2_CS_64: u32 = 0x04;
const T2_CS_128: u32 = 0x05;
const T2_CS_256: u32 = 0x06;
const T2_CS_1024: u32 = 0x07;

// COM bit groups in TCCRnA
const COM_A_MASK: u32 = 0xc0;
const COM_A_NONINVERT: u32 = 0x80; // COMnA1
const COM_B_MASK: u32 = 0x30;
const COM_B_NONINVERT: u32 = 0x20; // COMnB1

// Output-compare pin direction bits
const DD_OC0A: u32 = 0x40; // PD6
const DD_OC0B: u32 = 0x20; // PD5
const DD_OC2A: u32 = 0x08; // PB3
const DD_OC2B: u32 = 0x08; // PD3

const fn masked(index: usize, mask: u32, expected: u32) -> MaskedCheck {
    MaskedCheck {
        index,
        mask,
        expected,
    }
}

const fn check(test_id: u32, kind: VerifierKind) -> Check {
    Check { test_id, kind }
}

pub const CHECKS: &[Check] = &[
    // Init: every driver register pointer must equal its datasheet
    // address
    check(1, VerifierKind::EqualPairs),
    check(2, VerifierKind::EqualPairs),
    // Channel enable: (TCCRnA, DDRx)
    check(
        3,
        VerifierKind::MaskedBits(&[
            masked(0, COM_A_MASK, COM_A_NONINVERT),
            masked(1, DD_OC0A, DD_OC0A),
        ]),
    ),
    check(
        4,
        VerifierKind::MaskedBits(&[
            masked(0, COM_B_MASK, COM_B_NONINVERT),
            masked(1, DD_OC0B, DD_OC0B),
        ]),
    ),
    check(
        5,
        VerifierKind::MaskedBits(&[
            masked(0, COM_A_MASK, COM_A_NONINVERT),
            masked(1, DD_OC2A, DD_OC2A),
        ]),
    ),
    check(
        6,
        VerifierKind::MaskedBits(&[
            masked(0, COM_B_MASK, COM_B_NONINVERT),
            masked(1, DD_OC2B, DD_OC2B),
        ]),
    ),
    // Channel disable: COM bits back to zero, pin direction untouched
    check(7, VerifierKind::MaskedBits(&[masked(0, COM_A_MASK, 0)])),
    check(8, VerifierKind::MaskedBits(&[masked(0, COM_B_MASK, 0)])),
    check(9, VerifierKind::MaskedBits(&[masked(0, COM_A_MASK, 0)])),
    check(10, VerifierKind::MaskedBits(&[masked(0, COM_B_MASK, 0)])),
    // Timer 0 frequency sweep: (TCCR0A, TCCR0B) across the candidate
    // boundaries 62500, 31250, 7812.5, 3906.25, 976.56, 488.28,
    // 244.14, 122.07, 61.04, 30.52 Hz
    check(11, VerifierKind::ExactRegisters(&[FAST_PWM, T0_CS_1])), // 63000 Hz (clamped)
    check(12, VerifierKind::ExactRegisters(&[FAST_PWM, T0_CS_1])), // 62501 Hz (clamped)
    check(13, VerifierKind::ExactRegisters(&[FAST_PWM, T0_CS_1])), // 62500 Hz
    check(14, VerifierKind::ExactRegisters(&[FAST_PWM, T0_CS_1])), // 31251 Hz
    check(15, VerifierKind::ExactRegisters(&[PHASE_PWM, T0_CS_1])), // 31250 Hz
    check(16, VerifierKind::ExactRegisters(&[PHASE_PWM, T0_CS_1])), // 7813 Hz
    check(17, VerifierKind::ExactRegisters(&[FAST_PWM, T0_CS_8])), // 7812 Hz
    check(18, VerifierKind::ExactRegisters(&[FAST_PWM, T0_CS_8])), // 3907 Hz
    check(19, VerifierKind::ExactRegisters(&[PHASE_PWM, T0_CS_8])), // 3906 Hz
    check(20, VerifierKind::ExactRegisters(&[PHASE_PWM, T0_CS_8])), // 977 Hz
    check(21, VerifierKind::ExactRegisters(&[FAST_PWM, T0_CS_64])), // 976 Hz
    check(22, VerifierKind::ExactRegisters(&[FAST_PWM, T0_CS_64])), // 489 Hz
    check(23, VerifierKind::ExactRegisters(&[PHASE_PWM, T0_CS_64])), // 488 Hz
    check(24, VerifierKind::ExactRegisters(&[PHASE_PWM, T0_CS_64])), // 245 Hz
    check(25, VerifierKind::ExactRegisters(&[FAST_PWM, T0_CS_256])), // 244 Hz
    check(26, VerifierKind::ExactRegisters(&[FAST_PWM, T0_CS_256])), // 123 Hz
    check(27, VerifierKind::ExactRegisters(&[PHASE_PWM, T0_CS_256])), // 122 Hz
    check(28, VerifierKind::ExactRegisters(&[PHASE_PWM, T0_CS_256])), // 62 Hz
    check(29, VerifierKind::ExactRegisters(&[FAST_PWM, T0_CS_1024])), // 61 Hz
    check(30, VerifierKind::ExactRegisters(&[PHASE_PWM, T0_CS_1024])), // 30 Hz
    // Timer 2 frequency sweep: (TCCR2A, TCCR2B); the extra divisors
    // add the 1953.125 Hz boundary and shift the low end
    check(31, VerifierKind::ExactRegisters(&[FAST_PWM, T2_CS_1])), // 63000 Hz (clamped)
    check(32, VerifierKind::ExactRegisters(&[FAST_PWM, T2_CS_1])), // 62501 Hz (clamped)
    check(33, VerifierKind::ExactRegisters(&[FAST_PWM, T2_CS_1])), // 62500 Hz
    check(34, VerifierKind::ExactRegisters(&[FAST_PWM, T2_CS_1])), // 31251 Hz
    check(35, VerifierKind::ExactRegisters(&[PHASE_PWM, T2_CS_1])), // 31250 Hz
    check(36, VerifierKind::ExactRegisters(&[PHASE_PWM, T2_CS_1])), // 7813 Hz
    check(37, VerifierKind::ExactRegisters(&[FAST_PWM, T2_CS_8])), // 7812 Hz
    check(38, VerifierKind::ExactRegisters(&[FAST_PWM, T2_CS_8])), // 3907 Hz
    check(39, VerifierKind::ExactRegisters(&[PHASE_PWM, T2_CS_8])), // 3906 Hz
    check(40, VerifierKind::ExactRegisters(&[PHASE_PWM, T2_CS_8])), // 1954 Hz
    check(41, VerifierKind::ExactRegisters(&[FAST_PWM, T2_CS_32])), // 1953 Hz
    check(42, VerifierKind::ExactRegisters(&[FAST_PWM, T2_CS_32])), // 977 Hz
    check(43, VerifierKind::ExactRegisters(&[PHASE_PWM, T2_CS_32])), // 976 Hz
    check(44, VerifierKind::ExactRegisters(&[PHASE_PWM, T2_CS_32])), // 489 Hz
    check(45, VerifierKind::ExactRegisters(&[PHASE_PWM, T2_CS_64])), // 488 Hz
    check(46, VerifierKind::ExactRegisters(&[PHASE_PWM, T2_CS_64])), // 245 Hz
    check(47, VerifierKind::ExactRegisters(&[PHASE_PWM, T2_CS_128])), // 244 Hz
    check(48, VerifierKind::ExactRegisters(&[PHASE_PWM, T2_CS_128])), // 123 Hz
    check(49, VerifierKind::ExactRegisters(&[PHASE_PWM, T2_CS_256])), // 122 Hz
    check(50, VerifierKind::ExactRegisters(&[PHASE_PWM, T2_CS_256])), // 62 Hz
    check(51, VerifierKind::ExactRegisters(&[FAST_PWM, T2_CS_1024])), // 61 Hz
    check(52, VerifierKind::ExactRegisters(&[PHASE_PWM, T2_CS_1024])), // 30 Hz
];

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;

    #[test]
    fn test_table_ids_complete() {
        // The firmware emits ids 1..=52 in order
        assert_eq!(CHECKS.len(), 52);
        for (i, c) in CHECKS.iter().enumerate() {
            assert_eq!(c.test_id, i as u32 + 1);
        }
        assert!(CHECKS.iter().map(|c| c.test_id).all_unique());
    }

    #[test]
    fn test_init_snapshot() {
        // Pointer/address pairs as testpwm.c prints them
        assert!(CHECKS[0]
            .kind
            .verify(&[0x44, 0x44, 0x45, 0x45, 0x46, 0x46, 0x47, 0x47, 0x48, 0x48, 0x35, 0x35]));
        assert!(!CHECKS[0]
            .kind
            .verify(&[0x44, 0x44, 0x45, 0x45, 0x46, 0x46, 0x47, 0x47, 0x48, 0x48, 0x35, 0x36]));
    }

    #[test]
    fn test_channel_enable_expectations() {
        // Enable A on timer 0: COM0A1 set, DDD6 set; other bits free
        assert!(CHECKS[2].kind.verify(&[0x83, 0x40]));
        assert!(CHECKS[2].kind.verify(&[0x80, 0xff]));
        assert!(!CHECKS[2].kind.verify(&[0x23, 0x40]));
        assert!(!CHECKS[2].kind.verify(&[0x83, 0x00]));
    }

    #[test]
    fn test_frequency_boundary_pair() {
        // 7813 Hz stays phase-correct on divisor 1; 7812 Hz drops to
        // fast PWM on divisor 8
        assert!(CHECKS[15].kind.verify(&[0x01, 0x01]));
        assert!(CHECKS[16].kind.verify(&[0x03, 0x02]));
        assert!(!CHECKS[16].kind.verify(&[0x01, 0x01]));
    }
}
