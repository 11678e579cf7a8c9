//! CPF check-digit verification.
//!
//! # Responsibility
//! - Verify the two mod-11 check digits of an 11-digit CPF.
//! - Reject non-assignable repeated-digit sequences.
//!
//! # Invariants
//! - Input must already be normalized; formatting characters are rejected,
//!   not stripped.
//! - The arithmetic matches the public CPF scheme bit-for-bit.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Number of digits in a normalized CPF.
pub const CPF_DIGITS: usize = 11;

/// Reason a normalized CPF string was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpfValidationError {
    /// Input does not have exactly 11 characters.
    InvalidLength(usize),
    /// Input contains a character outside `0-9` at this byte offset.
    NonDigit(usize),
    /// All digits are identical (e.g. `00000000000`).
    RepeatedDigits,
    /// Tenth digit does not match the computed first check digit.
    FirstCheckDigitMismatch { expected: u8, found: u8 },
    /// Eleventh digit does not match the computed second check digit.
    SecondCheckDigitMismatch { expected: u8, found: u8 },
}

impl Display for CpfValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLength(len) => {
                write!(f, "cpf must have {CPF_DIGITS} digits, got {len}")
            }
            Self::NonDigit(offset) => write!(f, "cpf has a non-digit at offset {offset}"),
            Self::RepeatedDigits => write!(f, "cpf must not repeat a single digit"),
            Self::FirstCheckDigitMismatch { expected, found } => write!(
                f,
                "cpf first check digit mismatch: expected {expected}, found {found}"
            ),
            Self::SecondCheckDigitMismatch { expected, found } => write!(
                f,
                "cpf second check digit mismatch: expected {expected}, found {found}"
            ),
        }
    }
}

impl Error for CpfValidationError {}

/// Validates a normalized CPF.
///
/// # Errors
/// Returns the first rule the input violates, checked in order: length,
/// digit content, repeated digits, first check digit, second check digit.
pub fn validate_cpf(cpf: &str) -> Result<(), CpfValidationError> {
    let bytes = cpf.as_bytes();
    if bytes.len() != CPF_DIGITS {
        return Err(CpfValidationError::InvalidLength(bytes.len()));
    }
    if let Some(offset) = bytes.iter().position(|byte| !byte.is_ascii_digit()) {
        return Err(CpfValidationError::NonDigit(offset));
    }

    let mut digits = [0u8; CPF_DIGITS];
    for (slot, byte) in digits.iter_mut().zip(bytes) {
        *slot = byte - b'0';
    }

    if digits.iter().all(|digit| *digit == digits[0]) {
        return Err(CpfValidationError::RepeatedDigits);
    }

    let first = check_digit(&digits[..9]);
    if first != digits[9] {
        return Err(CpfValidationError::FirstCheckDigitMismatch {
            expected: first,
            found: digits[9],
        });
    }

    let second = check_digit(&digits[..10]);
    if second != digits[10] {
        return Err(CpfValidationError::SecondCheckDigitMismatch {
            expected: second,
            found: digits[10],
        });
    }

    Ok(())
}

/// Returns whether `cpf` is a valid normalized CPF.
#[must_use]
pub fn is_valid_cpf(cpf: &str) -> bool {
    validate_cpf(cpf).is_ok()
}

/// Weighted mod-11 digit over `prefix`, weights descending to 2.
fn check_digit(prefix: &[u8]) -> u8 {
    let top_weight = prefix.len() as u32 + 1;
    let sum: u32 = prefix
        .iter()
        .enumerate()
        .map(|(index, digit)| u32::from(*digit) * (top_weight - index as u32))
        .sum();

    match (sum * 10) % 11 {
        10 => 0,
        remainder => remainder as u8,
    }
}

#[cfg(test)]
mod tests {
    use super::{check_digit, is_valid_cpf, validate_cpf, CpfValidationError};

    const VALID: &[&str] = &["11144477735", "52998224725", "39053344705", "12345678909"];

    #[test]
    fn accepts_known_valid_cpfs() {
        for cpf in VALID {
            assert_eq!(validate_cpf(cpf), Ok(()), "{cpf} should be valid");
        }
    }

    #[test]
    fn rejects_every_repeated_digit_sequence() {
        for digit in '0'..='9' {
            let cpf = digit.to_string().repeat(11);
            assert_eq!(validate_cpf(&cpf), Err(CpfValidationError::RepeatedDigits));
        }
    }

    #[test]
    fn rejects_wrong_length() {
        assert_eq!(validate_cpf(""), Err(CpfValidationError::InvalidLength(0)));
        assert_eq!(
            validate_cpf("1114447773"),
            Err(CpfValidationError::InvalidLength(10))
        );
        assert_eq!(
            validate_cpf("111444777350"),
            Err(CpfValidationError::InvalidLength(12))
        );
    }

    #[test]
    fn does_not_normalize_formatted_input() {
        assert!(!is_valid_cpf("111.444.777-35"));
        assert_eq!(
            validate_cpf("111444777-5"),
            Err(CpfValidationError::NonDigit(9))
        );
    }

    #[test]
    fn flipping_first_check_digit_is_rejected() {
        for replacement in b'0'..=b'9' {
            if replacement == b'3' {
                continue;
            }
            let mut bytes = b"11144477735".to_vec();
            bytes[9] = replacement;
            let cpf = String::from_utf8(bytes).expect("ascii digits");
            assert!(
                matches!(
                    validate_cpf(&cpf),
                    Err(CpfValidationError::FirstCheckDigitMismatch { expected: 3, .. })
                ),
                "{cpf} should fail the first check digit"
            );
        }
    }

    #[test]
    fn flipping_second_check_digit_is_rejected() {
        for replacement in b'0'..=b'9' {
            if replacement == b'5' {
                continue;
            }
            let mut bytes = b"11144477735".to_vec();
            bytes[10] = replacement;
            let cpf = String::from_utf8(bytes).expect("ascii digits");
            assert!(
                matches!(
                    validate_cpf(&cpf),
                    Err(CpfValidationError::SecondCheckDigitMismatch { expected: 5, .. })
                ),
                "{cpf} should fail the second check digit"
            );
        }
    }

    #[test]
    fn flipping_a_body_digit_is_rejected() {
        // Changing digit 0 shifts the first-digit sum by a multiple of 10,
        // which is never 0 mod 11.
        assert!(!is_valid_cpf("21144477735"));
        assert!(!is_valid_cpf("52998224735"));
    }

    #[test]
    fn remainder_ten_maps_to_zero() {
        // sum 10 -> 100 % 11 = 1
        assert_eq!(check_digit(&[1, 0, 0, 0, 0, 0, 0, 0, 0]), 1);
        // sum 2 -> 20 % 11 = 9
        assert_eq!(check_digit(&[0, 0, 0, 0, 0, 0, 0, 0, 1]), 9);
        // sum 12 -> 120 % 11 = 10 -> 0
        assert_eq!(check_digit(&[0, 0, 0, 0, 0, 0, 0, 0, 6]), 0);
    }

    #[test]
    fn cpf_with_zero_check_digit_from_remainder_ten_is_valid() {
        // 000.000.006-00: first digit remainder 120 % 11 = 10 -> 0,
        // second sum 6*3 = 18 -> 180 % 11 = 4.
        assert_eq!(
            validate_cpf("00000000600"),
            Err(CpfValidationError::SecondCheckDigitMismatch {
                expected: 4,
                found: 0
            })
        );
        assert_eq!(validate_cpf("00000000604"), Ok(()));
    }
}
