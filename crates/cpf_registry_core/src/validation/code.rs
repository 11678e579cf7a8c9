//! Registration code shape validation.
//!
//! The code is carried as `i64`, so leading zeros are not representable:
//! `01234567890` arrives as `1234567890` and is rejected as too short.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Required decimal digit count of a registration code.
pub const CODE_DIGITS: usize = 11;

/// Reason a registration code was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeValidationError {
    /// Decimal representation (sign excluded) has the wrong number of digits.
    InvalidDigitCount(usize),
}

impl Display for CodeValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDigitCount(count) => write!(
                f,
                "code must have exactly {CODE_DIGITS} digits, got {count}"
            ),
        }
    }
}

impl Error for CodeValidationError {}

/// Validates that `code` has exactly 11 decimal digits.
///
/// Negative codes are measured by absolute value, so `-12345678901` passes.
///
/// # Errors
/// Returns [`CodeValidationError::InvalidDigitCount`] otherwise.
pub fn validate_code(code: i64) -> Result<(), CodeValidationError> {
    let count = decimal_digit_count(code);
    if count != CODE_DIGITS {
        return Err(CodeValidationError::InvalidDigitCount(count));
    }
    Ok(())
}

/// Returns whether `code` has exactly 11 decimal digits.
#[must_use]
pub fn is_valid_code(code: i64) -> bool {
    validate_code(code).is_ok()
}

fn decimal_digit_count(code: i64) -> usize {
    // unsigned_abs keeps i64::MIN representable.
    code.unsigned_abs().to_string().len()
}

#[cfg(test)]
mod tests {
    use super::{decimal_digit_count, is_valid_code, validate_code, CodeValidationError};

    #[test]
    fn accepts_eleven_digit_codes() {
        assert!(is_valid_code(12_345_678_901));
        assert!(is_valid_code(10_000_000_000));
        assert!(is_valid_code(99_999_999_999));
    }

    #[test]
    fn rejects_ten_and_twelve_digit_codes() {
        assert_eq!(
            validate_code(1_234_567_890),
            Err(CodeValidationError::InvalidDigitCount(10))
        );
        assert_eq!(
            validate_code(123_456_789_012),
            Err(CodeValidationError::InvalidDigitCount(12))
        );
    }

    #[test]
    fn zero_has_one_digit() {
        assert_eq!(
            validate_code(0),
            Err(CodeValidationError::InvalidDigitCount(1))
        );
    }

    #[test]
    fn negative_codes_are_measured_without_sign() {
        assert!(is_valid_code(-12_345_678_901));
        assert!(!is_valid_code(-1_234_567_890));
    }

    #[test]
    fn extreme_values_do_not_overflow() {
        assert_eq!(decimal_digit_count(i64::MIN), 19);
        assert_eq!(decimal_digit_count(i64::MAX), 19);
        assert!(!is_valid_code(i64::MIN));
    }
}
