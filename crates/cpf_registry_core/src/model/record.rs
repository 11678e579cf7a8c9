//! Registration record model.
//!
//! # Responsibility
//! - Define `Record`, the single row kept per CPF.
//! - Provide validated constructors for the identifier and code.
//!
//! # Invariants
//! - `Record.identifier` is the primary key and never changes once stored.
//! - Constructors validate; fields are not mutable from outside the crate.

use crate::validation::{
    normalize, validate_code, validate_cpf, CodeValidationError, CpfValidationError,
};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Validation failure for record construction or persisted-row checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordValidationError {
    Identifier(CpfValidationError),
    Code(CodeValidationError),
}

impl Display for RecordValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Identifier(err) => write!(f, "invalid identifier: {err}"),
            Self::Code(err) => write!(f, "invalid code: {err}"),
        }
    }
}

impl Error for RecordValidationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Identifier(err) => Some(err),
            Self::Code(err) => Some(err),
        }
    }
}

impl From<CpfValidationError> for RecordValidationError {
    fn from(value: CpfValidationError) -> Self {
        Self::Identifier(value)
    }
}

impl From<CodeValidationError> for RecordValidationError {
    fn from(value: CodeValidationError) -> Self {
        Self::Code(value)
    }
}

/// Normalized, check-digit-valid CPF.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Cpf(String);

impl Cpf {
    /// Wraps an already-normalized CPF after validating it.
    ///
    /// Formatting characters are rejected here; use [`Cpf::parse`] for
    /// free-form input.
    ///
    /// # Errors
    /// Returns the first check-digit rule that `digits` violates.
    pub fn new(digits: impl Into<String>) -> Result<Self, CpfValidationError> {
        let digits = digits.into();
        validate_cpf(&digits)?;
        Ok(Self(digits))
    }

    /// Normalizes free-form input, then validates it.
    ///
    /// # Errors
    /// Returns the first check-digit rule the normalized value violates.
    pub fn parse(raw: &str) -> Result<Self, CpfValidationError> {
        Self::new(normalize(raw))
    }

    /// Returns the 11-digit canonical form.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns a log-safe rendering that hides the leading and trailing
    /// digits, e.g. `***.444.777-**`.
    pub fn masked(&self) -> String {
        format!("***.{}.{}-**", &self.0[3..6], &self.0[6..9])
    }
}

impl Display for Cpf {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}.{}.{}-{}",
            &self.0[..3],
            &self.0[3..6],
            &self.0[6..9],
            &self.0[9..]
        )
    }
}

impl TryFrom<String> for Cpf {
    type Error = CpfValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Cpf> for String {
    fn from(value: Cpf) -> Self {
        value.0
    }
}

/// Eleven-digit registration code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct RegistrationCode(i64);

impl RegistrationCode {
    /// # Errors
    /// Returns an error when `value` does not have exactly 11 digits.
    pub fn new(value: i64) -> Result<Self, CodeValidationError> {
        validate_code(value)?;
        Ok(Self(value))
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for RegistrationCode {
    type Error = CodeValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RegistrationCode> for i64 {
    fn from(value: RegistrationCode) -> Self {
        value.0
    }
}

/// Persisted registration: one per CPF.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Primary key. Serialized as `cpf` to match the wire and table naming.
    #[serde(rename = "cpf")]
    pub identifier: Cpf,
    /// Last code written for this CPF.
    #[serde(rename = "numero")]
    pub code: RegistrationCode,
}

impl Record {
    pub fn new(identifier: Cpf, code: RegistrationCode) -> Self {
        Self { identifier, code }
    }

    /// Builds a record from raw stored values, re-running both validators.
    ///
    /// Used on read paths so corrupted rows surface instead of being masked.
    ///
    /// # Errors
    /// Returns the identifier error first, then the code error.
    pub fn from_raw(identifier: &str, code: i64) -> Result<Self, RecordValidationError> {
        Ok(Self {
            identifier: Cpf::new(identifier)?,
            code: RegistrationCode::new(code)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{Cpf, Record, RecordValidationError, RegistrationCode};
    use crate::validation::{CodeValidationError, CpfValidationError};

    #[test]
    fn parse_normalizes_before_validating() {
        let cpf = Cpf::parse("111.444.777-35").unwrap();
        assert_eq!(cpf.as_str(), "11144477735");
        assert_eq!(cpf.to_string(), "111.444.777-35");
    }

    #[test]
    fn new_rejects_formatted_input() {
        assert_eq!(
            Cpf::new("111.444.777-35"),
            Err(CpfValidationError::InvalidLength(14))
        );
    }

    #[test]
    fn masked_hides_leading_and_check_digits() {
        let cpf = Cpf::new("52998224725").unwrap();
        assert_eq!(cpf.masked(), "***.982.247-**");
    }

    #[test]
    fn from_raw_reports_identifier_before_code() {
        assert_eq!(
            Record::from_raw("00000000000", 1),
            Err(RecordValidationError::Identifier(
                CpfValidationError::RepeatedDigits
            ))
        );
        assert_eq!(
            Record::from_raw("11144477735", 1),
            Err(RecordValidationError::Code(
                CodeValidationError::InvalidDigitCount(1)
            ))
        );
    }

    #[test]
    fn serde_uses_wire_field_names_and_validates() {
        let record = Record::new(
            Cpf::new("11144477735").unwrap(),
            RegistrationCode::new(12_345_678_901).unwrap(),
        );
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "cpf": "11144477735", "numero": 12_345_678_901_i64 })
        );

        let bad = serde_json::from_value::<Record>(
            serde_json::json!({ "cpf": "11111111111", "numero": 12_345_678_901_i64 }),
        );
        assert!(bad.is_err());
    }
}
