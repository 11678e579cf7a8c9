//! Registration use-case service.
//!
//! # Responsibility
//! - Run the registration pipeline: normalize, validate CPF, validate code,
//!   upsert.
//! - Map each failure to one distinct `RegistrationError` kind.
//!
//! # Invariants
//! - The first failing step wins; later steps do not run.
//! - Validation runs once per call and never touches the store.
//! - There is no retry and no rollback.

use crate::model::record::{Cpf, Record, RegistrationCode};
use crate::repo::record_repo::{RecordStore, RepoError};
use crate::validation::{normalize, CodeValidationError, CpfValidationError};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Failure of a single registration attempt.
#[derive(Debug)]
pub enum RegistrationError {
    /// Normalized identifier failed the CPF rules.
    InvalidIdentifier(CpfValidationError),
    /// Code does not have exactly 11 digits.
    InvalidCode(CodeValidationError),
    /// Persistence failed after validation passed.
    StorageFailure(RepoError),
}

impl RegistrationError {
    /// Stable short code used in log lines.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidIdentifier(_) => "invalid_identifier",
            Self::InvalidCode(_) => "invalid_code",
            Self::StorageFailure(_) => "storage_failure",
        }
    }
}

impl Display for RegistrationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidIdentifier(err) => write!(f, "invalid identifier: {err}"),
            Self::InvalidCode(err) => write!(f, "invalid code: {err}"),
            Self::StorageFailure(err) => write!(f, "storage failure: {err}"),
        }
    }
}

impl Error for RegistrationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidIdentifier(err) => Some(err),
            Self::InvalidCode(err) => Some(err),
            Self::StorageFailure(err) => Some(err),
        }
    }
}

impl From<CpfValidationError> for RegistrationError {
    fn from(value: CpfValidationError) -> Self {
        Self::InvalidIdentifier(value)
    }
}

impl From<CodeValidationError> for RegistrationError {
    fn from(value: CodeValidationError) -> Self {
        Self::InvalidCode(value)
    }
}

impl From<RepoError> for RegistrationError {
    fn from(value: RepoError) -> Self {
        Self::StorageFailure(value)
    }
}

/// Registration facade over a record store.
pub struct RegistrationService<S: RecordStore> {
    store: S,
}

impl<S: RecordStore> RegistrationService<S> {
    /// Creates a service over an already-opened store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Borrows the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Releases the store, e.g. to close it at shutdown.
    pub fn into_store(self) -> S {
        self.store
    }

    /// Registers `code` for the CPF found in `raw_identifier`.
    ///
    /// # Contract
    /// - `raw_identifier` may carry formatting; only ASCII digits are kept.
    /// - Repeated calls with the same CPF overwrite the stored code.
    /// - Returns the record as persisted.
    ///
    /// # Errors
    /// - `InvalidIdentifier` / `InvalidCode` when validation fails; the store
    ///   is left untouched.
    /// - `StorageFailure` when the upsert fails; the cause is logged.
    pub fn register(&self, raw_identifier: &str, code: i64) -> Result<Record, RegistrationError> {
        let started_at = Instant::now();
        let result = self.run_pipeline(raw_identifier, code);

        match &result {
            Ok(record) => info!(
                "event=registration module=service status=ok cpf={} duration_ms={}",
                record.identifier.masked(),
                started_at.elapsed().as_millis()
            ),
            Err(RegistrationError::StorageFailure(cause)) => error!(
                "event=registration module=service status=error error_code=storage_failure duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                cause
            ),
            Err(err) => info!(
                "event=registration module=service status=rejected error_code={} duration_ms={} reason={}",
                err.error_code(),
                started_at.elapsed().as_millis(),
                err
            ),
        }

        result
    }

    fn run_pipeline(&self, raw_identifier: &str, code: i64) -> Result<Record, RegistrationError> {
        let identifier = Cpf::new(normalize(raw_identifier))?;
        let code = RegistrationCode::new(code)?;
        self.store.upsert(&identifier, code)?;
        Ok(Record::new(identifier, code))
    }
}
