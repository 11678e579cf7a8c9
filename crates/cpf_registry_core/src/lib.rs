//! Core domain logic for the CPF registry.
//! This crate is the single source of truth for registration invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod validation;

pub use logging::{default_log_level, init_logging, logging_status, LogTarget};
pub use model::record::{Cpf, Record, RecordValidationError, RegistrationCode};
pub use repo::record_repo::{RecordStore, RepoError, RepoResult, SqliteRecordStore};
pub use service::registration_service::{RegistrationError, RegistrationService};
pub use validation::{
    is_valid_code, is_valid_cpf, normalize, validate_code, validate_cpf, CodeValidationError,
    CpfValidationError,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
