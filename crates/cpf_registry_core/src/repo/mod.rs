//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the keyed-store contract the registration service depends on.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository writes only accept validated domain values.
//! - Storage failures surface as `RepoError`, never as validation errors.

pub mod record_repo;
