//! HTTP surface for the CPF registry.
//!
//! # Responsibility
//! - Expose `POST /registro` over axum.
//! - Own process configuration and server lifecycle.
//!
//! # Invariants
//! - All registration semantics live in `cpf_registry_core`; this crate only
//!   translates between HTTP and the registration service.

#![forbid(unsafe_code)]

pub mod config;
pub mod request;
pub mod routes;
pub mod server;

pub use config::{ConfigError, ServerConfig};
pub use request::{decode_registration, RegistrationRequest};
pub use routes::{build_router, REGISTRATION_PATH};
pub use server::{run, run_from_env, ServerError};
