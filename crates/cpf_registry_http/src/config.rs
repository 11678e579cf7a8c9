//! Environment-driven server configuration.
//!
//! # Responsibility
//! - Resolve bind address, database path and logging settings.
//! - Report the offending variable when a value cannot be used.
//!
//! # Invariants
//! - Unset variables fall back to defaults; set-but-invalid values are errors.

use cpf_registry_core::{default_log_level, LogTarget};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;
use std::path::PathBuf;

pub const BIND_VAR: &str = "CPF_REGISTRY_BIND";
pub const DB_PATH_VAR: &str = "CPF_REGISTRY_DB_PATH";
pub const LOG_LEVEL_VAR: &str = "CPF_REGISTRY_LOG_LEVEL";
pub const LOG_DIR_VAR: &str = "CPF_REGISTRY_LOG_DIR";

const DEFAULT_BIND: &str = "0.0.0.0:7531";
const DEFAULT_DB_PATH: &str = "./dados.db";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidBind { value: String, reason: String },
    EmptyDbPath,
    InvalidLogDir(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidBind { value, reason } => {
                write!(f, "{BIND_VAR}=`{value}` is not a socket address: {reason}")
            }
            Self::EmptyDbPath => write!(f, "{DB_PATH_VAR} cannot be empty"),
            Self::InvalidLogDir(reason) => write!(f, "{LOG_DIR_VAR}: {reason}"),
        }
    }
}

impl Error for ConfigError {}

/// Resolved settings for one server process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub db_path: PathBuf,
    /// Validated later by `init_logging`.
    pub log_level: String,
    pub log_target: LogTarget,
}

impl ServerConfig {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads configuration through `lookup`, which maps a variable name to
    /// its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_text = lookup(BIND_VAR).unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind = bind_text
            .trim()
            .parse::<SocketAddr>()
            .map_err(|err| ConfigError::InvalidBind {
                value: bind_text.clone(),
                reason: err.to_string(),
            })?;

        let db_path = match lookup(DB_PATH_VAR) {
            Some(value) if value.trim().is_empty() => return Err(ConfigError::EmptyDbPath),
            Some(value) => PathBuf::from(value.trim()),
            None => PathBuf::from(DEFAULT_DB_PATH),
        };

        let log_level = lookup(LOG_LEVEL_VAR)
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| default_log_level().to_string());

        let log_target = match lookup(LOG_DIR_VAR) {
            Some(value) if !value.trim().is_empty() => {
                LogTarget::directory(&value).map_err(ConfigError::InvalidLogDir)?
            }
            _ => LogTarget::Stderr,
        };

        Ok(Self {
            bind,
            db_path,
            log_level,
            log_target,
        })
    }
}
