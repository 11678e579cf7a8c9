//! Process lifecycle: open the store, serve, drain, close.
//!
//! # Invariants
//! - Exactly one `SqliteRecordStore` exists per process; requests share it.
//! - The store is closed only after the listener has stopped and in-flight
//!   requests have drained.

use crate::config::{ConfigError, ServerConfig};
use crate::routes::build_router;
use cpf_registry_core::{init_logging, RegistrationService, RepoError, SqliteRecordStore};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

#[derive(Debug)]
pub enum ServerError {
    Config(ConfigError),
    Logging(String),
    Store(RepoError),
    Io(std::io::Error),
}

impl Display for ServerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "invalid configuration: {err}"),
            Self::Logging(message) => write!(f, "logging setup failed: {message}"),
            Self::Store(err) => write!(f, "record store failed: {err}"),
            Self::Io(err) => write!(f, "server i/o failed: {err}"),
        }
    }
}

impl Error for ServerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Logging(_) => None,
            Self::Store(err) => Some(err),
            Self::Io(err) => Some(err),
        }
    }
}

impl From<ConfigError> for ServerError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<RepoError> for ServerError {
    fn from(value: RepoError) -> Self {
        Self::Store(value)
    }
}

impl From<std::io::Error> for ServerError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// Runs the registry until SIGINT/SIGTERM, using settings from the
/// environment.
pub async fn run_from_env() -> Result<(), ServerError> {
    let config = ServerConfig::from_env()?;
    init_logging(&config.log_level, config.log_target.clone()).map_err(ServerError::Logging)?;
    run(config).await
}

/// Serves `config` until a shutdown signal arrives. Logging must already
/// be initialized by the caller.
pub async fn run(config: ServerConfig) -> Result<(), ServerError> {
    let store = SqliteRecordStore::open(&config.db_path)?;
    let service = Arc::new(RegistrationService::new(store));
    let app = build_router(Arc::clone(&service));

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    info!(
        "event=server_start module=server status=ok addr={} db_path={}",
        listener.local_addr()?,
        config.db_path.display()
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    match Arc::try_unwrap(service) {
        Ok(service) => service.into_store().close()?,
        Err(_) => warn!(
            "event=server_stop module=server status=degraded reason=store_still_shared"
        ),
    }
    info!("event=server_stop module=server status=ok");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(
                "event=signal_install module=server status=error signal=ctrl_c error={}",
                err
            );
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                warn!(
                    "event=signal_install module=server status=error signal=sigterm error={}",
                    err
                );
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    info!("event=server_stop module=server status=start reason=signal");
}
