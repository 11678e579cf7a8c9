use cpf_registry_core::LogTarget;
use cpf_registry_http::{run, ServerConfig, ServerError};
use std::time::Duration;

#[tokio::test]
async fn run_fails_fast_when_database_cannot_be_opened() {
    let dir = tempfile::tempdir().unwrap();
    let config = ServerConfig {
        bind: "127.0.0.1:0".parse().unwrap(),
        db_path: dir.path().join("missing").join("dados.db"),
        log_level: "info".to_string(),
        log_target: LogTarget::Stderr,
    };

    let result = tokio::time::timeout(Duration::from_secs(10), run(config))
        .await
        .expect("startup failure should not hang");
    assert!(matches!(result, Err(ServerError::Store(_))));
}
