//! HTTP routes for the registry.
//!
//! # Responsibility
//! - Decode `POST /registro` bodies and hand them to the registration service.
//! - Map each registration outcome to its status code and message.
//! - Answer CORS preflight and reject other methods before the core runs.
//!
//! # Invariants
//! - Response bodies are stable plain-text messages; clients match on them.
//! - SQLite work never runs on an async worker thread.

use crate::request::decode_registration;
use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::{Request, State};
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    ALLOW,
};
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;
use cpf_registry_core::{RecordStore, RegistrationError, RegistrationService};
use log::{debug, error, info};
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

pub const REGISTRATION_PATH: &str = "/registro";

pub const MSG_SAVED: &str = "Registro válido salvo com sucesso";
pub const MSG_METHOD_NOT_ALLOWED: &str = "Método não permitido";
pub const MSG_MALFORMED_JSON: &str = "Erro ao ler JSON";
pub const MSG_INVALID_CPF: &str = "CPF inválido";
pub const MSG_INVALID_CODE: &str = "O numero deve ter exatamente 11 dígitos";
pub const MSG_STORAGE_FAILURE: &str = "Erro ao salvar no banco";

const CORS_ALLOW_ORIGIN: &str = "*";
const CORS_ALLOW_METHODS: &str = "POST, GET, OPTIONS, PUT, DELETE";
const CORS_ALLOW_HEADERS: &str = "Content-Type, Authorization";

/// Builds the application router around a shared registration service.
pub fn build_router<S>(service: Arc<RegistrationService<S>>) -> Router
where
    S: RecordStore + Send + Sync + 'static,
{
    let registration = post(register::<S>)
        .fallback(method_not_allowed)
        .layer(middleware::from_fn(cors));

    Router::new()
        .route(REGISTRATION_PATH, registration)
        .layer(middleware::from_fn(log_request))
        .with_state(service)
}

async fn register<S>(
    State(service): State<Arc<RegistrationService<S>>>,
    body: Result<Bytes, BytesRejection>,
) -> Response
where
    S: RecordStore + Send + Sync + 'static,
{
    // Oversized or unreadable bodies are reported like undecodable JSON.
    let body = match body {
        Ok(body) => body,
        Err(rejection) => {
            debug!(
                "event=registration_decode module=http status=rejected error_code=body_unreadable error={}",
                rejection.body_text()
            );
            return error_response(StatusCode::BAD_REQUEST, MSG_MALFORMED_JSON);
        }
    };

    let request = match decode_registration(&body) {
        Ok(request) => request,
        Err(err) => {
            debug!(
                "event=registration_decode module=http status=rejected error_code=malformed_json error={}",
                err
            );
            return error_response(StatusCode::BAD_REQUEST, MSG_MALFORMED_JSON);
        }
    };

    let outcome = tokio::task::spawn_blocking(move || {
        service.register(&request.cpf, request.numero)
    })
    .await;

    match outcome {
        Ok(Ok(_record)) => (StatusCode::OK, MSG_SAVED).into_response(),
        Ok(Err(err)) => registration_error_response(&err),
        Err(join_err) => {
            error!(
                "event=registration module=http status=error error_code=worker_failed error={}",
                join_err
            );
            error_response(StatusCode::INTERNAL_SERVER_ERROR, MSG_STORAGE_FAILURE)
        }
    }
}

fn registration_error_response(err: &RegistrationError) -> Response {
    match err {
        RegistrationError::InvalidIdentifier(_) => {
            error_response(StatusCode::BAD_REQUEST, MSG_INVALID_CPF)
        }
        RegistrationError::InvalidCode(_) => {
            error_response(StatusCode::BAD_REQUEST, MSG_INVALID_CODE)
        }
        RegistrationError::StorageFailure(_) => {
            error_response(StatusCode::INTERNAL_SERVER_ERROR, MSG_STORAGE_FAILURE)
        }
    }
}

async fn method_not_allowed() -> Response {
    let mut response = error_response(StatusCode::METHOD_NOT_ALLOWED, MSG_METHOD_NOT_ALLOWED);
    response
        .headers_mut()
        .insert(ALLOW, HeaderValue::from_static("POST, OPTIONS"));
    response
}

/// Plain-text error body terminated by a newline.
fn error_response(status: StatusCode, message: &str) -> Response {
    (status, format!("{message}\n")).into_response()
}

/// Adds CORS headers and answers preflight without reaching the handler.
async fn cors(request: Request, next: Next) -> Response {
    let mut response = if request.method() == Method::OPTIONS {
        StatusCode::OK.into_response()
    } else {
        next.run(request).await
    };
    apply_cors_headers(response.headers_mut());
    response
}

fn apply_cors_headers(headers: &mut HeaderMap) {
    headers.insert(
        ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static(CORS_ALLOW_ORIGIN),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(CORS_ALLOW_METHODS),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(CORS_ALLOW_HEADERS),
    );
}

async fn log_request(request: Request, next: Next) -> Response {
    let started_at = Instant::now();
    let request_id = Uuid::new_v4();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;

    info!(
        "event=http_request module=http request_id={} method={} path={} status={} duration_ms={}",
        request_id,
        method,
        path,
        response.status().as_u16(),
        started_at.elapsed().as_millis()
    );
    response
}
