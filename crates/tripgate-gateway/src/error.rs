use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GatewayError>;

/// Startup failures.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("failed to read domain table {path}: {source}")]
    DomainsIo {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse domain table: {0}")]
    DomainsYaml(#[from] serde_yaml::Error),
    #[error("host {host} is mapped to both {first} and {second}")]
    ConflictingHost {
        host: String,
        first: String,
        second: String,
    },
    #[error("failed to initialise logging: {0}")]
    Telemetry(String),
}

/// Request failures that reach the client.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("not found")]
    NotFound,
    #[error("unknown host {0}")]
    UnknownHost(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound | AppError::UnknownHost(_) => {
                (StatusCode::NOT_FOUND, "404 page not found").into_response()
            }
        }
    }
}
