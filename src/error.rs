// src/error.rs
//! Error types shared by the gateway. Handlers translate these into HTTP
//! responses; the detail stays in the logs.

use thiserror::Error;

/// Startup configuration problems. Any of these stops the process before the
/// listener binds.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    MissingVar(&'static str),

    #[error("invalid PORT value '{0}'")]
    InvalidPort(String),

    #[error("unknown route '{0}' in GATEWAY_ROUTES")]
    UnknownRoute(String),

    #[error("GATEWAY_ROUTES enables no routes")]
    NoRoutes,
}

/// Failures talking to an outbound HTTP endpoint.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("request to upstream failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("upstream returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
}

/// Failures in the query log.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

/// Rejected request bodies.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Message is required")]
    MissingMessage,
}
