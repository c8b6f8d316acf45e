//! Error types for the RPC service.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use linden_types::{RpcError, RpcResponse, ERR_INVALID_JSON, ERR_MISSING_PARAMS};
use thiserror::Error;

/// Service-level errors: startup and configuration, never per-request.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Route table construction error
    #[error("Routing error: {0}")]
    Routing(#[from] linden_routing::RoutingError),

    /// Server startup error
    #[error("Server error: {0}")]
    Server(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Transport-level malformed-input errors. Always 400 with a fixed message,
/// not customizable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("Request body is not valid JSON")]
    InvalidJson,

    #[error("Request body is missing the 'params' key")]
    MissingParams,
}

impl TransportError {
    fn message(self) -> &'static str {
        match self {
            TransportError::InvalidJson => ERR_INVALID_JSON,
            TransportError::MissingParams => ERR_MISSING_PARAMS,
        }
    }
}

impl IntoResponse for TransportError {
    fn into_response(self) -> Response {
        let body = RpcResponse::err(RpcError::new(self.message()));
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}

/// Result type alias for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;
