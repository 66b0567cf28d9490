//! Error types for the server.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use zoltar_oauth::OAuthError;

/// Server error type.
#[derive(Debug, Error)]
pub enum ServerError {
    /// OAuth callback did not match the pending authorization.
    #[error("Bad state/code")]
    StateMismatch,

    /// Webhook signature did not verify.
    #[error("Bad signature")]
    SignatureInvalid,

    /// Bad request.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Token exchange or persistence failed.
    #[error("OAuth failed: {0}")]
    OAuth(OAuthError),

    /// A verified webhook could not be processed.
    #[error("Webhook processing failed: {0}")]
    Processing(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<OAuthError> for ServerError {
    fn from(e: OAuthError) -> Self {
        match e {
            OAuthError::StateMismatch => ServerError::StateMismatch,
            other => ServerError::OAuth(other),
        }
    }
}

/// Result type for server operations.
pub type Result<T> = std::result::Result<T, ServerError>;

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ServerError::StateMismatch => (StatusCode::BAD_REQUEST, "state_mismatch"),
            ServerError::SignatureInvalid => (StatusCode::UNAUTHORIZED, "signature_invalid"),
            ServerError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            ServerError::OAuth(_) => (StatusCode::INTERNAL_SERVER_ERROR, "oauth_failed"),
            ServerError::Processing(_) => (StatusCode::INTERNAL_SERVER_ERROR, "processing_failed"),
            ServerError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        };

        let detail = self.to_string();

        // Processing and internal detail is logged, never returned.
        let message = match &self {
            ServerError::Processing(_) | ServerError::Internal(_) => {
                tracing::error!(status = %status, code, error = %detail, "Server error");
                "Internal server error".to_string()
            }
            ServerError::OAuth(_) => {
                tracing::error!(status = %status, code, error = %detail, "Server error");
                detail
            }
            _ => {
                tracing::warn!(status = %status, code, error = %detail, "Client error");
                detail
            }
        };

        let body = ErrorResponse {
            code: code.to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}
