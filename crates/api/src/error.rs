//! Unified error handling with Sentry integration.
//!
//! Provides a unified `ApiError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, ApiError>`.
//!
//! Every error renders the same JSON envelope:
//! `{"success": false, "error": "...", "message": "..."}` (message optional).

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::firebase::FirebaseError;
use crate::store::StoreError;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Document store operation failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Identity provider operation failed.
    #[error("Provider error: {0}")]
    Provider(#[from] FirebaseError),

    /// Bearer token was rejected.
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Operation is handled client-side, not by this server.
    #[error("Not supported: {0}")]
    NotSupported(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Wrap a provider error from token verification as an auth failure.
    ///
    /// Token verification failures are client errors (401), never server
    /// errors, even when the provider call itself failed.
    #[must_use]
    pub fn invalid_token(err: FirebaseError) -> Self {
        Self::InvalidToken(err.to_string())
    }

    const fn is_server_error(&self) -> bool {
        match self {
            Self::Store(StoreError::Backend(_)) | Self::Internal(_) => true,
            Self::Provider(err) => !matches!(
                err,
                FirebaseError::InvalidToken(_)
                    | FirebaseError::CredentialRejected(_)
                    | FirebaseError::NotFound(_)
            ),
            _ => false,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let (status, error, message) = match self {
            Self::Store(StoreError::NotFound(_)) => {
                (StatusCode::NOT_FOUND, "Not found".to_string(), None)
            }
            Self::Store(StoreError::Backend(_)) | Self::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
                None,
            ),
            Self::Provider(FirebaseError::InvalidToken(msg)) | Self::InvalidToken(msg) => (
                StatusCode::UNAUTHORIZED,
                "Invalid token".to_string(),
                Some(msg),
            ),
            Self::Provider(FirebaseError::CredentialRejected(msg)) => {
                (StatusCode::BAD_REQUEST, msg, None)
            }
            Self::Provider(FirebaseError::NotFound(_)) => {
                (StatusCode::NOT_FOUND, "Not found".to_string(), None)
            }
            Self::Provider(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
                None,
            ),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, None),
            Self::NotSupported(msg) => (StatusCode::NOT_IMPLEMENTED, msg, None),
        };

        let mut body = json!({
            "success": false,
            "error": error,
        });
        if let (Some(obj), Some(message)) = (body.as_object_mut(), message) {
            obj.insert("message".to_string(), json!(message));
        }

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `ApiError`.
pub type Result<T> = std::result::Result<T, ApiError>;
