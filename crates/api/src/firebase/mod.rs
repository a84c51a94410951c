//! Firebase Identity Toolkit and Firestore REST clients.
//!
//! # Architecture
//!
//! - Plain REST over `reqwest` - no service-account SDK, no gRPC
//! - Firebase is source of truth - NO local persistence, direct API calls
//! - Both clients are injected behind traits ([`auth::IdentityProvider`],
//!   [`firestore::DocumentStore`]) so handlers never construct them
//!
//! # APIs
//!
//! ## Identity Toolkit
//! - ID token verification (`accounts:lookup`)
//! - Email/password account creation (`accounts:signUp`)
//! - Authenticated with the project's web API key
//!
//! ## Firestore
//! - Document CRUD, collection listing, single-field equality queries
//! - Field values cross the wire in Firestore's typed-value envelope,
//!   converted to plain JSON at the client boundary ([`convert`])
//!
//! Both clients honor the standard emulator environment variables and
//! switch their base URL to the emulator when one is configured.

pub mod auth;
pub mod convert;
pub mod firestore;
pub mod types;

pub use auth::{IdentityProvider, IdentityToolkitClient};
pub use firestore::{DocumentStore, FirestoreClient, StoredDocument};
pub use types::{Document, Value};

use thiserror::Error;

/// A JSON object, as stored in document fields.
pub type JsonMap = serde_json::Map<String, serde_json::Value>;

/// Errors that can occur when interacting with Firebase APIs.
#[derive(Debug, Error)]
pub enum FirebaseError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Firebase returned a non-success status.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code of the response.
        status: u16,
        /// Error message extracted from the response body.
        message: String,
    },

    /// Firebase returned a well-formed response the client cannot use.
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    /// The ID token was rejected.
    #[error("{0}")]
    InvalidToken(String),

    /// Sign-up credentials were rejected.
    #[error("{0}")]
    CredentialRejected(String),

    /// Document not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Extract the error message from a Firebase error response body.
///
/// Both APIs wrap failures in `{"error": {"message": "...", ...}}`; falls
/// back to the raw body when the envelope is absent.
pub(crate) fn api_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")?
                .get("message")
                .and_then(serde_json::Value::as_str)
                .map(String::from)
        })
        .unwrap_or_else(|| body.trim().to_string())
}
