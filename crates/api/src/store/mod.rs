//! Document store operations over Firestore collections.
//!
//! # Collections
//!
//! - `users` - User profiles, keyed by the owning account's subject ID
//! - `orders` - Orders, store-generated IDs
//!
//! Each store wraps the injected [`DocumentStore`] trait object rather than
//! constructing a client, and owns the timestamp stamping rules for its
//! collection (`createdAt` / `updatedAt` / `lastLoginAt` as string fields).

pub mod directory;
pub mod orders;
pub mod profiles;

pub use directory::UserDirectory;
pub use orders::OrderStore;
pub use profiles::ProfileStore;

use thiserror::Error;

use crate::firebase::FirebaseError;

/// Collection holding user profile documents.
pub const USERS_COLLECTION: &str = "users";

/// Collection holding order documents.
pub const ORDERS_COLLECTION: &str = "orders";

/// Errors from store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend request failed.
    #[error("Backend error: {0}")]
    Backend(FirebaseError),

    /// The addressed document does not exist.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<FirebaseError> for StoreError {
    fn from(err: FirebaseError) -> Self {
        match err {
            FirebaseError::NotFound(context) => Self::NotFound(context),
            other => Self::Backend(other),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_not_found_becomes_store_not_found() {
        let err = StoreError::from(FirebaseError::NotFound("document users/abc".to_string()));
        assert!(matches!(err, StoreError::NotFound(ctx) if ctx == "document users/abc"));
    }

    #[test]
    fn test_other_backend_errors_stay_backend() {
        let err = StoreError::from(FirebaseError::Api {
            status: 500,
            message: "boom".to_string(),
        });
        assert!(matches!(err, StoreError::Backend(_)));
    }
}
