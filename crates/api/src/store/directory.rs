//! Phone number directory lookups.

use std::sync::Arc;

use guava_market_core::PhoneNumber;

use super::{StoreError, USERS_COLLECTION};
use crate::firebase::DocumentStore;

/// Answers "is this phone number already registered?".
///
/// Backed by an equality query on the `phoneNumber` field of the `users`
/// collection, so it sees exactly what the profile store has written.
#[derive(Clone)]
pub struct UserDirectory {
    documents: Arc<dyn DocumentStore>,
}

impl UserDirectory {
    /// Create a new directory.
    #[must_use]
    pub const fn new(documents: Arc<dyn DocumentStore>) -> Self {
        Self { documents }
    }

    /// Whether any profile stores the given phone number.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Backend` if the backend request fails.
    pub async fn phone_exists(&self, phone: &PhoneNumber) -> Result<bool, StoreError> {
        let found = self
            .documents
            .find_eq(USERS_COLLECTION, "phoneNumber", phone.as_str())
            .await?;
        Ok(found.is_some())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::testing::MemoryStore;

    #[tokio::test]
    async fn test_phone_exists_after_registration() {
        let documents = Arc::new(MemoryStore::new());
        documents
            .insert(
                USERS_COLLECTION,
                "abc",
                json!({"phoneNumber": "+15551234567"}),
            )
            .await;
        let directory = UserDirectory::new(documents as Arc<dyn DocumentStore>);

        let phone = PhoneNumber::parse("+15551234567").unwrap();
        assert!(directory.phone_exists(&phone).await.unwrap());

        let other = PhoneNumber::parse("+15559999999").unwrap();
        assert!(!directory.phone_exists(&other).await.unwrap());
    }
}
