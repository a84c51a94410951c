//! Profile store for the `users` collection.

use std::sync::Arc;

use guava_market_core::SubjectId;

use super::{StoreError, USERS_COLLECTION};
use crate::clock::{Clock, format_timestamp};
use crate::firebase::{DocumentStore, FirebaseError, JsonMap};
use crate::models::UserProfile;

/// Store for user profile documents.
#[derive(Clone)]
pub struct ProfileStore {
    documents: Arc<dyn DocumentStore>,
    clock: Arc<dyn Clock>,
}

impl ProfileStore {
    /// Create a new profile store.
    #[must_use]
    pub const fn new(documents: Arc<dyn DocumentStore>, clock: Arc<dyn Clock>) -> Self {
        Self { documents, clock }
    }

    /// Create the caller's profile, or refresh it if one already exists.
    ///
    /// Always stamps `updatedAt` and `lastLoginAt`; stamps `createdAt` only
    /// on first creation, so a repeat call acts as a sign-in touch without
    /// rewriting the account's age.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Backend` if the backend request fails.
    pub async fn create_or_update(
        &self,
        subject: &SubjectId,
        mut fields: JsonMap,
    ) -> Result<UserProfile, StoreError> {
        let existing = self
            .documents
            .get(USERS_COLLECTION, subject.as_str())
            .await?;

        let now = format_timestamp(self.clock.now());
        fields.insert("updatedAt".to_string(), now.clone().into());
        fields.insert("lastLoginAt".to_string(), now.clone().into());
        if existing.is_none() {
            fields.insert("createdAt".to_string(), now.into());
        }

        let doc = self
            .documents
            .set_merge(USERS_COLLECTION, subject.as_str(), &fields)
            .await?;

        Ok(UserProfile::from_fields(subject.clone(), &doc.fields))
    }

    /// Fetch a profile, `None` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Backend` if the backend request fails.
    pub async fn get(&self, subject: &SubjectId) -> Result<Option<UserProfile>, StoreError> {
        let doc = self
            .documents
            .get(USERS_COLLECTION, subject.as_str())
            .await?;
        Ok(doc.map(|d| UserProfile::from_fields(subject.clone(), &d.fields)))
    }

    /// Merge fields into an existing profile, stamping `updatedAt`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the profile does not exist.
    pub async fn update(
        &self,
        subject: &SubjectId,
        mut fields: JsonMap,
    ) -> Result<UserProfile, StoreError> {
        fields.insert(
            "updatedAt".to_string(),
            format_timestamp(self.clock.now()).into(),
        );

        let doc = self
            .documents
            .update(USERS_COLLECTION, subject.as_str(), &fields)
            .await?;

        Ok(UserProfile::from_fields(subject.clone(), &doc.fields))
    }

    /// List every profile.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Backend` if the backend request fails.
    pub async fn list(&self) -> Result<Vec<UserProfile>, StoreError> {
        let docs = self.documents.list(USERS_COLLECTION).await?;
        docs.into_iter()
            .map(|doc| {
                let id = SubjectId::parse(&doc.id).map_err(|e| {
                    StoreError::Backend(FirebaseError::UnexpectedResponse(format!(
                        "bad document id in {USERS_COLLECTION}: {e}"
                    )))
                })?;
                Ok(UserProfile::from_fields(id, &doc.fields))
            })
            .collect()
    }

    /// Delete a profile. Succeeds whether or not it existed.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Backend` if the backend request fails.
    pub async fn delete(&self, subject: &SubjectId) -> Result<(), StoreError> {
        self.documents
            .delete(USERS_COLLECTION, subject.as_str())
            .await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::testing::{FixedClock, MemoryStore};

    fn subject(s: &str) -> SubjectId {
        SubjectId::parse(s).unwrap()
    }

    fn store() -> (ProfileStore, Arc<MemoryStore>, Arc<FixedClock>) {
        let documents = Arc::new(MemoryStore::new());
        let clock = Arc::new(FixedClock::default());
        let store = ProfileStore::new(
            Arc::clone(&documents) as Arc<dyn DocumentStore>,
            Arc::clone(&clock) as Arc<dyn Clock>,
        );
        (store, documents, clock)
    }

    fn fields(body: serde_json::Value) -> JsonMap {
        body.as_object().unwrap().clone()
    }

    #[tokio::test]
    async fn test_create_stamps_all_timestamps() {
        let (store, _, _) = store();
        let profile = store
            .create_or_update(&subject("abc"), fields(json!({"phoneNumber": "+15551234567"})))
            .await
            .unwrap();

        assert_eq!(profile.created_at.as_deref(), Some("2026-01-15T12:00:00.000Z"));
        assert_eq!(profile.updated_at, profile.created_at);
        assert_eq!(profile.last_login_at, profile.created_at);
        assert_eq!(profile.phone_number.as_deref(), Some("+15551234567"));
    }

    #[tokio::test]
    async fn test_repeat_create_preserves_created_at() {
        let (store, _, clock) = store();
        let first = store
            .create_or_update(&subject("abc"), fields(json!({"phoneNumber": "+15551234567"})))
            .await
            .unwrap();

        clock.advance(chrono::Duration::hours(2));
        let second = store
            .create_or_update(&subject("abc"), fields(json!({"phoneNumber": "+15551234567"})))
            .await
            .unwrap();

        assert_eq!(second.created_at, first.created_at);
        assert_eq!(second.last_login_at.as_deref(), Some("2026-01-15T14:00:00.000Z"));
        assert_ne!(second.last_login_at, first.last_login_at);
    }

    #[tokio::test]
    async fn test_update_missing_profile_is_not_found() {
        let (store, _, _) = store();
        let result = store
            .update(&subject("ghost"), fields(json!({"displayName": "Maya"})))
            .await;

        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_merges_and_stamps_updated_at() {
        let (store, _, clock) = store();
        store
            .create_or_update(&subject("abc"), fields(json!({"phoneNumber": "+15551234567"})))
            .await
            .unwrap();

        clock.advance(chrono::Duration::minutes(5));
        let updated = store
            .update(&subject("abc"), fields(json!({"displayName": "Maya"})))
            .await
            .unwrap();

        // Untouched fields survive the merge.
        assert_eq!(updated.phone_number.as_deref(), Some("+15551234567"));
        assert_eq!(updated.display_name.as_deref(), Some("Maya"));
        assert_eq!(updated.updated_at.as_deref(), Some("2026-01-15T12:05:00.000Z"));
        assert_eq!(updated.created_at.as_deref(), Some("2026-01-15T12:00:00.000Z"));
    }

    #[tokio::test]
    async fn test_get_missing_profile_is_none() {
        let (store, _, _) = store();
        assert!(store.get(&subject("ghost")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let (store, _, _) = store();
        store
            .create_or_update(&subject("abc"), JsonMap::new())
            .await
            .unwrap();

        store.delete(&subject("abc")).await.unwrap();
        store.delete(&subject("abc")).await.unwrap();
        assert!(store.get(&subject("abc")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_returns_all_profiles() {
        let (store, _, _) = store();
        store
            .create_or_update(&subject("a"), JsonMap::new())
            .await
            .unwrap();
        store
            .create_or_update(&subject("b"), JsonMap::new())
            .await
            .unwrap();

        let profiles = store.list().await.unwrap();
        assert_eq!(profiles.len(), 2);
    }
}
