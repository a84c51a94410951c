//! Test fakes for the injected dependencies.
//!
//! A normal (non-`cfg(test)`) module so the integration-tests crate can
//! compose the real router around these fakes. Nothing in here is reachable
//! from production code paths; production wiring goes through
//! [`crate::state::AppState::from_config`].

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use guava_market_core::SubjectId;
use secrecy::SecretString;

use crate::clock::Clock;
use crate::config::{ApiConfig, FirebaseConfig, SentryConfig};
use crate::firebase::{DocumentStore, FirebaseError, IdentityProvider, JsonMap, StoredDocument};
use crate::models::IdentityClaim;
use crate::state::AppState;

// =============================================================================
// In-memory document store
// =============================================================================

/// In-memory [`DocumentStore`] with the same merge / precondition / delete
/// semantics the Firestore client exposes.
#[derive(Default)]
pub struct MemoryStore {
    collections: Mutex<HashMap<String, BTreeMap<String, JsonMap>>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a document directly, bypassing timestamp stamping.
    ///
    /// # Panics
    ///
    /// Panics if `fields` is not a JSON object.
    #[allow(clippy::unused_async)]
    pub async fn insert(&self, collection: &str, id: &str, fields: serde_json::Value) {
        let fields = fields
            .as_object()
            .expect("seed fields must be a JSON object")
            .clone();
        self.lock()
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), fields);
    }

    /// Number of documents currently in a collection.
    #[must_use]
    pub fn len(&self, collection: &str) -> usize {
        self.lock().get(collection).map_or(0, BTreeMap::len)
    }

    /// Whether a collection holds no documents.
    #[must_use]
    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, BTreeMap<String, JsonMap>>> {
        self.collections.lock().expect("store lock poisoned")
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<StoredDocument>, FirebaseError> {
        Ok(self
            .lock()
            .get(collection)
            .and_then(|docs| docs.get(id))
            .map(|fields| StoredDocument {
                id: id.to_string(),
                fields: fields.clone(),
            }))
    }

    async fn add(
        &self,
        collection: &str,
        fields: &JsonMap,
    ) -> Result<StoredDocument, FirebaseError> {
        let id = uuid::Uuid::new_v4().simple().to_string();
        self.lock()
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), fields.clone());
        Ok(StoredDocument {
            id,
            fields: fields.clone(),
        })
    }

    async fn set_merge(
        &self,
        collection: &str,
        id: &str,
        fields: &JsonMap,
    ) -> Result<StoredDocument, FirebaseError> {
        let mut collections = self.lock();
        let doc = collections
            .entry(collection.to_string())
            .or_default()
            .entry(id.to_string())
            .or_default();
        for (key, value) in fields {
            doc.insert(key.clone(), value.clone());
        }
        Ok(StoredDocument {
            id: id.to_string(),
            fields: doc.clone(),
        })
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: &JsonMap,
    ) -> Result<StoredDocument, FirebaseError> {
        let mut collections = self.lock();
        let doc = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| FirebaseError::NotFound(format!("document {collection}/{id}")))?;
        for (key, value) in fields {
            doc.insert(key.clone(), value.clone());
        }
        Ok(StoredDocument {
            id: id.to_string(),
            fields: doc.clone(),
        })
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), FirebaseError> {
        if let Some(docs) = self.lock().get_mut(collection) {
            docs.remove(id);
        }
        Ok(())
    }

    async fn list(&self, collection: &str) -> Result<Vec<StoredDocument>, FirebaseError> {
        Ok(self
            .lock()
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .map(|(id, fields)| StoredDocument {
                        id: id.clone(),
                        fields: fields.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn find_eq(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Option<StoredDocument>, FirebaseError> {
        Ok(self.lock().get(collection).and_then(|docs| {
            docs.iter()
                .find(|(_, fields)| {
                    fields.get(field).and_then(serde_json::Value::as_str) == Some(value)
                })
                .map(|(id, fields)| StoredDocument {
                    id: id.clone(),
                    fields: fields.clone(),
                })
        }))
    }
}

// =============================================================================
// Canned identity provider
// =============================================================================

/// [`IdentityProvider`] backed by a fixed token-to-claim table.
///
/// Unknown tokens are rejected the way the real provider rejects them, and
/// sign-ups allocate fresh subject IDs while refusing duplicate emails.
#[derive(Default)]
pub struct StaticIdentity {
    tokens: Mutex<HashMap<String, IdentityClaim>>,
    registered_emails: Mutex<Vec<String>>,
}

impl StaticIdentity {
    /// Create a provider that recognizes no tokens.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a token and the claim verifying it should yield.
    #[must_use]
    pub fn with_token(self, token: &str, claim: IdentityClaim) -> Self {
        self.tokens
            .lock()
            .expect("token lock poisoned")
            .insert(token.to_string(), claim);
        self
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentity {
    async fn verify_token(&self, token: &str) -> Result<IdentityClaim, FirebaseError> {
        self.tokens
            .lock()
            .expect("token lock poisoned")
            .get(token)
            .cloned()
            .ok_or_else(|| FirebaseError::InvalidToken("INVALID_ID_TOKEN".to_string()))
    }

    async fn sign_up(
        &self,
        email: &str,
        _password: &str,
        _display_name: Option<&str>,
    ) -> Result<SubjectId, FirebaseError> {
        let mut emails = self.registered_emails.lock().expect("email lock poisoned");
        if emails.iter().any(|e| e == email) {
            return Err(FirebaseError::CredentialRejected(
                "An account with this email already exists".to_string(),
            ));
        }
        emails.push(email.to_string());

        let uid = uuid::Uuid::new_v4().simple().to_string();
        SubjectId::parse(&uid)
            .map_err(|e| FirebaseError::UnexpectedResponse(format!("bad generated id: {e}")))
    }
}

// =============================================================================
// Fixed clock
// =============================================================================

/// A [`Clock`] pinned to a known instant, advanced explicitly by tests.
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl Default for FixedClock {
    /// Starts at `2026-01-15T12:00:00Z`.
    fn default() -> Self {
        Self {
            now: Mutex::new(
                Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0)
                    .single()
                    .expect("valid base instant"),
            ),
        }
    }
}

impl FixedClock {
    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().expect("clock lock poisoned");
        *now += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().expect("clock lock poisoned")
    }
}

// =============================================================================
// State assembly helpers
// =============================================================================

/// An [`AppState`] wired to fakes, with handles kept for assertions.
pub struct TestState {
    pub state: AppState,
    pub documents: Arc<MemoryStore>,
    pub clock: Arc<FixedClock>,
}

/// Build a configuration that never touches the network or the environment.
#[must_use]
pub fn test_config() -> ApiConfig {
    ApiConfig {
        host: std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
        port: 0,
        firebase: FirebaseConfig {
            project_id: "demo-test".to_string(),
            web_api_key: SecretString::from("test-key"),
            firestore_token: None,
            auth_emulator_host: None,
            firestore_emulator_host: None,
        },
        sentry: SentryConfig {
            dsn: None,
            environment: "test".to_string(),
            sample_rate: 1.0,
            traces_sample_rate: 0.0,
        },
    }
}

/// Assemble application state around the given identity fake, an empty
/// in-memory store, and a fixed clock.
#[must_use]
pub fn test_state(identity: StaticIdentity) -> TestState {
    let documents = Arc::new(MemoryStore::new());
    let clock = Arc::new(FixedClock::default());
    let state = AppState::new(
        test_config(),
        Arc::new(identity),
        Arc::clone(&documents) as Arc<dyn DocumentStore>,
        Arc::clone(&clock) as Arc<dyn Clock>,
    );

    TestState {
        state,
        documents,
        clock,
    }
}

/// A minimal claim for the given subject, no phone or email attached.
///
/// # Panics
///
/// Panics if `subject` is not a valid subject ID.
#[must_use]
pub fn claim(subject: &str) -> IdentityClaim {
    IdentityClaim {
        subject: SubjectId::parse(subject).expect("valid subject id"),
        phone: None,
        email: None,
        email_verified: false,
        phone_verified: false,
    }
}

/// A claim carrying a verified phone number and email.
///
/// # Panics
///
/// Panics if `subject` is not a valid subject ID.
#[must_use]
pub fn claim_with_contact(subject: &str, phone: &str, email: &str) -> IdentityClaim {
    IdentityClaim {
        subject: SubjectId::parse(subject).expect("valid subject id"),
        phone: Some(phone.to_string()),
        email: Some(email.to_string()),
        email_verified: true,
        phone_verified: true,
    }
}
