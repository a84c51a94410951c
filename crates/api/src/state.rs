//! Application state shared across handlers.

use std::sync::Arc;

use crate::clock::{Clock, SystemClock};
use crate::config::ApiConfig;
use crate::firebase::{DocumentStore, FirestoreClient, IdentityProvider, IdentityToolkitClient};
use crate::store::{OrderStore, ProfileStore, UserDirectory};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// injected identity provider, document store, and the stores built on it.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ApiConfig,
    identity: Arc<dyn IdentityProvider>,
    documents: Arc<dyn DocumentStore>,
    profiles: ProfileStore,
    directory: UserDirectory,
    orders: OrderStore,
}

impl AppState {
    /// Create application state with the production Firebase clients.
    #[must_use]
    pub fn from_config(config: ApiConfig) -> Self {
        let identity = Arc::new(IdentityToolkitClient::new(&config.firebase));
        let documents = Arc::new(FirestoreClient::new(&config.firebase));
        Self::new(config, identity, documents, Arc::new(SystemClock))
    }

    /// Create application state from injected dependencies.
    ///
    /// Tests pass fakes here; production goes through [`Self::from_config`].
    #[must_use]
    pub fn new(
        config: ApiConfig,
        identity: Arc<dyn IdentityProvider>,
        documents: Arc<dyn DocumentStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let profiles = ProfileStore::new(Arc::clone(&documents), Arc::clone(&clock));
        let directory = UserDirectory::new(Arc::clone(&documents));
        let orders = OrderStore::new(Arc::clone(&documents), clock);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                identity,
                documents,
                profiles,
                directory,
                orders,
            }),
        }
    }

    /// Get a reference to the API configuration.
    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    /// Get a reference to the identity provider.
    #[must_use]
    pub fn identity(&self) -> &dyn IdentityProvider {
        self.inner.identity.as_ref()
    }

    /// Get a reference to the raw document store.
    ///
    /// The typed stores below are preferred; this exists for probes that
    /// address documents directly (readiness checks).
    #[must_use]
    pub fn documents(&self) -> &dyn DocumentStore {
        self.inner.documents.as_ref()
    }

    /// Get a reference to the profile store.
    #[must_use]
    pub fn profiles(&self) -> &ProfileStore {
        &self.inner.profiles
    }

    /// Get a reference to the phone directory.
    #[must_use]
    pub fn directory(&self) -> &UserDirectory {
        &self.inner.directory
    }

    /// Get a reference to the order store.
    #[must_use]
    pub fn orders(&self) -> &OrderStore {
        &self.inner.orders
    }
}
