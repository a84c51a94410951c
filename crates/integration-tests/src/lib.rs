//! Integration tests for Guava Market.
//!
//! Each test spawns the real router on an ephemeral port with the fakes
//! from `guava_market_api::testing` injected, then drives it over HTTP
//! with `reqwest`. No Firebase project, emulator, or network access is
//! required.
//!
//! # Test Categories
//!
//! - `auth_endpoints` - Token verification, profile lifecycle, accounts
//! - `order_endpoints` - Order CRUD
//! - `user_endpoints` - User directory CRUD

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

pub use guava_market_api::testing::{
    FixedClock, MemoryStore, StaticIdentity, claim, claim_with_contact,
};
use guava_market_api::{routes, testing};

/// A running API instance backed by fakes.
///
/// The server task is detached; it stops when the test's runtime shuts
/// down. Handles to the in-memory store and the fixed clock are kept so
/// tests can seed documents and move time forward.
pub struct TestServer {
    base_url: String,
    client: reqwest::Client,
    pub documents: Arc<MemoryStore>,
    pub clock: Arc<FixedClock>,
}

impl TestServer {
    /// Bind an ephemeral port and serve the composed router.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn spawn(identity: StaticIdentity) -> Self {
        let fakes = testing::test_state(identity);
        let app = routes::routes().with_state(fakes.state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local addr");
        tokio::spawn(async move {
            axum_serve(listener, app).await;
        });

        Self {
            base_url: format!("http://{addr}"),
            client: reqwest::Client::new(),
            documents: fakes.documents,
            clock: fakes.clock,
        }
    }

    /// Absolute URL for a path on this server.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Start a GET request.
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.client.get(self.url(path))
    }

    /// Start a POST request.
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.client.post(self.url(path))
    }

    /// Start a PUT request.
    pub fn put(&self, path: &str) -> reqwest::RequestBuilder {
        self.client.put(self.url(path))
    }

    /// Start a DELETE request.
    pub fn delete(&self, path: &str) -> reqwest::RequestBuilder {
        self.client.delete(self.url(path))
    }
}

#[allow(clippy::print_stderr)]
async fn axum_serve(listener: tokio::net::TcpListener, app: axum::Router) {
    if let Err(err) = axum::serve(listener, app).await {
        eprintln!("test server stopped: {err}");
    }
}

/// Read a response body as JSON.
///
/// # Panics
///
/// Panics if the body is not valid JSON.
pub async fn body_json(response: reqwest::Response) -> serde_json::Value {
    let text = response.text().await.expect("Failed to read response body");
    serde_json::from_str(&text).unwrap_or_else(|e| panic!("Non-JSON body ({e}): {text}"))
}
