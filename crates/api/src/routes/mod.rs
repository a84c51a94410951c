//! HTTP route handlers for the API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                     - Liveness check
//! GET  /health/ready               - Readiness check (probes the store)
//!
//! # Auth
//! POST /api/auth/verify-token      - Verify a bearer token
//! GET  /api/auth/verify            - Legacy alias for verify-token
//! POST /api/auth/create-profile    - Create/refresh the caller's profile
//! GET  /api/auth/profile           - Fetch the caller's profile
//! PUT  /api/auth/profile           - Update the caller's profile
//! GET  /api/auth/check-phone       - Phone registration lookup
//! POST /api/auth/login             - Not supported server-side (501)
//! POST /api/auth/register          - Create an email/password account
//! POST /api/auth/logout            - Stateless logout acknowledgement
//!
//! # Orders (require auth)
//! GET    /api/orders               - List orders
//! POST   /api/orders               - Create an order
//! GET    /api/orders/{id}          - Fetch an order
//! PUT    /api/orders/{id}          - Update an order
//! DELETE /api/orders/{id}          - Delete an order
//!
//! # Users (require auth)
//! GET    /api/users                - List user profiles
//! GET    /api/users/{id}           - Fetch a profile
//! PUT    /api/users/{id}           - Update a profile
//! DELETE /api/users/{id}           - Delete a profile
//! ```

pub mod auth;
pub mod orders;
pub mod users;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    middleware::from_fn,
    routing::{get, post},
};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::middleware::request_id_middleware;
use crate::state::AppState;

/// A bare acknowledgement body.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/verify-token", post(auth::verify_token))
        // Legacy alias kept for older mobile builds
        .route("/verify", get(auth::verify_token))
        .route("/create-profile", post(auth::create_profile))
        .route("/profile", get(auth::get_profile).put(auth::update_profile))
        .route("/check-phone", get(auth::check_phone))
        .route("/login", post(auth::login))
        .route("/register", post(auth::register))
        .route("/logout", post(auth::logout))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::list).post(orders::create))
        .route(
            "/{id}",
            get(orders::show).put(orders::update).delete(orders::remove),
        )
}

/// Create the user routes router.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(users::list))
        .route(
            "/{id}",
            get(users::show).put(users::update).delete(users::remove),
        )
}

/// Create all routes for the API.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Health probes
        .route("/health", get(health))
        .route("/health/ready", get(ready))
        // API surface
        .nest("/api/auth", auth_routes())
        .nest("/api/orders", order_routes())
        .nest("/api/users", user_routes())
        .layer(from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Liveness probe.
///
/// GET /health
async fn health() -> &'static str {
    "ok"
}

/// Readiness probe: checks that the document store answers at all.
///
/// GET /health/ready
///
/// The probed document does not need to exist; a clean "not found" still
/// proves the backend is reachable and credentials work.
async fn ready(State(state): State<AppState>) -> StatusCode {
    match state.documents().get("health", "ping").await {
        Ok(_) => StatusCode::OK,
        Err(err) => {
            tracing::warn!(error = %err, "Readiness probe failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
