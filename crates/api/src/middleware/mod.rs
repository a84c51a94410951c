//! HTTP middleware stack for the API.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors, transactions)
//! 2. `TraceLayer` (request tracing)
//! 3. CORS (permissive - the API serves mobile clients directly)
//! 4. Request ID (add unique ID to each request)

pub mod auth;
pub mod request_id;

pub use auth::{AuthRejection, OptionalUser, RequireUser};
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
