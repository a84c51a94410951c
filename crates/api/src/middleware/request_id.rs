//! Per-request correlation IDs.
//!
//! Mobile clients send support reports that quote the `x-request-id` they
//! got back, so one shared ID has to tie together the trace span, the
//! Sentry event, and the response the client saw.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Attach a correlation ID to the request.
///
/// An `x-request-id` set by an upstream proxy wins; otherwise a fresh
/// UUID v4 is minted. The ID lands on the current span, the Sentry scope,
/// and the response headers.
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    Span::current().record("request_id", &request_id);

    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &request_id);
    });

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}
