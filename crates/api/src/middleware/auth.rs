//! Authentication middleware and extractors.
//!
//! Provides extractors for requiring a verified ID token in route handlers.

use axum::{
    Json,
    extract::{FromRef, FromRequestParts},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::models::IdentityClaim;
use crate::state::AppState;

/// Extractor that requires a verified bearer token.
///
/// Verifies the `Authorization: Bearer <token>` header against the identity
/// provider and hands the resulting claims to the handler.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireUser(claim): RequireUser,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", claim.subject)
/// }
/// ```
pub struct RequireUser(pub IdentityClaim);

/// Error returned when a request lacks a usable bearer token.
#[derive(Debug)]
pub enum AuthRejection {
    /// No Authorization header, or not in `Bearer <token>` form.
    MissingToken,
    /// The provider rejected the token.
    InvalidToken(String),
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let (error, message) = match self {
            Self::MissingToken => ("No token provided", None),
            Self::InvalidToken(message) => ("Invalid token", Some(message)),
        };

        let mut body = json!({
            "success": false,
            "error": error,
        });
        if let (Some(obj), Some(message)) = (body.as_object_mut(), message) {
            obj.insert("message".to_string(), json!(message));
        }

        (StatusCode::UNAUTHORIZED, Json(body)).into_response()
    }
}

impl<S> FromRequestParts<S> for RequireUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(AuthRejection::MissingToken)?;

        let state = AppState::from_ref(state);
        let claim = state.identity().verify_token(token).await.map_err(|err| {
            tracing::warn!(error = %err, "Token verification failed");
            AuthRejection::InvalidToken(err.to_string())
        })?;

        // Associate subsequent Sentry events with this account
        sentry::configure_scope(|scope| {
            scope.set_user(Some(sentry::User {
                id: Some(claim.subject.to_string()),
                email: claim.email.clone(),
                ..Default::default()
            }));
        });

        Ok(Self(claim))
    }
}

/// Extractor that verifies a bearer token when one is present.
///
/// Unlike `RequireUser`, this never rejects the request: a missing or
/// invalid token simply yields `None`.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(
///     OptionalUser(claim): OptionalUser,
/// ) -> impl IntoResponse {
///     match claim {
///         Some(c) => format!("Hello, {}!", c.subject),
///         None => "Hello, guest!".to_string(),
///     }
/// }
/// ```
pub struct OptionalUser(pub Option<IdentityClaim>);

impl<S> FromRequestParts<S> for OptionalUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(parts) else {
            return Ok(Self(None));
        };

        let state = AppState::from_ref(state);
        Ok(Self(state.identity().verify_token(token).await.ok()))
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header.
fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(axum::http::header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .filter(|token| !token.is_empty())
}
