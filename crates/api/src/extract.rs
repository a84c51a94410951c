//! Request extractors with API-shaped rejections.

use axum::{
    Json,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// JSON body extractor that rejects with the API error envelope.
///
/// `axum::Json` rejects malformed bodies with a plain-text response; this
/// wrapper converts any rejection into a 400 with the standard
/// `{"success": false, "error": ...}` body.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                tracing::debug!(error = %rejection, "Rejected request body");
                Err(ApiError::BadRequest("Invalid JSON request body".to_string()))
            }
        }
    }
}
