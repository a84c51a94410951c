//! User routes: directory CRUD over the `users` collection.
//!
//! The original router exposed these paths without a controller behind
//! them; they are implemented here against the same collection and field
//! allow-list as the `/api/auth/profile` routes. Creation is deliberately
//! absent: profiles come into existence through `/api/auth/create-profile`
//! or `/api/auth/register`, keyed by the verified subject ID.

use axum::{
    Json,
    extract::{Path, State},
};
use guava_market_core::SubjectId;

use super::MessageResponse;
use crate::error::{ApiError, Result};
use crate::extract::ApiJson;
use crate::firebase::JsonMap;
use crate::middleware::RequireUser;
use crate::models::{ProfileFields, UserProfile};
use crate::state::AppState;
use crate::store::StoreError;

/// List every user profile.
///
/// GET /api/users
///
/// # Errors
///
/// Returns 500 if the store is unreachable.
pub async fn list(
    State(state): State<AppState>,
    RequireUser(_): RequireUser,
) -> Result<Json<Vec<UserProfile>>> {
    let users = state.profiles().list().await?;
    Ok(Json(users))
}

/// Fetch a single profile by subject ID.
///
/// GET /api/users/{id}
///
/// # Errors
///
/// Returns 404 if no profile exists for the ID.
pub async fn show(
    State(state): State<AppState>,
    RequireUser(_): RequireUser,
    Path(id): Path<String>,
) -> Result<Json<UserProfile>> {
    let id = subject_id(&id)?;
    let user = state
        .profiles()
        .get(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(user))
}

/// Merge allow-listed fields into an existing profile.
///
/// PUT /api/users/{id}
///
/// # Errors
///
/// Returns 400 for fields outside the allow-list, 404 if no profile exists
/// for the ID.
pub async fn update(
    State(state): State<AppState>,
    RequireUser(_): RequireUser,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<JsonMap>,
) -> Result<Json<MessageResponse>> {
    let id = subject_id(&id)?;
    let fields =
        ProfileFields::parse(&payload).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    state
        .profiles()
        .update(&id, fields.into_map())
        .await
        .map_err(|err| match err {
            StoreError::NotFound(_) => ApiError::NotFound("User not found".to_string()),
            other => ApiError::from(other),
        })?;

    Ok(Json(MessageResponse {
        message: "User updated successfully",
    }))
}

/// Delete a profile. Deleting an absent profile succeeds.
///
/// DELETE /api/users/{id}
///
/// # Errors
///
/// Returns 500 if the store is unreachable.
pub async fn remove(
    State(state): State<AppState>,
    RequireUser(_): RequireUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    let id = subject_id(&id)?;
    state.profiles().delete(&id).await?;

    Ok(Json(MessageResponse {
        message: "User deleted successfully",
    }))
}

fn subject_id(raw: &str) -> Result<SubjectId> {
    SubjectId::parse(raw).map_err(|e| ApiError::BadRequest(format!("Invalid user id: {e}")))
}
