//! Auth routes: token verification, profile lifecycle, account creation.

use axum::{
    Json,
    extract::{Query, State},
};
use guava_market_core::{Email, PhoneNumber, SubjectId};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::{ApiError, Result};
use crate::extract::ApiJson;
use crate::firebase::JsonMap;
use crate::middleware::{OptionalUser, RequireUser};
use crate::models::{ProfileFields, UserProfile};
use crate::state::AppState;
use crate::store::StoreError;

// ============================================================================
// Token verification
// ============================================================================

/// Response from verifying a token.
#[derive(Debug, Serialize)]
pub struct VerifyTokenResponse {
    pub success: bool,
    pub uid: SubjectId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Verify the caller's bearer token.
///
/// POST /api/auth/verify-token (also GET /api/auth/verify)
///
/// All the work happens in [`RequireUser`]; reaching the handler means the
/// token checked out.
pub async fn verify_token(RequireUser(claim): RequireUser) -> Json<VerifyTokenResponse> {
    Json(VerifyTokenResponse {
        success: true,
        uid: claim.subject,
        phone: claim.phone,
        email: claim.email,
    })
}

// ============================================================================
// Profile lifecycle
// ============================================================================

/// Request to create or refresh the caller's profile.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProfileRequest {
    /// ID token, passed in the body because the native sign-in flow calls
    /// this before an Authorization header is wired up.
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Response carrying a profile.
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub success: bool,
    pub user: UserProfile,
}

/// Create the caller's profile, or refresh its login stamps if it exists.
///
/// POST /api/auth/create-profile
///
/// # Errors
///
/// Returns 400 if the token or phone number is missing or invalid, 401 if
/// the token does not verify.
pub async fn create_profile(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateProfileRequest>,
) -> Result<Json<ProfileResponse>> {
    let token = request
        .token
        .as_deref()
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Token is required".to_string()))?;
    let claim = state
        .identity()
        .verify_token(token)
        .await
        .map_err(ApiError::invalid_token)?;

    let raw_phone = request
        .phone_number
        .as_deref()
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Phone number is required".to_string()))?;
    let phone = PhoneNumber::parse(raw_phone)
        .map_err(|e| ApiError::BadRequest(format!("Invalid phone number: {e}")))?;

    let mut fields = JsonMap::new();
    fields.insert("phoneNumber".to_string(), json!(phone.as_str()));
    // The write is a merge: keys left out stay untouched, so a repeat
    // sign-in that omits displayName must not null out a stored name.
    if let Some(name) = request.display_name.filter(|name| !name.is_empty()) {
        fields.insert("displayName".to_string(), json!(name));
    }
    if let Some(email) = claim.email {
        fields.insert("email".to_string(), json!(email));
    }

    let user = state
        .profiles()
        .create_or_update(&claim.subject, fields)
        .await?;

    Ok(Json(ProfileResponse {
        success: true,
        user,
    }))
}

/// Fetch the caller's profile.
///
/// GET /api/auth/profile
///
/// # Errors
///
/// Returns 404 if the caller has no profile yet.
pub async fn get_profile(
    State(state): State<AppState>,
    RequireUser(claim): RequireUser,
) -> Result<Json<ProfileResponse>> {
    let user = state
        .profiles()
        .get(&claim.subject)
        .await?
        .ok_or_else(|| ApiError::NotFound("User profile not found".to_string()))?;

    Ok(Json(ProfileResponse {
        success: true,
        user,
    }))
}

/// Update the caller's profile.
///
/// PUT /api/auth/profile
///
/// # Errors
///
/// Returns 400 for fields outside the allow-list, 404 if the caller has no
/// profile yet.
pub async fn update_profile(
    State(state): State<AppState>,
    RequireUser(claim): RequireUser,
    ApiJson(payload): ApiJson<JsonMap>,
) -> Result<Json<ProfileResponse>> {
    let fields =
        ProfileFields::parse(&payload).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let user = state
        .profiles()
        .update(&claim.subject, fields.into_map())
        .await
        .map_err(|err| match err {
            StoreError::NotFound(_) => ApiError::NotFound("User profile not found".to_string()),
            other => ApiError::from(other),
        })?;

    Ok(Json(ProfileResponse {
        success: true,
        user,
    }))
}

// ============================================================================
// Phone lookup
// ============================================================================

/// Query for the phone lookup.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckPhoneQuery {
    #[serde(default)]
    pub phone_number: Option<String>,
}

/// Response from the phone lookup.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckPhoneResponse {
    pub success: bool,
    pub exists: bool,
    pub phone_number: PhoneNumber,
}

/// Check whether a phone number already belongs to a profile.
///
/// GET /api/auth/check-phone?phoneNumber=...
///
/// The `+` must arrive percent-encoded (`%2B`); a literal `+` in a query
/// string decodes to a space and fails validation.
///
/// # Errors
///
/// Returns 400 if the phone number is missing or invalid.
pub async fn check_phone(
    State(state): State<AppState>,
    Query(query): Query<CheckPhoneQuery>,
) -> Result<Json<CheckPhoneResponse>> {
    let raw = query
        .phone_number
        .as_deref()
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Phone number is required".to_string()))?;
    let phone = PhoneNumber::parse(raw)
        .map_err(|e| ApiError::BadRequest(format!("Invalid phone number: {e}")))?;

    let exists = state.directory().phone_exists(&phone).await?;

    Ok(Json(CheckPhoneResponse {
        success: true,
        exists,
        phone_number: phone,
    }))
}

// ============================================================================
// Account creation and session endpoints
// ============================================================================

/// Password sign-in placeholder.
///
/// POST /api/auth/login
///
/// Sign-in happens in the client SDK against the provider directly; the
/// server never sees passwords.
///
/// # Errors
///
/// Always returns 501.
pub async fn login() -> Result<()> {
    Err(ApiError::NotSupported(
        "Password sign-in is handled by the client SDK".to_string(),
    ))
}

/// Request to register an account.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Response from registering an account.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub success: bool,
    pub uid: SubjectId,
}

/// Create an email/password account with the identity provider.
///
/// POST /api/auth/register
///
/// # Errors
///
/// Returns 400 if the email or password is missing, invalid, or rejected
/// by the provider (weak password, email already registered).
pub async fn register(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RegisterRequest>,
) -> Result<Json<RegisterResponse>> {
    let raw_email = request
        .email
        .as_deref()
        .filter(|e| !e.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Email is required".to_string()))?;
    let email = Email::parse(raw_email)
        .map_err(|e| ApiError::BadRequest(format!("Invalid email: {e}")))?;

    let password = request
        .password
        .as_deref()
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Password is required".to_string()))?;

    let uid = state
        .identity()
        .sign_up(email.as_str(), password, request.name.as_deref())
        .await?;

    Ok(Json(RegisterResponse { success: true, uid }))
}

/// Response from logging out.
#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub success: bool,
    pub message: &'static str,
}

/// Acknowledge a logout.
///
/// POST /api/auth/logout
///
/// Tokens are stateless, so there is no server-side session to invalidate;
/// clients drop their token. The handler only clears observability context.
pub async fn logout(OptionalUser(claim): OptionalUser) -> Json<LogoutResponse> {
    if let Some(claim) = claim {
        tracing::info!(subject = %claim.subject, "User logged out");
    }

    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });

    Json(LogoutResponse {
        success: true,
        message: "Logout successful",
    })
}
