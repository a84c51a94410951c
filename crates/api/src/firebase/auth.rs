//! Identity Toolkit client: ID token verification and account creation.

use async_trait::async_trait;
use guava_market_core::SubjectId;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use super::{FirebaseError, api_error_message};
use crate::config::FirebaseConfig;
use crate::models::IdentityClaim;

const IDENTITY_TOOLKIT_URL: &str = "https://identitytoolkit.googleapis.com/v1";

/// The subset of the identity provider this API uses.
///
/// Injected into [`crate::state::AppState`] as a trait object so tests can
/// substitute a canned implementation.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Verify an ID token and return the claims of the account it belongs to.
    async fn verify_token(&self, token: &str) -> Result<IdentityClaim, FirebaseError>;

    /// Create an email/password account, returning the new subject ID.
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> Result<SubjectId, FirebaseError>;
}

/// REST client for the Identity Toolkit API.
#[derive(Debug, Clone)]
pub struct IdentityToolkitClient {
    client: reqwest::Client,
    base_url: String,
    api_key: SecretString,
}

impl IdentityToolkitClient {
    /// Build a client from configuration.
    ///
    /// Points at the Auth emulator when `FIREBASE_AUTH_EMULATOR_HOST` is set.
    #[must_use]
    pub fn new(config: &FirebaseConfig) -> Self {
        let base_url = config.auth_emulator_host.as_ref().map_or_else(
            || IDENTITY_TOOLKIT_URL.to_string(),
            |host| format!("http://{host}/identitytoolkit.googleapis.com/v1"),
        );

        Self {
            client: reqwest::Client::new(),
            base_url,
            api_key: config.web_api_key.clone(),
        }
    }

    fn endpoint(&self, method: &str) -> String {
        format!(
            "{}/accounts:{method}?key={}",
            self.base_url,
            self.api_key.expose_secret()
        )
    }

    async fn post<Req, Resp>(&self, method: &str, body: &Req) -> Result<Resp, FirebaseError>
    where
        Req: Serialize + Sync,
        Resp: serde::de::DeserializeOwned,
    {
        let response = self
            .client
            .post(self.endpoint(method))
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(FirebaseError::Api {
                status: status.as_u16(),
                message: api_error_message(&text),
            });
        }

        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl IdentityProvider for IdentityToolkitClient {
    async fn verify_token(&self, token: &str) -> Result<IdentityClaim, FirebaseError> {
        let request = LookupRequest { id_token: token };
        let response: LookupResponse = self
            .post("lookup", &request)
            .await
            .map_err(as_token_rejection)?;

        let user = response.users.into_iter().next().ok_or_else(|| {
            FirebaseError::InvalidToken("no account matches this token".to_string())
        })?;

        let subject = SubjectId::parse(&user.local_id)
            .map_err(|e| FirebaseError::UnexpectedResponse(format!("bad localId: {e}")))?;

        // A phone number only appears on the account once the provider has
        // verified it via SMS, so presence implies verified.
        let phone_verified = user.phone_number.is_some();

        Ok(IdentityClaim {
            subject,
            phone: user.phone_number,
            email: user.email,
            email_verified: user.email_verified.unwrap_or(false),
            phone_verified,
        })
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> Result<SubjectId, FirebaseError> {
        let request = SignUpRequest {
            email,
            password,
            display_name,
            return_secure_token: true,
        };
        let response: SignUpResponse = self
            .post("signUp", &request)
            .await
            .map_err(as_credential_rejection)?;

        SubjectId::parse(&response.local_id)
            .map_err(|e| FirebaseError::UnexpectedResponse(format!("bad localId: {e}")))
    }
}

/// Lookup failures with a client-ish status mean the token itself was bad.
fn as_token_rejection(err: FirebaseError) -> FirebaseError {
    match err {
        FirebaseError::Api { status, message } if matches!(status, 400 | 401 | 403) => {
            FirebaseError::InvalidToken(message)
        }
        other => other,
    }
}

/// Sign-up failures with a 400 status mean the credentials were rejected.
fn as_credential_rejection(err: FirebaseError) -> FirebaseError {
    match err {
        FirebaseError::Api {
            status: 400,
            message,
        } => FirebaseError::CredentialRejected(signup_error_text(&message)),
        other => other,
    }
}

/// Translate Identity Toolkit sign-up error codes to user-facing text.
///
/// The API appends detail after the code (`WEAK_PASSWORD : ...`), so match
/// on the prefix.
fn signup_error_text(code: &str) -> String {
    if code.starts_with("EMAIL_EXISTS") {
        "An account with this email already exists".to_string()
    } else if code.starts_with("WEAK_PASSWORD") {
        "Password should be at least 6 characters".to_string()
    } else if code.starts_with("INVALID_EMAIL") {
        "Invalid email address".to_string()
    } else {
        code.to_string()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LookupRequest<'a> {
    id_token: &'a str,
}

#[derive(Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<LookupUser>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupUser {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    email_verified: Option<bool>,
    #[serde(default)]
    phone_number: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SignUpRequest<'a> {
    email: &'a str,
    password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    display_name: Option<&'a str>,
    return_secure_token: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignUpResponse {
    local_id: String,
}
