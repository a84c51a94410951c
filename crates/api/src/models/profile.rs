//! User profile documents.

use guava_market_core::{Email, EmailError, PhoneError, PhoneNumber, SubjectId};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use crate::firebase::JsonMap;

/// Document fields managed by the server, never writable by clients.
const RESERVED_FIELDS: &[&str] = &["id", "createdAt", "updatedAt", "lastLoginAt"];

/// A user profile document, shaped for API responses.
///
/// Profiles live in the `users` collection, keyed by the owning account's
/// subject ID. Timestamps are stored as strings on the document.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Document ID, which is the owning account's subject ID.
    pub id: SubjectId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login_at: Option<String>,
}

impl UserProfile {
    /// Build a profile from a stored document's fields.
    ///
    /// Reads leniently: a field holding something other than a string is
    /// treated as absent rather than failing the whole read.
    #[must_use]
    pub fn from_fields(id: SubjectId, fields: &JsonMap) -> Self {
        Self {
            id,
            phone_number: string_field(fields, "phoneNumber"),
            display_name: string_field(fields, "displayName"),
            email: string_field(fields, "email"),
            created_at: string_field(fields, "createdAt"),
            updated_at: string_field(fields, "updatedAt"),
            last_login_at: string_field(fields, "lastLoginAt"),
        }
    }
}

fn string_field(fields: &JsonMap, key: &str) -> Option<String> {
    fields
        .get(key)
        .and_then(serde_json::Value::as_str)
        .map(String::from)
}

/// Errors from validating client-supplied profile fields.
#[derive(Debug, Error)]
pub enum ProfileFieldError {
    /// The payload contains a field outside the profile schema.
    #[error("Unknown field: {0}")]
    UnknownField(String),
    /// A typed field holds the wrong JSON type.
    #[error("Field {0} must be a string")]
    NotAString(String),
    /// The phone number failed validation.
    #[error("Invalid phone number: {0}")]
    InvalidPhone(#[from] PhoneError),
    /// The email address failed validation.
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),
}

/// A validated, writable subset of profile fields.
///
/// Update payloads pass through an allow-list: reserved (server-managed)
/// keys are dropped silently so clients can echo documents back, unknown
/// keys are rejected, and `phoneNumber`/`email` must parse. `displayName`
/// and `email` accept an explicit `null` to clear the field.
#[derive(Debug, Clone, Default)]
pub struct ProfileFields {
    phone_number: Option<PhoneNumber>,
    display_name: Option<Option<String>>,
    email: Option<Option<Email>>,
}

impl ProfileFields {
    /// Validate a client payload against the profile allow-list.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown fields, wrong JSON types, or invalid
    /// phone/email values.
    pub fn parse(payload: &JsonMap) -> Result<Self, ProfileFieldError> {
        let mut fields = Self::default();

        for (key, value) in payload {
            if RESERVED_FIELDS.contains(&key.as_str()) {
                continue;
            }
            match key.as_str() {
                "phoneNumber" => {
                    let raw = value.as_str().ok_or_else(|| {
                        ProfileFieldError::NotAString("phoneNumber".to_string())
                    })?;
                    fields.phone_number = Some(PhoneNumber::parse(raw)?);
                }
                "displayName" => {
                    fields.display_name = Some(match value {
                        serde_json::Value::Null => None,
                        serde_json::Value::String(s) => Some(s.clone()),
                        _ => {
                            return Err(ProfileFieldError::NotAString(
                                "displayName".to_string(),
                            ));
                        }
                    });
                }
                "email" => {
                    fields.email = Some(match value {
                        serde_json::Value::Null => None,
                        serde_json::Value::String(s) => Some(Email::parse(s)?),
                        _ => return Err(ProfileFieldError::NotAString("email".to_string())),
                    });
                }
                other => return Err(ProfileFieldError::UnknownField(other.to_string())),
            }
        }

        Ok(fields)
    }

    /// The fields to write, as document JSON.
    #[must_use]
    pub fn into_map(self) -> JsonMap {
        let mut map = JsonMap::new();
        if let Some(phone) = self.phone_number {
            map.insert("phoneNumber".to_string(), json!(phone.as_str()));
        }
        if let Some(name) = self.display_name {
            map.insert("displayName".to_string(), json!(name));
        }
        if let Some(email) = self.email {
            map.insert("email".to_string(), json!(email.map(Email::into_inner)));
        }
        map
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn payload(body: serde_json::Value) -> JsonMap {
        body.as_object().unwrap().clone()
    }

    #[test]
    fn test_parse_accepts_known_fields() {
        let fields = ProfileFields::parse(&payload(json!({
            "phoneNumber": "+15551234567",
            "displayName": "Maya",
            "email": "maya@example.com"
        })))
        .unwrap();

        let map = fields.into_map();
        assert_eq!(map["phoneNumber"], "+15551234567");
        assert_eq!(map["displayName"], "Maya");
        assert_eq!(map["email"], "maya@example.com");
    }

    #[test]
    fn test_parse_drops_reserved_fields_silently() {
        let fields = ProfileFields::parse(&payload(json!({
            "id": "evil",
            "createdAt": "1970-01-01T00:00:00.000Z",
            "updatedAt": "1970-01-01T00:00:00.000Z",
            "lastLoginAt": "1970-01-01T00:00:00.000Z",
            "displayName": "Maya"
        })))
        .unwrap();

        let map = fields.into_map();
        assert_eq!(map.len(), 1);
        assert_eq!(map["displayName"], "Maya");
    }

    #[test]
    fn test_parse_rejects_unknown_fields() {
        let result = ProfileFields::parse(&payload(json!({"role": "admin"})));
        assert!(matches!(result, Err(ProfileFieldError::UnknownField(f)) if f == "role"));
    }

    #[test]
    fn test_parse_rejects_invalid_phone() {
        let result = ProfileFields::parse(&payload(json!({"phoneNumber": "555-1234"})));
        assert!(matches!(result, Err(ProfileFieldError::InvalidPhone(_))));
    }

    #[test]
    fn test_parse_rejects_non_string_phone() {
        let result = ProfileFields::parse(&payload(json!({"phoneNumber": 5551234567_i64})));
        assert!(matches!(result, Err(ProfileFieldError::NotAString(_))));
    }

    #[test]
    fn test_parse_rejects_invalid_email() {
        let result = ProfileFields::parse(&payload(json!({"email": "not-an-email"})));
        assert!(matches!(result, Err(ProfileFieldError::InvalidEmail(_))));
    }

    #[test]
    fn test_parse_null_clears_display_name() {
        let fields = ProfileFields::parse(&payload(json!({"displayName": null}))).unwrap();
        let map = fields.into_map();
        assert_eq!(map["displayName"], serde_json::Value::Null);
    }

    #[test]
    fn test_parse_empty_payload() {
        let fields = ProfileFields::parse(&JsonMap::new()).unwrap();
        assert!(fields.into_map().is_empty());
    }

    #[test]
    fn test_from_fields_reads_strings() {
        let fields = payload(json!({
            "phoneNumber": "+15551234567",
            "displayName": "Maya",
            "createdAt": "2026-01-15T12:00:00.000Z"
        }));
        let profile = UserProfile::from_fields(SubjectId::parse("abc").unwrap(), &fields);

        assert_eq!(profile.phone_number.as_deref(), Some("+15551234567"));
        assert_eq!(profile.display_name.as_deref(), Some("Maya"));
        assert_eq!(profile.created_at.as_deref(), Some("2026-01-15T12:00:00.000Z"));
        assert!(profile.email.is_none());
    }

    #[test]
    fn test_from_fields_ignores_wrong_types() {
        let fields = payload(json!({"displayName": 42, "email": ["a"]}));
        let profile = UserProfile::from_fields(SubjectId::parse("abc").unwrap(), &fields);

        assert!(profile.display_name.is_none());
        assert!(profile.email.is_none());
    }

    #[test]
    fn test_profile_serializes_camel_case_and_skips_absent() {
        let profile = UserProfile {
            id: SubjectId::parse("abc").unwrap(),
            phone_number: Some("+15551234567".to_string()),
            display_name: None,
            email: None,
            created_at: None,
            updated_at: None,
            last_login_at: None,
        };

        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json, json!({"id": "abc", "phoneNumber": "+15551234567"}));
    }
}
