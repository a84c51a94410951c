//! Verified identity claims.

use guava_market_core::SubjectId;

/// Claims extracted from a verified ID token.
///
/// Built by the identity provider during token verification and attached to
/// the request for handlers to use. Handlers pick which of these fields they
/// expose; the claim itself is never serialized.
#[derive(Debug, Clone)]
pub struct IdentityClaim {
    /// The provider's stable account ID.
    pub subject: SubjectId,
    /// Phone number on the account, in E.164 form.
    pub phone: Option<String>,
    /// Email address on the account.
    pub email: Option<String>,
    /// Whether the provider has verified the email.
    pub email_verified: bool,
    /// Whether the provider has verified the phone number.
    ///
    /// The provider only attaches a phone number after SMS verification,
    /// so this is true exactly when a phone is present.
    pub phone_verified: bool,
}
