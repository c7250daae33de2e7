//! Authentication domain models.
//!
//! These are internal domain models, distinct from the HTTP payloads in
//! `keyward_api::models`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One registered principal as held by a credential store.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialRecord {
    /// Stable opaque id, used as the token subject.
    pub id: String,
    /// Lowercase username, unique per store.
    pub identifier: String,
    /// bcrypt hash of the password.
    pub password_hash: String,
}

impl fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialRecord")
            .field("id", &self.id)
            .field("identifier", &self.identifier)
            .field("password_hash", &"<redacted>")
            .finish()
    }
}

/// JWT claims embedded in access tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject — credential record id (standard JWT `sub` claim).
    pub sub: String,
    /// Expiry (unix timestamp).
    pub exp: i64,
    /// Issued at (unix timestamp).
    pub iat: i64,
    /// Issuer, when one is configured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

/// Result of a single `Authenticator::authenticate` call.
///
/// Rejections are ordinary values here; only `IssuanceFailure` stands for an
/// internal fault, and it carries no detail about the cause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    Success { token: String, subject_id: String },
    NotFound { attempted_identifier: String },
    InvalidPassword,
    IssuanceFailure,
}

impl AuthOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, AuthOutcome::Success { .. })
    }

    /// The issued token, if any.
    pub fn token(&self) -> Option<&str> {
        match self {
            AuthOutcome::Success { token, .. } => Some(token),
            _ => None,
        }
    }
}
