//! Authentication logic.
//!
//! Provides password hashing, JWT issuance, credential stores and the
//! `Authenticator` that ties them together. Shared by `keyward_api` and the
//! server binary.

pub mod authenticator;
pub mod jwt;
pub mod password;
pub mod queries;
pub mod registration;
pub mod store;

use std::time::Duration;

use thiserror::Error;

pub use authenticator::Authenticator;
pub use jwt::{JwtIssuer, TokenIssuer};
pub use store::{CredentialStore, InMemoryCredentialStore, PgCredentialStore};

/// Authentication errors.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Identifier already registered: {0}")]
    DuplicateIdentifier(String),

    #[error("Token error: {0}")]
    TokenError(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Credential lookup timed out after {0:?}")]
    Timeout(Duration),

    #[error("Database error: {0}")]
    DbError(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Case-fold an identifier for storage and lookup.
///
/// Registration and authentication both go through here so stored and
/// looked-up identifiers always agree.
pub fn normalize_identifier(identifier: &str) -> String {
    identifier.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_lowercases_only() {
        assert_eq!(normalize_identifier("Alice"), "alice");
        assert_eq!(normalize_identifier("  BoB "), "  bob ");
        assert_eq!(normalize_identifier(""), "");
    }

    #[test]
    fn normalize_folds_non_ascii() {
        assert_eq!(normalize_identifier("ÉLODIE"), "élodie");
    }
}
