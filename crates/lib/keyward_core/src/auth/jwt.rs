//! JWT token generation and verification.

use std::time::Duration as StdDuration;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use tracing::debug;

use super::AuthError;
use crate::models::auth::TokenClaims;

/// Default access token lifetime: 1 hour.
pub const DEFAULT_TOKEN_TTL: StdDuration = StdDuration::from_secs(60 * 60);

/// Signs access tokens for an authenticated subject.
///
/// The `Authenticator` only sees this trait, so tests can swap in an issuer
/// that fails on demand.
#[async_trait]
pub trait TokenIssuer: Send + Sync {
    /// Produce a signed token whose subject claim is `subject`.
    async fn issue(&self, subject: &str) -> Result<String, AuthError>;
}

/// HS256 JWT issuer holding the process-wide signing secret.
#[derive(Clone)]
pub struct JwtIssuer {
    key: EncodingKey,
    ttl: Duration,
    issuer: Option<String>,
}

impl std::fmt::Debug for JwtIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtIssuer")
            .field("ttl", &self.ttl)
            .field("issuer", &self.issuer)
            .finish_non_exhaustive()
    }
}

impl JwtIssuer {
    /// Build an issuer. An empty secret or a zero TTL is a configuration error.
    pub fn new(secret: &[u8], ttl: StdDuration, issuer: Option<String>) -> Result<Self, AuthError> {
        if secret.is_empty() {
            return Err(AuthError::Config("JWT secret must not be empty".into()));
        }
        if ttl.is_zero() {
            return Err(AuthError::Config("token TTL must be positive".into()));
        }
        let ttl = Duration::from_std(ttl)
            .map_err(|e| AuthError::Config(format!("token TTL out of range: {e}")))?;
        if Utc::now().checked_add_signed(ttl).is_none() {
            return Err(AuthError::Config("token TTL puts expiry out of range".into()));
        }
        Ok(Self {
            key: EncodingKey::from_secret(secret),
            ttl,
            issuer,
        })
    }

    /// Build an issuer without range checks on `ttl`.
    #[cfg(test)]
    pub(crate) fn with_unchecked_ttl(secret: &[u8], ttl: Duration) -> Self {
        Self {
            key: EncodingKey::from_secret(secret),
            ttl,
            issuer: None,
        }
    }

    /// Generate a signed JWT access token (HS256).
    pub fn generate_access_token(&self, subject: &str) -> Result<String, AuthError> {
        let now = Utc::now();
        let exp = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| AuthError::TokenError("token expiry out of range".into()))?;
        let claims = TokenClaims {
            sub: subject.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: self.issuer.clone(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.key)
            .map_err(|e| AuthError::TokenError(format!("jwt encode: {e}")))
    }
}

#[async_trait]
impl TokenIssuer for JwtIssuer {
    async fn issue(&self, subject: &str) -> Result<String, AuthError> {
        self.generate_access_token(subject)
    }
}

/// Verify a JWT access token, returning the claims on success.
///
/// Checks the HS256 signature and expiry, and the issuer when one is given.
pub fn verify_access_token(token: &str, secret: &[u8], issuer: Option<&str>) -> Option<TokenClaims> {
    let key = DecodingKey::from_secret(secret);
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    if let Some(iss) = issuer {
        validation.set_issuer(&[iss]);
    }
    match decode::<TokenClaims>(token, &key, &validation) {
        Ok(data) => Some(data.claims),
        Err(e) => {
            debug!(error = %e, "access token rejected");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test-secret";

    fn issuer() -> JwtIssuer {
        JwtIssuer::new(SECRET, DEFAULT_TOKEN_TTL, None).unwrap()
    }

    #[test]
    fn token_round_trips_subject() {
        let token = issuer().generate_access_token("user-42").unwrap();
        let claims = verify_access_token(&token, SECRET, None).expect("valid token");
        assert_eq!(claims.sub, "user-42");
        assert_eq!(claims.exp - claims.iat, 3600);
        assert!(claims.iss.is_none());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = issuer().generate_access_token("user-42").unwrap();
        assert!(verify_access_token(&token, b"other-secret", None).is_none());
    }

    #[test]
    fn tampered_token_is_rejected() {
        let token = issuer().generate_access_token("user-42").unwrap();
        let mut parts: Vec<&str> = token.split('.').collect();
        let forged_body = "eyJzdWIiOiJhZG1pbiIsImV4cCI6OTk5OTk5OTk5OSwiaWF0IjowfQ";
        parts[1] = forged_body;
        assert!(verify_access_token(&parts.join("."), SECRET, None).is_none());
    }

    #[test]
    fn expired_token_is_rejected() {
        let claims = TokenClaims {
            sub: "user-42".into(),
            exp: Utc::now().timestamp() - 3600,
            iat: Utc::now().timestamp() - 7200,
            iss: None,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();
        assert!(verify_access_token(&token, SECRET, None).is_none());
    }

    #[test]
    fn issuer_is_checked_when_configured() {
        let issuer = JwtIssuer::new(SECRET, DEFAULT_TOKEN_TTL, Some("keyward".into())).unwrap();
        let token = issuer.generate_access_token("user-42").unwrap();

        let claims = verify_access_token(&token, SECRET, Some("keyward")).unwrap();
        assert_eq!(claims.iss.as_deref(), Some("keyward"));
        assert!(verify_access_token(&token, SECRET, Some("someone-else")).is_none());
    }

    #[test]
    fn empty_secret_is_config_error() {
        let err = JwtIssuer::new(b"", DEFAULT_TOKEN_TTL, None).unwrap_err();
        assert!(matches!(err, AuthError::Config(_)));
    }

    #[test]
    fn zero_ttl_is_config_error() {
        let err = JwtIssuer::new(SECRET, StdDuration::ZERO, None).unwrap_err();
        assert!(matches!(err, AuthError::Config(_)));
    }

    #[test]
    fn ttl_past_max_date_is_config_error() {
        let err = JwtIssuer::new(SECRET, StdDuration::from_secs(9_000_000_000_000), None)
            .unwrap_err();
        assert!(matches!(err, AuthError::Config(_)));
    }

    #[test]
    fn expiry_overflow_is_token_error_not_panic() {
        let issuer = JwtIssuer::with_unchecked_ttl(SECRET, Duration::days(365 * 300_000));
        let err = issuer.generate_access_token("user-42").unwrap_err();
        assert!(matches!(err, AuthError::TokenError(_)));
    }

    #[test]
    fn debug_does_not_print_key() {
        let printed = format!("{:?}", issuer());
        assert!(!printed.contains("test-secret"));
    }

    #[tokio::test]
    async fn trait_issue_signs_subject() {
        let issuer = issuer();
        let token = TokenIssuer::issue(&issuer, "abc").await.unwrap();
        assert_eq!(verify_access_token(&token, SECRET, None).unwrap().sub, "abc");
    }
}
