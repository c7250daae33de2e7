//! Authentication service — login/register flows delegating to `keyward_core::auth`.

use std::sync::Arc;

use keyward_core::auth::{
    AuthError, Authenticator, CredentialStore, JwtIssuer, registration,
};
use keyward_core::models::auth::AuthOutcome;

use crate::config::ApiConfig;
use crate::error::AppResult;
use crate::models::{LoginPayload, LoginStatus, RegisterResponse};

// Re-export the token-validation counterpart for the middleware.
pub use keyward_core::auth::jwt::verify_access_token;
pub use keyward_core::models::auth::TokenClaims;

/// Wire an `Authenticator` over `store` with the signing settings in `config`.
pub fn build_authenticator(
    store: Arc<dyn CredentialStore>,
    config: &ApiConfig,
) -> Result<Authenticator, AuthError> {
    let issuer = JwtIssuer::new(
        config.jwt_secret.as_bytes(),
        config.token_ttl,
        config.jwt_issuer.clone(),
    )?;
    Ok(Authenticator::new(store, Arc::new(issuer)).with_call_timeout(config.lookup_timeout))
}

/// Map an outcome onto the login response.
pub fn login_payload(outcome: AuthOutcome) -> LoginPayload {
    match outcome {
        AuthOutcome::Success { token, .. } => LoginPayload {
            status: LoginStatus::Success,
            message: "Login success".into(),
            token: Some(token),
        },
        AuthOutcome::NotFound {
            attempted_identifier,
        } => LoginPayload {
            status: LoginStatus::Error,
            message: format!("Username {attempted_identifier} not found"),
            token: None,
        },
        AuthOutcome::InvalidPassword => LoginPayload {
            status: LoginStatus::Failed,
            message: "Incorrect password".into(),
            token: None,
        },
        AuthOutcome::IssuanceFailure => LoginPayload {
            status: LoginStatus::Failed,
            message: "Server error".into(),
            token: None,
        },
    }
}

/// Authenticate with username + password.
pub async fn login(authenticator: &Authenticator, username: &str, password: &str) -> LoginPayload {
    login_payload(authenticator.authenticate(username, password).await)
}

/// Register a new account.
pub async fn register(
    authenticator: &Authenticator,
    username: &str,
    password: &str,
) -> AppResult<RegisterResponse> {
    let record = registration::register(authenticator.store().as_ref(), username, password).await?;
    Ok(RegisterResponse {
        id: record.id,
        username: record.identifier,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_carries_token() {
        let payload = login_payload(AuthOutcome::Success {
            token: "jwt".into(),
            subject_id: "id".into(),
        });
        assert_eq!(payload.status, LoginStatus::Success);
        assert_eq!(payload.message, "Login success");
        assert_eq!(payload.token.as_deref(), Some("jwt"));
    }

    #[test]
    fn not_found_echoes_original_identifier() {
        let payload = login_payload(AuthOutcome::NotFound {
            attempted_identifier: "Bob".into(),
        });
        assert_eq!(payload.status, LoginStatus::Error);
        assert_eq!(payload.message, "Username Bob not found");
        assert!(payload.token.is_none());
    }

    #[test]
    fn failures_share_status_but_not_message() {
        let bad_pw = login_payload(AuthOutcome::InvalidPassword);
        let fault = login_payload(AuthOutcome::IssuanceFailure);
        assert_eq!(bad_pw.status, LoginStatus::Failed);
        assert_eq!(fault.status, LoginStatus::Failed);
        assert_eq!(bad_pw.message, "Incorrect password");
        assert_eq!(fault.message, "Server error");
        assert!(bad_pw.token.is_none() && fault.token.is_none());
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_value(login_payload(AuthOutcome::InvalidPassword)).unwrap();
        assert_eq!(json["status"], "failed");
        assert!(json["token"].is_null());
    }
}
