//! Credential verification and token issuance.
//!
//! `Authenticator::authenticate` is total: every call ends in exactly one
//! `AuthOutcome` variant. Store faults, timeouts, unusable hashes and signing
//! failures all collapse into `IssuanceFailure`; their cause is logged here
//! and never handed to the caller.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};

use super::jwt::TokenIssuer;
use super::password::verify_password;
use super::store::CredentialStore;
use super::{AuthError, normalize_identifier};
use crate::models::auth::{AuthOutcome, CredentialRecord};

/// Default bound on each collaborator call (lookup, signing).
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(5);

/// Stateless login orchestrator. Cheap to clone and safe to share.
#[derive(Clone)]
pub struct Authenticator {
    store: Arc<dyn CredentialStore>,
    issuer: Arc<dyn TokenIssuer>,
    call_timeout: Duration,
}

impl Authenticator {
    pub fn new(store: Arc<dyn CredentialStore>, issuer: Arc<dyn TokenIssuer>) -> Self {
        Self {
            store,
            issuer,
            call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }

    /// Override the per-call timeout applied to lookup and signing.
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    /// The credential store this authenticator reads from.
    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.store
    }

    /// Authenticate `identifier` / `password` and issue a token on success.
    pub async fn authenticate(&self, identifier: &str, password: &str) -> AuthOutcome {
        let normalized = normalize_identifier(identifier);

        let record = match self.lookup(&normalized).await {
            Ok(Some(record)) => record,
            Ok(None) => {
                info!(identifier = %normalized, "login rejected: unknown identifier");
                return AuthOutcome::NotFound {
                    attempted_identifier: identifier.to_string(),
                };
            }
            Err(e) => {
                error!(error = %e, "credential lookup failed");
                return AuthOutcome::IssuanceFailure;
            }
        };

        match check_password(password, &record).await {
            Ok(true) => {}
            Ok(false) => {
                info!(subject = %record.id, "login rejected: incorrect password");
                return AuthOutcome::InvalidPassword;
            }
            Err(e) => {
                error!(subject = %record.id, error = %e, "password verification failed");
                return AuthOutcome::IssuanceFailure;
            }
        }

        match self.bounded(self.issuer.issue(&record.id)).await {
            Ok(token) => {
                info!(subject = %record.id, "login succeeded");
                AuthOutcome::Success {
                    token,
                    subject_id: record.id,
                }
            }
            Err(e) => {
                error!(subject = %record.id, error = %e, "token issuance failed");
                AuthOutcome::IssuanceFailure
            }
        }
    }

    async fn lookup(&self, identifier: &str) -> Result<Option<CredentialRecord>, AuthError> {
        self.bounded(self.store.find_by_identifier(identifier)).await
    }

    async fn bounded<T, F>(&self, call: F) -> Result<T, AuthError>
    where
        F: Future<Output = Result<T, AuthError>>,
    {
        tokio::time::timeout(self.call_timeout, call)
            .await
            .map_err(|_| AuthError::Timeout(self.call_timeout))?
    }
}

/// Run the bcrypt comparison on the blocking pool so it does not stall other
/// logins sharing the runtime.
async fn check_password(password: &str, record: &CredentialRecord) -> Result<bool, AuthError> {
    let password = password.to_string();
    let hash = record.password_hash.clone();
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| AuthError::Internal(format!("password task: {e}")))?
}
