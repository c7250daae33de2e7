//! Account registration.
//!
//! Produces records the `Authenticator` can verify: the identifier is folded
//! with the same `normalize_identifier` used at login, and the hash comes from
//! the same bcrypt scheme.

use tracing::info;

use super::password::{BCRYPT_COST, hash_password_with_cost};
use super::store::CredentialStore;
use super::{AuthError, normalize_identifier};
use crate::models::auth::CredentialRecord;
use crate::uuid::new_subject_id;

/// Register a new account with the default bcrypt cost.
pub async fn register(
    store: &dyn CredentialStore,
    username: &str,
    password: &str,
) -> Result<CredentialRecord, AuthError> {
    register_with_cost(store, username, password, BCRYPT_COST).await
}

/// Register a new account, hashing with an explicit bcrypt cost.
pub async fn register_with_cost(
    store: &dyn CredentialStore,
    username: &str,
    password: &str,
    cost: u32,
) -> Result<CredentialRecord, AuthError> {
    if username.is_empty() {
        return Err(AuthError::Validation("Username must not be empty".into()));
    }
    if password.is_empty() {
        return Err(AuthError::Validation("Password must not be empty".into()));
    }

    let identifier = normalize_identifier(username);
    let password = password.to_string();
    let password_hash = tokio::task::spawn_blocking(move || hash_password_with_cost(&password, cost))
        .await
        .map_err(|e| AuthError::Internal(format!("password task: {e}")))??;

    let record = CredentialRecord {
        id: new_subject_id().to_string(),
        identifier,
        password_hash,
    };
    store.insert(record.clone()).await?;

    info!(subject = %record.id, identifier = %record.identifier, "user registered");
    Ok(record)
}
