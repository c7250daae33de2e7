//! Credential stores.
//!
//! A store answers exact-match lookups on normalized identifiers and accepts
//! new records from registration. Normalization is the caller's job; stores
//! never re-fold identifiers.

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use sqlx::PgPool;

use super::{AuthError, queries};
use crate::models::auth::CredentialRecord;

/// Lookup and insert operations over credential records.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Return the unique record for `identifier`, or `None`.
    async fn find_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<CredentialRecord>, AuthError>;

    /// Add a record. Fails with `DuplicateIdentifier` if the identifier exists.
    async fn insert(&self, record: CredentialRecord) -> Result<(), AuthError>;
}

/// Process-local store backed by a concurrent map.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    records: DashMap<String, CredentialRecord>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn find_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<CredentialRecord>, AuthError> {
        Ok(self.records.get(identifier).map(|r| r.value().clone()))
    }

    async fn insert(&self, record: CredentialRecord) -> Result<(), AuthError> {
        match self.records.entry(record.identifier.clone()) {
            Entry::Occupied(_) => Err(AuthError::DuplicateIdentifier(record.identifier)),
            Entry::Vacant(slot) => {
                slot.insert(record);
                Ok(())
            }
        }
    }
}

/// PostgreSQL store over the `users` table.
#[derive(Debug, Clone)]
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Number of registered users.
    pub async fn user_count(&self) -> Result<i64, AuthError> {
        queries::user_count(&self.pool).await
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn find_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<CredentialRecord>, AuthError> {
        queries::find_user_by_username(&self.pool, identifier).await
    }

    async fn insert(&self, record: CredentialRecord) -> Result<(), AuthError> {
        queries::create_user(&self.pool, &record).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, identifier: &str) -> CredentialRecord {
        CredentialRecord {
            id: id.into(),
            identifier: identifier.into(),
            password_hash: "hash".into(),
        }
    }

    #[tokio::test]
    async fn lookup_is_exact_match() {
        let store = InMemoryCredentialStore::new();
        store.insert(record("1", "alice")).await.unwrap();

        let found = store.find_by_identifier("alice").await.unwrap();
        assert_eq!(found.map(|r| r.id), Some("1".to_string()));

        // No re-normalization inside the store.
        assert!(store.find_by_identifier("Alice").await.unwrap().is_none());
        assert!(store.find_by_identifier("").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_insert_is_rejected() {
        let store = InMemoryCredentialStore::new();
        store.insert(record("1", "alice")).await.unwrap();

        let err = store.insert(record("2", "alice")).await.unwrap_err();
        assert!(matches!(err, AuthError::DuplicateIdentifier(ref id) if id == "alice"));

        // First record is untouched.
        let found = store.find_by_identifier("alice").await.unwrap().unwrap();
        assert_eq!(found.id, "1");
        assert_eq!(store.len(), 1);
    }
}
