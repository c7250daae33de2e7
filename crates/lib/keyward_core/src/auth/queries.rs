//! Auth-related database queries.

use sqlx::PgPool;

use super::AuthError;
use crate::models::auth::CredentialRecord;

/// Fetch a credential record by (already normalized) username.
pub async fn find_user_by_username(
    pool: &PgPool,
    username: &str,
) -> Result<Option<CredentialRecord>, AuthError> {
    let row = sqlx::query_as::<_, (String, String, String)>(
        "SELECT id::text, username, password_hash FROM users WHERE username = $1",
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(|(id, identifier, password_hash)| CredentialRecord {
        id,
        identifier,
        password_hash,
    }))
}

/// Insert a new credential record.
///
/// A unique violation on `username` becomes `DuplicateIdentifier`.
pub async fn create_user(pool: &PgPool, record: &CredentialRecord) -> Result<(), AuthError> {
    sqlx::query("INSERT INTO users (id, username, password_hash) VALUES ($1::uuid, $2, $3)")
        .bind(&record.id)
        .bind(&record.identifier)
        .bind(&record.password_hash)
        .execute(pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                AuthError::DuplicateIdentifier(record.identifier.clone())
            }
            other => AuthError::DbError(other),
        })?;
    Ok(())
}

/// Count total users.
pub async fn user_count(pool: &PgPool) -> Result<i64, AuthError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;
    Ok(count)
}
