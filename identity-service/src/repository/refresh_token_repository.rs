//! # Refresh Token Repository
//!
//! Data access for the `refresh_tokens` table. Tokens are looked up by their
//! SHA-256 digest ([`shared::auth::code::hash_token`]) - the raw token is never
//! persisted and never appears in a query.
//!
//! Refresh in this provider is non-rotating: a successful `/auth/refresh` call
//! bumps `last_used_at` on the existing row rather than writing a new one.

use chrono::{DateTime, Utc};
use shared::errors::ApiError;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{NewRefreshRecord, RefreshRecord};

#[derive(Debug, Clone)]
pub struct RefreshTokenRepository {
    pool: PgPool,
}

impl RefreshTokenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, new_record: NewRefreshRecord) -> Result<RefreshRecord, ApiError> {
        sqlx::query_as::<_, RefreshRecord>(
            r#"
            INSERT INTO refresh_tokens (user_id, token_hash, expires_at)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(new_record.user_id)
        .bind(&new_record.token_hash)
        .bind(new_record.expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| ApiError::InternalError { message: format!("Database error: {}", e) })
    }

    pub async fn find_by_hash(&self, token_hash: &str) -> Result<Option<RefreshRecord>, ApiError> {
        sqlx::query_as::<_, RefreshRecord>("SELECT * FROM refresh_tokens WHERE token_hash = $1")
            .bind(token_hash)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| ApiError::InternalError { message: format!("Database error: {}", e) })
    }

    /// Marks a record revoked. Idempotent - revoking an already-revoked row is not an error.
    pub async fn mark_revoked(&self, token_hash: &str) -> Result<(), ApiError> {
        sqlx::query("UPDATE refresh_tokens SET revoked = true WHERE token_hash = $1")
            .bind(token_hash)
            .execute(&self.pool)
            .await
            .map_err(|e| ApiError::InternalError { message: format!("Database error: {}", e) })?;
        Ok(())
    }

    /// Revokes every refresh token belonging to a user, e.g. on password change.
    pub async fn revoke_all_for_user(&self, user_id: Uuid) -> Result<(), ApiError> {
        sqlx::query("UPDATE refresh_tokens SET revoked = true WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| ApiError::InternalError { message: format!("Database error: {}", e) })?;
        Ok(())
    }

    pub async fn mark_used(&self, token_hash: &str, when: DateTime<Utc>) -> Result<(), ApiError> {
        sqlx::query("UPDATE refresh_tokens SET last_used_at = $2 WHERE token_hash = $1")
            .bind(token_hash)
            .bind(when)
            .execute(&self.pool)
            .await
            .map_err(|e| ApiError::InternalError { message: format!("Database error: {}", e) })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_refresh_record_struct() {
        let record = NewRefreshRecord {
            user_id: Uuid::new_v4(),
            token_hash: "deadbeef".to_string(),
            expires_at: Utc::now(),
        };
        assert_eq!(record.token_hash, "deadbeef");
    }
}
