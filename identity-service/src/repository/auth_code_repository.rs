//! # Authorization Code Repository
//!
//! Data access for the `auth_codes` table.
//!
//! `mark_used` is the one operation in this repository layer that must be a
//! conditional update rather than a read-then-write: two concurrent `/oauth/token`
//! calls racing on the same code must not both succeed.

use shared::errors::ApiError;
use sqlx::PgPool;

use crate::domain::{AuthCode, NewAuthCode};

#[derive(Debug, Clone)]
pub struct AuthCodeRepository {
    pool: PgPool,
}

impl AuthCodeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, new_code: NewAuthCode) -> Result<AuthCode, ApiError> {
        sqlx::query_as::<_, AuthCode>(
            r#"
            INSERT INTO auth_codes (code, user_id, client_id, redirect_uri, expires_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&new_code.code)
        .bind(new_code.user_id)
        .bind(&new_code.client_id)
        .bind(&new_code.redirect_uri)
        .bind(new_code.expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| ApiError::InternalError { message: format!("Database error: {}", e) })
    }

    /// Returns the full record, including `used` and `expires_at` - the caller
    /// decides whether the code is still exchangeable.
    pub async fn find_by_code(&self, code: &str) -> Result<Option<AuthCode>, ApiError> {
        sqlx::query_as::<_, AuthCode>("SELECT * FROM auth_codes WHERE code = $1")
            .bind(code)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| ApiError::InternalError { message: format!("Database error: {}", e) })
    }

    /// Atomically flips `used` from `false` to `true`. Returns `true` if this call
    /// performed the flip, `false` if the code was already used or doesn't exist -
    /// callers must treat `false` as a hard failure, never retry the exchange.
    pub async fn mark_used(&self, code: &str) -> Result<bool, ApiError> {
        let result = sqlx::query(
            "UPDATE auth_codes SET used = true WHERE code = $1 AND used = false",
        )
        .bind(code)
        .execute(&self.pool)
        .await
        .map_err(|e| ApiError::InternalError { message: format!("Database error: {}", e) })?;

        Ok(result.rows_affected() == 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    #[test]
    fn test_new_auth_code_struct() {
        let new_code = NewAuthCode {
            code: "abc123".to_string(),
            user_id: Uuid::new_v4(),
            client_id: "client-1".to_string(),
            redirect_uri: "https://a.test/cb".to_string(),
            expires_at: Utc::now(),
        };
        assert_eq!(new_code.code, "abc123");
    }
}
