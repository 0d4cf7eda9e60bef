//! # User Repository
//!
//! Data access for the `users` table: lookup by email, username, or ID, and
//! insertion at registration.
//!
//! ## Error Handling
//!
//! | sqlx Error            | ApiError Variant       |
//! |------------------------|------------------------|
//! | Unique violation on `users_email_key`    | `EmailTaken`    |
//! | Unique violation on `users_username_key` | `UsernameTaken` |
//! | Other                  | `InternalError`        |

use shared::errors::ApiError;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{NewUser, User};

/// Repository for user-related database operations.
///
/// `UserRepository` is `Send + Sync` because `PgPool` internally uses `Arc`,
/// so it can be shared across async tasks and Actix-web workers freely.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a new user.
    ///
    /// # Errors
    ///
    /// - `ApiError::EmailTaken` if `email` collides with an existing user
    /// - `ApiError::UsernameTaken` if `username` is `Some` and collides
    pub async fn insert(&self, new_user: NewUser) -> Result<User, ApiError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, username, password_hash, display_name)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&new_user.email)
        .bind(&new_user.username)
        .bind(&new_user.password_hash)
        .bind(&new_user.display_name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e {
                match db_err.constraint() {
                    Some("users_email_key") => return ApiError::EmailTaken,
                    Some("users_username_key") => return ApiError::UsernameTaken,
                    _ => {}
                }
            }
            ApiError::InternalError { message: format!("Database error: {}", e) }
        })
    }

    /// Finds a user by email. Equality is case-insensitive: the `email` column
    /// carries a `citext` type (or an equivalent `lower(email)` unique index),
    /// so this is a straight parameterized lookup, not a `LOWER()` scan.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| ApiError::InternalError { message: format!("Database error: {}", e) })
    }

    /// Finds a user by username. Returns `None` if `username` is unset for every user
    /// or no row matches - callers only reach here when a username was supplied.
    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, ApiError> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| ApiError::InternalError { message: format!("Database error: {}", e) })
    }

    pub async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>, ApiError> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| ApiError::InternalError { message: format!("Database error: {}", e) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_struct() {
        let new_user = NewUser {
            email: "test@example.com".to_string(),
            username: Some("tester".to_string()),
            password_hash: "$argon2id$...".to_string(),
            display_name: Some("Test User".to_string()),
        };

        assert_eq!(new_user.email, "test@example.com");
        assert_eq!(new_user.username.as_deref(), Some("tester"));
    }
}
