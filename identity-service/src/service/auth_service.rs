//! # Authentication Service
//!
//! Core business logic for direct (non-OAuth) authentication: registration,
//! credential verification, session issuance, refresh, and revocation.
//!
//! ## Security Model
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Token Architecture                              │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │  Access Token (JWT)              Refresh Token (JWT, separate secret)   │
//! │  Stateless verification          Stateful: RefreshRecord row at rest,   │
//! │  via signature + claims          keyed by SHA-256 digest, revocable     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `authenticate` runs the Argon2 verification unconditionally - against the
//! stored hash when a user is found, against a fixed dummy hash otherwise -
//! so a non-existent email and a wrong password are indistinguishable in both
//! response and timing.
//!
//! ## Error Handling
//!
//! | Scenario              | Error Type             | HTTP Status |
//! |-----------------------|------------------------|-------------|
//! | Invalid credentials   | `InvalidCredentials`   | 401         |
//! | Email taken           | `EmailTaken`           | 409         |
//! | Username taken        | `UsernameTaken`        | 409         |
//! | Refresh invalid       | `InvalidRefresh`        | 401         |
//! | Refresh revoked       | `Revoked`              | 401         |
//! | Refresh record expired| `TokenExpired`          | 401         |

use chrono::{Duration as ChronoDuration, Utc};
use shared::{
    auth::{
        code::hash_token,
        jwt::{JwtService, SessionTokens, TokenSubject},
        password::{PasswordHasher, PasswordValidator},
    },
    config::{JwtConfig, PasswordConfig},
    errors::ApiError,
};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    domain::{NewRefreshRecord, NewUser, User, UserProfile},
    repository::{RefreshTokenRepository, UserRepository},
};

// =============================================================================
// SERVICE STRUCT
// =============================================================================

/// Authentication service with business logic for direct login.
///
/// `Send + Sync`: `UserRepository`/`RefreshTokenRepository` hold `PgPool`
/// (internally `Arc`), `JwtService`/`PasswordHasher` are wrapped in `Arc`.
#[derive(Clone)]
pub struct AuthService {
    users: UserRepository,
    refresh_tokens: RefreshTokenRepository,
    jwt_service: Arc<JwtService>,
    password_hasher: Arc<PasswordHasher>,
    jwt_config: JwtConfig,
    password_config: PasswordConfig,
}

impl AuthService {
    pub fn new(
        users: UserRepository,
        refresh_tokens: RefreshTokenRepository,
        jwt_service: Arc<JwtService>,
        password_hasher: Arc<PasswordHasher>,
        jwt_config: JwtConfig,
        password_config: PasswordConfig,
    ) -> Self {
        Self {
            users,
            refresh_tokens,
            jwt_service,
            password_hasher,
            jwt_config,
            password_config,
        }
    }

    // =========================================================================
    // REGISTRATION
    // =========================================================================

    /// Registers a new user account. Does not issue tokens - callers invoke
    /// `issue_session` separately, matching the two-step shape of credential
    /// login (verify, then issue).
    pub async fn register(
        &self,
        email: &str,
        username: Option<&str>,
        password: &str,
        display_name: Option<&str>,
    ) -> Result<UserProfile, ApiError> {
        PasswordValidator::validate(password, self.password_config.min_length).map_err(|errors| {
            ApiError::BadRequest {
                message: errors.join("; "),
            }
        })?;

        if self.users.find_by_email(email).await?.is_some() {
            return Err(ApiError::EmailTaken);
        }
        if let Some(username) = username {
            if self.users.find_by_username(username).await?.is_some() {
                return Err(ApiError::UsernameTaken);
            }
        }

        let password_hash = self.password_hasher.hash(password)?;

        let new_user = NewUser {
            email: email.to_string(),
            username: username.map(str::to_string),
            password_hash,
            display_name: display_name.map(str::to_string),
        };

        let user = self.users.insert(new_user).await?;

        info!(user_id = %user.user_id, "user registered");

        Ok(user.into())
    }

    // =========================================================================
    // AUTHENTICATION
    // =========================================================================

    /// Resolves `identifier` by shape (`@` present ⇒ email, else username) and
    /// verifies the password. The no-user and wrong-password cases return the
    /// same error and run the same Argon2 cost - see module docs.
    pub async fn authenticate(&self, identifier: &str, password: &str) -> Result<User, ApiError> {
        let user = if identifier.contains('@') {
            self.users.find_by_email(identifier).await?
        } else {
            self.users.find_by_username(identifier).await?
        };

        let user = match user {
            Some(user) => user,
            None => {
                self.password_hasher.verify_dummy(password);
                warn!("authentication attempt for unknown identifier");
                return Err(ApiError::InvalidCredentials);
            }
        };

        let is_valid = self.password_hasher.verify(password, &user.password_hash)?;
        if !is_valid {
            warn!(user_id = %user.user_id, "authentication failed - wrong password");
            return Err(ApiError::InvalidCredentials);
        }

        Ok(user)
    }

    // =========================================================================
    // SESSION ISSUANCE
    // =========================================================================

    /// Issues a fresh `(access, refresh)` pair and persists the refresh record.
    pub async fn issue_session(&self, user: &User) -> Result<SessionTokens, ApiError> {
        let subject = TokenSubject {
            user_id: user.user_id,
            email: user.email.clone(),
            name: user.display_name.clone(),
            email_verified: user.email_verified,
        };

        let token_id = Uuid::new_v4();
        let access_token = self.jwt_service.generate_access_token(&subject)?;
        let refresh_token = self
            .jwt_service
            .generate_refresh_token(user.user_id, token_id)?;

        let expires_at =
            Utc::now() + ChronoDuration::seconds(self.jwt_config.refresh_ttl_seconds as i64);

        self.refresh_tokens
            .insert(NewRefreshRecord {
                user_id: user.user_id,
                token_hash: hash_token(&refresh_token),
                expires_at,
            })
            .await?;

        info!(user_id = %user.user_id, "session issued");

        Ok(SessionTokens {
            access_token,
            refresh_token,
            expires_in: self.jwt_config.access_ttl_seconds as i64,
        })
    }

    // =========================================================================
    // TOKEN REFRESH
    // =========================================================================

    /// Re-issues only the access token. Does not rotate the refresh token -
    /// the same `RefreshRecord` has its `last_used_at` bumped instead. Any
    /// failure below is terminal; no partial state change occurs.
    pub async fn refresh(&self, raw_refresh: &str) -> Result<String, ApiError> {
        let claims = self.jwt_service.validate_refresh_token(raw_refresh)?;

        let token_hash = hash_token(raw_refresh);
        let record = self
            .refresh_tokens
            .find_by_hash(&token_hash)
            .await?
            .ok_or(ApiError::InvalidRefresh)?;

        if record.revoked {
            return Err(ApiError::Revoked);
        }
        if Utc::now() > record.expires_at {
            return Err(ApiError::TokenExpired);
        }

        let user = self
            .users
            .find_by_id(claims.sub)
            .await?
            .ok_or(ApiError::InvalidRefresh)?;

        self.refresh_tokens.mark_used(&token_hash, Utc::now()).await?;

        let subject = TokenSubject {
            user_id: user.user_id,
            email: user.email.clone(),
            name: user.display_name.clone(),
            email_verified: user.email_verified,
        };

        info!(user_id = %user.user_id, "access token refreshed");

        self.jwt_service.generate_access_token(&subject)
    }

    // =========================================================================
    // REVOCATION
    // =========================================================================

    /// Revokes the session identified by `raw_refresh`. A missing record is
    /// not an error - logout should not leak whether a token ever existed.
    pub async fn revoke(&self, raw_refresh: &str) -> Result<(), ApiError> {
        let token_hash = hash_token(raw_refresh);
        self.refresh_tokens.mark_revoked(&token_hash).await
    }

    /// Revokes every session owned by `user_id`.
    pub async fn revoke_all(&self, user_id: Uuid) -> Result<(), ApiError> {
        self.refresh_tokens.revoke_all_for_user(user_id).await?;
        info!(user_id = %user_id, "all sessions revoked");
        Ok(())
    }

    // =========================================================================
    // PROFILE
    // =========================================================================

    pub async fn get_profile(&self, user_id: Uuid) -> Result<UserProfile, ApiError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ApiError::NotFound {
                resource: format!("user:{}", user_id),
            })?;

        Ok(user.into())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_shape_detection() {
        assert!("alice@example.com".contains('@'));
        assert!(!"alice".contains('@'));
    }
}
