//! # Authentication and OAuth Domain Entities
//!
//! The four persistent entities behind the identity provider: [`User`],
//! [`RefreshRecord`], [`AuthCode`], and [`Client`]. Each maps directly to one
//! Postgres table; the `New*` structs are the corresponding insert payloads.
//!
//! ## Entity Overview
//!
//! ```text
//! ┌──────────────┐        ┌──────────────────┐
//! │     User     │───1:N─▶│  RefreshRecord    │
//! │ (users)      │        │ (refresh_tokens)  │
//! └──────┬───────┘        └───────────────────┘
//!        │
//!        │ 1:N
//!        ▼
//! ┌──────────────┐        ┌───────────────────┐
//! │   AuthCode   │◀──N:1──│      Client       │
//! │ (auth_codes) │        │    (clients)      │
//! └──────────────┘        └───────────────────┘
//! ```
//!
//! ## Security Considerations
//!
//! - **Never expose `password_hash`**: use [`UserProfile`] for API responses.
//! - **`RefreshRecord.token_hash`**: a digest, never the raw refresh token ([`shared::auth::code::hash_token`]).
//! - **`AuthCode` one-time use**: `used` is flipped atomically by the repository layer,
//!   never read-then-written from the service layer (see `auth_code_repository`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// =============================================================================
// USER ENTITY
// =============================================================================

/// Complete user entity as stored in the database.
///
/// Maps directly to the `users` table, including the sensitive `password_hash`
/// field. **Never expose this struct directly in API responses** - use
/// [`UserProfile`] instead.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    /// Opaque primary key (UUID v4)
    pub user_id: Uuid,
    /// Unique email address; lookups compare case-insensitively
    pub email: String,
    /// Optional unique handle, alternate login identifier
    pub username: Option<String>,
    /// Argon2id password hash in PHC format
    pub password_hash: String,
    /// Optional display name shown in ID tokens and `/auth/me`
    pub display_name: Option<String>,
    /// Whether the user's email has been verified
    pub email_verified: bool,
    /// Account creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// USER PROFILE (SAFE FOR API RESPONSES)
// =============================================================================

/// Public user view, safe to return from `/auth/register`, `/auth/login`, and
/// `/auth/me`. Excludes `password_hash` and internal timestamps beyond `created_at`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub user_id: Uuid,
    pub email: String,
    pub username: Option<String>,
    pub display_name: Option<String>,
    pub email_verified: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            user_id: user.user_id,
            email: user.email,
            username: user.username,
            display_name: user.display_name,
            email_verified: user.email_verified,
            created_at: user.created_at,
        }
    }
}

/// Data required to create a new user. `password_hash` must already be hashed
/// (Argon2id) before constructing this - never pass a plaintext password here.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub username: Option<String>,
    pub password_hash: String,
    pub display_name: Option<String>,
}

// =============================================================================
// REFRESH RECORD
// =============================================================================

/// One row per issued refresh token.
///
/// `token_hash` is the only representation of the token kept at rest - the raw
/// value is returned to the client once, at issuance, and never persisted.
/// Refresh is NOT rotating: the same record's `last_used_at` is bumped on every
/// successful `/auth/refresh` call, and no new row is written.
#[derive(Debug, Clone, FromRow)]
pub struct RefreshRecord {
    pub token_id: Uuid,
    pub user_id: Uuid,
    /// SHA-256 hex digest of the refresh token (`shared::auth::code::hash_token`)
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
    pub revoked: bool,
    pub last_used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a new refresh record, written at login and at `/oauth/token`.
#[derive(Debug, Clone)]
pub struct NewRefreshRecord {
    pub user_id: Uuid,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
}

// =============================================================================
// AUTH CODE
// =============================================================================

/// A short-lived, single-use capability issued by `/oauth/authorize` and
/// exchanged exactly once at `/oauth/token`.
///
/// Invariants enforced by the repository layer, not here: the code can be
/// exchanged at most once (`used` flips atomically), the exchange's
/// `redirect_uri` must byte-equal the value captured at issuance, and
/// `expires_at` is never more than `code_ttl_seconds` (hard ceiling: 10 minutes)
/// past `created_at`.
#[derive(Debug, Clone, FromRow)]
pub struct AuthCode {
    /// The code string itself - unique, indexed, looked up directly (not hashed)
    pub code: String,
    pub user_id: Uuid,
    pub client_id: String,
    pub redirect_uri: String,
    pub expires_at: DateTime<Utc>,
    pub used: bool,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a newly issued authorization code.
#[derive(Debug, Clone)]
pub struct NewAuthCode {
    pub code: String,
    pub user_id: Uuid,
    pub client_id: String,
    pub redirect_uri: String,
    pub expires_at: DateTime<Utc>,
}

// =============================================================================
// CLIENT
// =============================================================================

/// A registered relying party (RP).
///
/// Administratively provisioned and effectively immutable at runtime - there is
/// no self-service client registration endpoint in this core.
#[derive(Debug, Clone, FromRow)]
pub struct Client {
    /// Stable public identifier, presented by the RP on every OAuth call
    pub client_id: String,
    /// Argon2id hash of the client secret - never stored in plaintext
    pub client_secret_hash: String,
    pub display_name: String,
    /// Exact-match redirect URI whitelist. Stored as a Postgres `text[]`;
    /// sqlx maps it directly to `Vec<String>`.
    pub allowed_redirect_uris: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Client {
    /// Checks the exact-match redirect URI whitelist. No prefix or pattern
    /// matching - a single byte of difference fails this check, which is what
    /// prevents open-redirect-style code interception.
    pub fn allows_redirect(&self, redirect_uri: &str) -> bool {
        self.allowed_redirect_uris
            .iter()
            .any(|allowed| allowed == redirect_uri)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(uris: Vec<&str>) -> Client {
        Client {
            client_id: "client-1".to_string(),
            client_secret_hash: "hash".to_string(),
            display_name: "Test Client".to_string(),
            allowed_redirect_uris: uris.into_iter().map(String::from).collect(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn redirect_uri_must_match_exactly() {
        let c = client(vec!["https://a.test/cb"]);
        assert!(c.allows_redirect("https://a.test/cb"));
        assert!(!c.allows_redirect("https://a.test/cb/"));
        assert!(!c.allows_redirect("https://a.test/cb?x=1"));
        assert!(!c.allows_redirect("http://a.test/cb"));
    }

    #[test]
    fn redirect_uri_rejected_when_not_whitelisted() {
        let c = client(vec!["https://a.test/cb"]);
        assert!(!c.allows_redirect("https://evil.test/cb"));
    }
}
