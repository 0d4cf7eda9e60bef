//! # Data Transfer Objects (DTOs)
//!
//! DTOs define the structure of data transferred between client and server.
//! They serve as the **API contract** and handle:
//!
//! - **Request validation**: Using the `validator` crate
//! - **Deserialization**: JSON (direct auth) or form-encoded (OAuth) → Rust structs
//! - **Serialization**: Rust structs → JSON for responses
//!
//! ## DTO Categories
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Direct auth                        │  OAuth (authorization-code grant) │
//! │  ───────────                        │  ───────────────────────────────  │
//! │  RegisterRequest / SessionResponse   │  AuthorizeQuery                   │
//! │  LoginRequest / SessionResponse      │  TokenRequest / OAuthTokenResponse│
//! │  RefreshTokenRequest / TokenResponse │                                   │
//! │  LogoutRequest                       │                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## JSON Naming Convention
//!
//! Direct-auth DTOs use `camelCase` for JSON serialization, matching frontend
//! conventions. OAuth DTOs use the field names defined by the grant itself
//! (`grant_type`, `client_id`, ...) since those are dictated by the RP, not
//! by this service.

use serde::{Deserialize, Serialize};
use validator::Validate;

// =============================================================================
// REGISTRATION
// =============================================================================

/// Request body for user registration.
///
/// # Example JSON
///
/// ```json
/// {
///   "email": "user@example.com",
///   "username": "user123",
///   "password": "a reasonably long passphrase",
///   "displayName": "Jordan"
/// }
/// ```
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email format"))]
    #[validate(length(max = 255, message = "Email too long"))]
    pub email: String,

    #[validate(length(max = 64, message = "Username too long"))]
    pub username: Option<String>,

    /// Plain text password. Length is validated against the configured
    /// minimum at the service layer, not here - the DTO only enforces an
    /// upper bound against pathological payloads.
    #[validate(length(max = 256, message = "Password too long"))]
    pub password: String,

    #[validate(length(max = 100, message = "Display name too long"))]
    pub display_name: Option<String>,
}

// =============================================================================
// LOGIN
// =============================================================================

/// Request body for login.
///
/// `identifier` is resolved by shape - containing `@` means email, anything
/// else is treated as a username.
///
/// Carrying `client_id`/`redirect_uri` turns this into `loginAndStartOAuth`:
/// on success the response is a 302 to `/api/v1/oauth/authorize` with those
/// parameters (plus `state`, if present) instead of a token body. Omitting
/// them is `loginDirect` - tokens are returned straight away.
///
/// # Example JSON
///
/// ```json
/// {
///   "identifier": "user@example.com",
///   "password": "a reasonably long passphrase"
/// }
/// ```
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Identifier is required"))]
    pub identifier: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,

    /// Present together with `redirect_uri` to resume an OAuth authorization
    /// request after login (`loginAndStartOAuth`).
    pub client_id: Option<String>,

    /// Present together with `client_id` to resume an OAuth authorization
    /// request after login (`loginAndStartOAuth`).
    pub redirect_uri: Option<String>,

    /// Opaque RP-supplied value, carried through to the `/oauth/authorize` redirect.
    pub state: Option<String>,
}

// =============================================================================
// TOKEN REFRESH / LOGOUT
// =============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LogoutRequest {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

// =============================================================================
// OAUTH - AUTHORIZATION CODE GRANT
// =============================================================================

/// Query parameters for `GET /oauth/authorize`.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthorizeQuery {
    pub client_id: String,
    pub redirect_uri: String,
    pub response_type: String,
    pub state: Option<String>,
}

/// Form body for `POST /oauth/token`.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenRequest {
    pub grant_type: String,
    pub code: String,
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

/// Response for a successful `/oauth/token` exchange.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuthTokenResponseDto {
    pub access_token: String,
    pub refresh_token: String,
    pub id_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

impl From<shared::auth::jwt::OAuthTokens> for OAuthTokenResponseDto {
    fn from(tokens: shared::auth::jwt::OAuthTokens) -> Self {
        Self {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            id_token: tokens.id_token,
            token_type: "Bearer".to_string(),
            expires_in: tokens.expires_in,
        }
    }
}

// =============================================================================
// RESPONSE TYPES
// =============================================================================

/// Response for a successful direct login: tokens plus the user's public profile.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponseDto {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: UserProfileDto,
}

/// Response for `/auth/refresh`: a freshly signed access token only - the
/// refresh token is not rotated, so there is nothing new to return for it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponseDto {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// User profile in API responses (safe, no `password_hash`).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileDto {
    pub user_id: String,
    pub email: String,
    pub username: Option<String>,
    pub display_name: Option<String>,
    pub email_verified: bool,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub timestamp: String,
}

// =============================================================================
// CONVERSIONS
// =============================================================================

use crate::domain::UserProfile;

impl From<UserProfile> for UserProfileDto {
    fn from(profile: UserProfile) -> Self {
        Self {
            user_id: profile.user_id.to_string(),
            email: profile.email,
            username: profile.username,
            display_name: profile.display_name,
            email_verified: profile.email_verified,
            created_at: profile.created_at.to_rfc3339(),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_register_request_valid() {
        let request = RegisterRequest {
            email: "test@example.com".to_string(),
            username: Some("tester".to_string()),
            password: "a long enough passphrase".to_string(),
            display_name: Some("Test User".to_string()),
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_register_request_invalid_email() {
        let request = RegisterRequest {
            email: "not-an-email".to_string(),
            username: None,
            password: "a long enough passphrase".to_string(),
            display_name: None,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_login_request_valid() {
        let request = LoginRequest {
            identifier: "test@example.com".to_string(),
            password: "password".to_string(),
            client_id: None,
            redirect_uri: None,
            state: None,
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_login_request_empty_identifier() {
        let request = LoginRequest {
            identifier: "".to_string(),
            password: "password".to_string(),
            client_id: None,
            redirect_uri: None,
            state: None,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_login_request_with_oauth_params() {
        let request = LoginRequest {
            identifier: "test@example.com".to_string(),
            password: "password".to_string(),
            client_id: Some("client-1".to_string()),
            redirect_uri: Some("https://rp.test/cb".to_string()),
            state: Some("xyz".to_string()),
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_message_response_new() {
        let response = MessageResponse::new("Test message");
        assert_eq!(response.message, "Test message");
    }

    #[test]
    fn test_json_serialization_camel_case() {
        let response = MessageResponse::new("Hello");
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("message"));
    }
}
