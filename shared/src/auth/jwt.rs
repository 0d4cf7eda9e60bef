//! # JWT Token Codec
//!
//! Signs and verifies the three JWT kinds issued by the identity provider.
//!
//! ## What is JWT?
//!
//! JWT (JSON Web Token) is an open standard ([RFC 7519](https://tools.ietf.org/html/rfc7519))
//! for securely transmitting information between parties as a JSON object. This information
//! can be verified because it is digitally signed.
//!
//! ## Token Structure
//!
//! A JWT consists of three parts separated by dots:
//!
//! ```text
//! xxxxx.yyyyy.zzzzz
//! ├────┼─────┼────┤
//! │    │     │    └── Signature (verifies integrity)
//! │    │     └─────── Payload (claims - the actual data)
//! │    └───────────── Header (algorithm and token type)
//! ```
//!
//! ## Our Token Implementation
//!
//! | Token Type | TTL | Secret | Purpose |
//! |------------|-----|--------|---------|
//! | Access | 1 day | `access_token_secret` | API authorization, `sso_session` cookie |
//! | Refresh | 30 days | `refresh_token_secret` | `/auth/refresh` exchange |
//! | ID | 1 day | `access_token_secret` | profile claims for the relying party |
//!
//! Access and refresh tokens are signed with **distinct secrets**. A leak of the access
//! secret alone cannot be used to forge a refresh token (and vice versa). ID tokens reuse
//! the access secret only because both are meant for the same audience; nothing requires
//! that choice and a deployment MAY configure a third key.
//!
//! ## Security Notes
//!
//! - HS256 (HMAC-SHA256) for all three kinds.
//! - Verification distinguishes expired-signature, malformed/bad-signature, and
//!   issuer/audience mismatch so callers can react appropriately.
//! - The `jti` claim is unique per issuance and usable for blacklisting if an adapter
//!   wants one (see [`crate::redis_client::RedisClient::blacklist_token`]).
//!
//! ## Related Documentation
//!
//! - [`crate::config::JwtConfig`] - Configuration options
//! - [`crate::auth::middleware`] - Request authentication

use crate::config::JwtConfig;
use crate::errors::ApiError;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// Claims Structure
// =============================================================================

/// JWT claims shared by all three token kinds.
///
/// Which optional fields are populated depends on `token_type`: access and ID tokens
/// carry `email`/`email_verified` (ID tokens additionally carry `name`); refresh tokens
/// carry only `token_id`. Fields not relevant to a kind are omitted from the encoded
/// token rather than sent as `null`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - the user's unique identifier (UUID).
    pub sub: Uuid,

    /// User's email address. Present on access and ID tokens.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub email: Option<String>,

    /// Whether the user's email has been verified. Present on access and ID tokens.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub email_verified: Option<bool>,

    /// Display name. Present on ID tokens only.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub name: Option<String>,

    /// Unique identifier for this refresh-token issuance. Present on refresh tokens only;
    /// used to correlate the JWT with its `RefreshRecord` row independent of the digest.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub token_id: Option<Uuid>,

    /// Issuer - identifies the IdP that created the token.
    pub iss: String,

    /// Audience. Access and ID tokens carry the IdP's API audience; refresh tokens
    /// carry none (refresh tokens are never presented to resource servers).
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub aud: Option<String>,

    /// Expiration time as Unix timestamp (seconds since epoch).
    pub exp: i64,

    /// Issued-at time as Unix timestamp.
    pub iat: i64,

    /// JWT ID - unique identifier for this specific token.
    pub jti: Uuid,

    /// Token kind, so an access token can never be accepted where a refresh token is
    /// expected and vice versa.
    #[serde(rename = "type")]
    pub token_type: TokenType,
}

// =============================================================================
// Token Type
// =============================================================================

/// Distinguishes the three token kinds defined by the identity provider.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    /// Short-lived bearer token authorizing API calls (default 1 day).
    Access,
    /// Long-lived token exchanged at `/auth/refresh` for a new access token (default 30 days).
    Refresh,
    /// Profile-claims token handed to relying parties after a successful `/oauth/token` call.
    Id,
}

// =============================================================================
// Issued Token Bundles
// =============================================================================

/// The `(access, refresh)` pair returned by direct login and by `/auth/refresh`'s
/// sibling, session issuance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionTokens {
    /// The access token for API authorization and the `sso_session`/`access_token` cookies.
    pub access_token: String,
    /// The refresh token for `/auth/refresh`.
    pub refresh_token: String,
    /// Seconds until the access token expires.
    pub expires_in: i64,
}

/// The full `(access, refresh, id)` triple returned by `/oauth/token`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub id_token: String,
    pub expires_in: i64,
}

// =============================================================================
// JWT Service
// =============================================================================

/// Profile fields needed to mint access/ID token claims. Decoupled from the `User`
/// entity so the codec has no dependency on the domain layer.
#[derive(Debug, Clone)]
pub struct TokenSubject {
    pub user_id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub email_verified: bool,
}

/// Service for JWT generation and validation. Created once at startup and shared
/// across the application via `web::Data` / `Arc`.
///
/// Access and ID tokens share `encoding_key`/`decoding_key`; refresh tokens use the
/// independent `refresh_encoding_key`/`refresh_decoding_key` pair so a leak of one
/// secret cannot forge the other kind.
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    refresh_encoding_key: EncodingKey,
    refresh_decoding_key: DecodingKey,
    config: JwtConfig,
}

impl JwtService {
    /// Creates a new JWT service from configuration. Does not panic; invalid secrets
    /// surface as validation failures at runtime rather than construction time.
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.access_token_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.access_token_secret.as_bytes());
        let refresh_encoding_key = EncodingKey::from_secret(config.refresh_token_secret.as_bytes());
        let refresh_decoding_key = DecodingKey::from_secret(config.refresh_token_secret.as_bytes());

        Self {
            encoding_key,
            decoding_key,
            refresh_encoding_key,
            refresh_decoding_key,
            config,
        }
    }

    /// Signs an access token for `subject`.
    pub fn generate_access_token(&self, subject: &TokenSubject) -> Result<String, ApiError> {
        let now = Utc::now();
        let ttl = Duration::seconds(self.config.access_ttl_seconds as i64);

        let claims = Claims {
            sub: subject.user_id,
            email: Some(subject.email.clone()),
            email_verified: Some(subject.email_verified),
            name: None,
            token_id: None,
            iss: self.config.issuer.clone(),
            aud: Some(self.config.audience.clone()),
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4(),
            token_type: TokenType::Access,
        };

        self.encode(&claims, &self.encoding_key)
    }

    /// Signs an ID token for `subject`.
    pub fn generate_id_token(&self, subject: &TokenSubject) -> Result<String, ApiError> {
        let now = Utc::now();
        let ttl = Duration::seconds(self.config.access_ttl_seconds as i64);

        let claims = Claims {
            sub: subject.user_id,
            email: Some(subject.email.clone()),
            email_verified: Some(subject.email_verified),
            name: subject.name.clone(),
            token_id: None,
            iss: self.config.issuer.clone(),
            aud: Some(self.config.audience.clone()),
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4(),
            token_type: TokenType::Id,
        };

        self.encode(&claims, &self.encoding_key)
    }

    /// Signs a refresh token. `token_id` should be freshly generated per issuance and
    /// carried alongside the `RefreshRecord` so a record can be correlated back to its JWT.
    pub fn generate_refresh_token(
        &self,
        user_id: Uuid,
        token_id: Uuid,
    ) -> Result<String, ApiError> {
        let now = Utc::now();
        let ttl = Duration::seconds(self.config.refresh_ttl_seconds as i64);

        let claims = Claims {
            sub: user_id,
            email: None,
            email_verified: None,
            name: None,
            token_id: Some(token_id),
            iss: self.config.issuer.clone(),
            aud: None,
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4(),
            token_type: TokenType::Refresh,
        };

        self.encode(&claims, &self.refresh_encoding_key)
    }

    fn encode(&self, claims: &Claims, key: &EncodingKey) -> Result<String, ApiError> {
        encode(&Header::default(), claims, key).map_err(|e| ApiError::InternalError {
            message: format!("failed to sign token: {e}"),
        })
    }

    /// Validates and decodes an access token. Rejects tokens of any other kind.
    pub fn validate_access_token(&self, token: &str) -> Result<Claims, ApiError> {
        let claims = self.decode_with_audience(token, &self.decoding_key)?;
        if claims.token_type != TokenType::Access {
            return Err(ApiError::InvalidToken);
        }
        Ok(claims)
    }

    /// Validates and decodes an ID token. Rejects tokens of any other kind.
    pub fn validate_id_token(&self, token: &str) -> Result<Claims, ApiError> {
        let claims = self.decode_with_audience(token, &self.decoding_key)?;
        if claims.token_type != TokenType::Id {
            return Err(ApiError::InvalidToken);
        }
        Ok(claims)
    }

    /// Validates and decodes a refresh token against the dedicated refresh secret.
    /// Rejects tokens of any other kind.
    pub fn validate_refresh_token(&self, token: &str) -> Result<Claims, ApiError> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.config.issuer]);
        validation.validate_aud = false;

        let token_data: TokenData<Claims> =
            decode(token, &self.refresh_decoding_key, &validation).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => ApiError::TokenExpired,
                    _ => ApiError::InvalidRefresh,
                }
            })?;

        if token_data.claims.token_type != TokenType::Refresh {
            return Err(ApiError::InvalidRefresh);
        }

        Ok(token_data.claims)
    }

    fn decode_with_audience(&self, token: &str, key: &DecodingKey) -> Result<Claims, ApiError> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_audience(&[&self.config.audience]);

        let token_data: TokenData<Claims> = decode(token, key, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => ApiError::TokenExpired,
                _ => ApiError::InvalidToken,
            }
        })?;

        Ok(token_data.claims)
    }

    /// Extracts the token from an `Authorization: Bearer <token>` header.
    pub fn extract_from_header(auth_header: &str) -> Result<&str, ApiError> {
        auth_header
            .strip_prefix("Bearer ")
            .ok_or(ApiError::InvalidToken)
    }
}

// Implement Debug manually to avoid exposing keys
impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> JwtConfig {
        JwtConfig {
            access_token_secret: "test_access_secret_minimum_32_characters".to_string(),
            refresh_token_secret: "test_refresh_secret_minimum_32_characters_different".to_string(),
            access_ttl_seconds: 86400,
            refresh_ttl_seconds: 2_592_000,
            code_ttl_seconds: 600,
            issuer: "test-issuer".to_string(),
            audience: "test-audience".to_string(),
        }
    }

    fn subject() -> TokenSubject {
        TokenSubject {
            user_id: Uuid::new_v4(),
            email: "alice@x.test".to_string(),
            name: Some("Alice".to_string()),
            email_verified: true,
        }
    }

    #[test]
    fn generates_and_validates_access_token() {
        let service = JwtService::new(test_config());
        let subject = subject();

        let token = service.generate_access_token(&subject).unwrap();
        let claims = service.validate_access_token(&token).unwrap();

        assert_eq!(claims.sub, subject.user_id);
        assert_eq!(claims.email.as_deref(), Some("alice@x.test"));
        assert_eq!(claims.token_type, TokenType::Access);
    }

    #[test]
    fn generates_and_validates_id_token() {
        let service = JwtService::new(test_config());
        let subject = subject();

        let token = service.generate_id_token(&subject).unwrap();
        let claims = service.validate_id_token(&token).unwrap();

        assert_eq!(claims.name.as_deref(), Some("Alice"));
        assert_eq!(claims.token_type, TokenType::Id);
    }

    #[test]
    fn generates_and_validates_refresh_token() {
        let service = JwtService::new(test_config());
        let user_id = Uuid::new_v4();
        let token_id = Uuid::new_v4();

        let token = service.generate_refresh_token(user_id, token_id).unwrap();
        let claims = service.validate_refresh_token(&token).unwrap();

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.token_id, Some(token_id));
        assert_eq!(claims.token_type, TokenType::Refresh);
    }

    #[test]
    fn access_token_rejected_as_refresh() {
        let service = JwtService::new(test_config());
        let token = service.generate_access_token(&subject()).unwrap();

        // Signed with the access secret; the refresh decoder uses a different key
        // so this must fail signature verification, not just the type check.
        let result = service.validate_refresh_token(&token);
        assert!(matches!(result, Err(ApiError::InvalidRefresh)));
    }

    #[test]
    fn refresh_token_rejected_as_access() {
        let service = JwtService::new(test_config());
        let token = service
            .generate_refresh_token(Uuid::new_v4(), Uuid::new_v4())
            .unwrap();

        let result = service.validate_access_token(&token);
        assert!(matches!(result, Err(ApiError::InvalidToken)));
    }

    #[test]
    fn id_token_rejected_as_access() {
        let service = JwtService::new(test_config());
        let token = service.generate_id_token(&subject()).unwrap();

        let result = service.validate_access_token(&token);
        assert!(matches!(result, Err(ApiError::InvalidToken)));
    }

    #[test]
    fn distinct_secrets_mean_cross_signing_fails() {
        // A token signed with the refresh secret can never validate against the
        // access decoding key, even if the claims shape matched.
        let mismatched_config = JwtConfig {
            access_token_secret: test_config().refresh_token_secret,
            ..test_config()
        };
        let attacker_service = JwtService::new(mismatched_config);
        let forged = attacker_service.generate_access_token(&subject()).unwrap();

        let real_service = JwtService::new(test_config());
        assert!(real_service.validate_access_token(&forged).is_err());
    }

    #[test]
    fn extract_from_header_valid() {
        let token = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9";
        let header = format!("Bearer {token}");

        let extracted = JwtService::extract_from_header(&header).unwrap();
        assert_eq!(extracted, token);
    }

    #[test]
    fn extract_from_header_missing_prefix() {
        let result = JwtService::extract_from_header("Token abc");
        assert!(matches!(result, Err(ApiError::InvalidToken)));
    }

    #[test]
    fn jti_is_unique_per_issuance() {
        let service = JwtService::new(test_config());
        let subject = subject();

        let a = service.validate_access_token(&service.generate_access_token(&subject).unwrap()).unwrap();
        let b = service.validate_access_token(&service.generate_access_token(&subject).unwrap()).unwrap();

        assert_ne!(a.jti, b.jti);
    }
}
