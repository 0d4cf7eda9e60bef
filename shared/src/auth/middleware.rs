//! # Authentication Middleware for Actix-web
//!
//! Extracts and validates JWT access tokens from HTTP requests.
//!
//! ## Overview
//!
//! | Component | Purpose | Usage |
//! |-----------|---------|-------|
//! | [`AuthMiddleware`] | Extract and validate JWT | Service-level authentication |
//! | [`AuthenticatedUser`] | Extractor for handlers | Get current user in handlers |
//!
//! ## Authentication Flow
//!
//! ```text
//! ┌─────────┐     ┌──────────────┐     ┌─────────────┐     ┌─────────┐
//! │ Request │────►│ AuthMiddleware│────►│ Extract JWT │────►│ Validate│
//! └─────────┘     └──────────────┘     └─────────────┘     └────┬────┘
//!                                                                │
//!                 ┌──────────────┐     ┌─────────────┐          │
//!                 │   Handler    │◄────│ Insert User │◄─────────┘
//!                 │(AuthenticUser)│     │ Extension   │     (if valid)
//!                 └──────────────┘     └─────────────┘
//! ```
//!
//! Token presentation follows cookie-first precedence: the `access_token` cookie is
//! checked before the `Authorization: Bearer` header, so browser sessions and
//! machine-to-machine API callers are both served by the same middleware.
//!
//! ## Usage Example
//!
//! ### Setup Middleware
//!
//! ```rust,ignore
//! use shared::auth::{AuthMiddleware, JwtService};
//! use std::sync::Arc;
//!
//! let jwt_service = Arc::new(JwtService::new(config.jwt));
//! let auth_middleware = AuthMiddleware::new(jwt_service);
//!
//! App::new()
//!     .service(
//!         web::scope("/api")
//!             .wrap(auth_middleware)
//!             .route("/me", web::get().to(me))
//!     )
//! ```
//!
//! ### Use in Handlers
//!
//! ```rust,ignore
//! use shared::auth::AuthenticatedUser;
//!
//! async fn me(user: AuthenticatedUser) -> impl Responder {
//!     format!("Hello, {}!", user.email)
//! }
//! ```

use crate::auth::jwt::{Claims, JwtService};
use crate::errors::ApiError;
use actix_web::{dev::ServiceRequest, Error, HttpMessage};
use std::sync::Arc;
use uuid::Uuid;

// =============================================================================
// Authenticated User
// =============================================================================

/// An authenticated principal extracted from a validated access token.
///
/// Inserted into request extensions by [`AuthMiddleware`]; retrieved in handlers
/// via the `FromRequest` impl below.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// The user's unique identifier (`sub` claim)
    pub user_id: Uuid,
    /// User's email address, carried for display/logging
    pub email: String,
    /// Whether the user's email was verified at token-issuance time
    pub email_verified: bool,
}

/// Converts JWT claims to an authenticated user.
///
/// Access tokens always carry `email`; a token produced from stale claims
/// without one is treated as the empty string rather than failing extraction.
impl From<Claims> for AuthenticatedUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email.unwrap_or_default(),
            email_verified: claims.email_verified.unwrap_or(false),
        }
    }
}

// =============================================================================
// Auth Middleware
// =============================================================================

/// Middleware for JWT-based authentication.
///
/// This middleware:
/// 1. Extracts the JWT from the `access_token` cookie, falling back to the
///    `Authorization` header
/// 2. Validates the token signature and claims
/// 3. Inserts the authenticated user into request extensions
#[derive(Clone)]
pub struct AuthMiddleware {
    /// JWT service for token validation
    jwt_service: Arc<JwtService>,
}

impl AuthMiddleware {
    /// Creates a new authentication middleware.
    pub fn new(jwt_service: Arc<JwtService>) -> Self {
        Self { jwt_service }
    }

    /// Extracts and validates the user from a request.
    ///
    /// Cookie takes precedence over header so that a request carrying both
    /// (e.g. a same-site fetch with an explicit `Authorization` header left over
    /// from a cached client) is driven by the cookie, which is what logout clears.
    ///
    /// ## Errors
    ///
    /// - `ApiError::MissingAuth` - no `access_token` cookie and no `Authorization` header
    /// - `ApiError::InvalidToken` - malformed token or invalid signature
    /// - `ApiError::TokenExpired` - token has expired
    pub fn extract_user(&self, req: &ServiceRequest) -> Result<AuthenticatedUser, ApiError> {
        let token = if let Some(cookie) = req.cookie("access_token") {
            cookie.value().to_string()
        } else {
            let auth_header = req
                .headers()
                .get("Authorization")
                .and_then(|h| h.to_str().ok())
                .ok_or(ApiError::MissingAuth)?;
            JwtService::extract_from_header(auth_header)?.to_string()
        };

        let claims = self.jwt_service.validate_access_token(&token)?;

        Ok(AuthenticatedUser::from(claims))
    }

    /// Authenticates a request and stores the user in extensions.
    ///
    /// Call this from middleware to authenticate the request. The user will be
    /// available via the `AuthenticatedUser` extractor.
    pub fn authenticate(&self, req: &ServiceRequest) -> Result<(), ApiError> {
        let user = self.extract_user(req)?;
        req.extensions_mut().insert(user);
        Ok(())
    }
}

// =============================================================================
// Actix-web Extractor
// =============================================================================

/// Extractor for getting the authenticated user in handlers.
///
/// ## Errors
///
/// Returns `ApiError::MissingAuth` if no user is in request extensions.
/// This happens if authentication middleware wasn't applied.
impl actix_web::FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = std::future::Ready<Result<Self, Self::Error>>;

    fn from_request(
        req: &actix_web::HttpRequest,
        _payload: &mut actix_web::dev::Payload,
    ) -> Self::Future {
        let result = req
            .extensions()
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| ApiError::MissingAuth.into());

        std::future::ready(result)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn test_claims() -> Claims {
        Claims {
            sub: Uuid::new_v4(),
            email: Some("test@example.com".to_string()),
            email_verified: Some(true),
            name: None,
            token_id: None,
            iss: "test".to_string(),
            aud: Some("test".to_string()),
            exp: 0,
            iat: 0,
            jti: Uuid::new_v4(),
            token_type: crate::auth::jwt::TokenType::Access,
        }
    }

    #[test]
    fn test_authenticated_user_from_claims() {
        let claims = test_claims();
        let user = AuthenticatedUser::from(claims.clone());

        assert_eq!(user.user_id, claims.sub);
        assert_eq!(user.email, "test@example.com");
        assert!(user.email_verified);
    }

    #[test]
    fn test_authenticated_user_defaults_when_claims_sparse() {
        let mut claims = test_claims();
        claims.email = None;
        claims.email_verified = None;

        let user = AuthenticatedUser::from(claims);

        assert_eq!(user.email, "");
        assert!(!user.email_verified);
    }
}
