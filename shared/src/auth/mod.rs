//! # Authentication Module
//!
//! Credential verification and token issuance for the identity provider.
//!
//! ## Module Structure
//!
//! ```text
//! auth/
//! ├── jwt.rs        - JWT token generation and validation
//! ├── password.rs   - Secure password hashing with Argon2id
//! ├── code.rs       - Authorization-code generation and at-rest hashing
//! └── middleware.rs - Actix-web authentication middleware
//! ```
//!
//! ## Overview
//!
//! | Component | Purpose | See Also |
//! |-----------|---------|----------|
//! | [`JwtService`] | Generate and validate JWT tokens | [RFC 7519](https://tools.ietf.org/html/rfc7519) |
//! | [`PasswordHasher`] | Argon2id password hashing | [OWASP Password Storage](https://cheatsheetseries.owasp.org/cheatsheets/Password_Storage_Cheat_Sheet.html) |
//! | [`AuthMiddleware`] | Request authentication | Actix-web middleware docs |
//! | [`AuthenticatedUser`] | Extractor for authenticated user | Actix-web extractors |
//!
//! ## Security Implementation
//!
//! - **Short-lived access/ID tokens** (1 day default), **long-lived refresh
//!   tokens** (30 days default, not rotated on use) signed with independent secrets
//! - **Argon2id password hashing** (OWASP recommended parameters)
//! - **One-time authorization codes**, hashed-at-rest refresh tokens
//!
//! ## Token Flow
//!
//! ```text
//! ┌────────┐        ┌────────────┐        ┌────────────┐
//! │ Client │        │ Auth API   │        │ Protected  │
//! └───┬────┘        └─────┬──────┘        │    API     │
//!     │                   │               └─────┬──────┘
//!     │ POST /login       │                     │
//!     │ (email, password) │                     │
//!     │──────────────────>│                     │
//!     │                   │                     │
//!     │ {access_token,    │                     │
//!     │  refresh_token}   │                     │
//!     │<──────────────────│                     │
//!     │                   │                     │
//!     │ GET /resource     │                     │
//!     │ Authorization:    │                     │
//!     │ Bearer <access>   │                     │
//!     │────────────────────────────────────────>│
//!     │                   │                     │
//!     │ 200 OK {data}     │                     │
//!     │<────────────────────────────────────────│
//!     │                   │                     │
//!     │ (after 15 min)    │                     │
//!     │ POST /refresh     │                     │
//!     │ (refresh_token)   │                     │
//!     │──────────────────>│                     │
//!     │                   │                     │
//!     │ {new access_token,│                     │
//!     │  new refresh}     │                     │
//!     │<──────────────────│                     │
//! ```
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use shared::auth::{JwtService, PasswordHasher, AuthenticatedUser, TokenSubject};
//! use shared::config::AppConfig;
//!
//! // In your service initialization
//! let config = AppConfig::from_env()?;
//! let jwt_service = Arc::new(JwtService::new(config.jwt.clone()));
//! let password_hasher = PasswordHasher::with_config(&config.password);
//!
//! // Login handler
//! async fn login(credentials: Credentials) -> ApiResult<SessionTokens> {
//!     let user = user_repo.find_by_email(&credentials.email).await?;
//!
//!     if password_hasher.verify(&credentials.password, &user.password_hash)? {
//!         let subject = TokenSubject::from(&user);
//!         let access = jwt_service.generate_access_token(&subject)?;
//!         // ...issue refresh token, persist its hash, return SessionTokens
//!         todo!()
//!     } else {
//!         Err(ApiError::InvalidCredentials)
//!     }
//! }
//!
//! // Protected handler (user extracted from JWT)
//! async fn get_profile(user: AuthenticatedUser) -> ApiResult<Profile> {
//!     profile_repo.find_by_user_id(user.user_id).await
//! }
//! ```

pub mod code;
pub mod jwt;
pub mod middleware;
pub mod password;

// Re-export main types for convenient access
pub use code::AuthorizationCode;
pub use jwt::{Claims, JwtService, OAuthTokens, SessionTokens, TokenSubject, TokenType};
pub use middleware::{AuthMiddleware, AuthenticatedUser};
pub use password::{PasswordHasher, PasswordValidator};
