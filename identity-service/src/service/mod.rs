//! # Service Layer
//!
//! Business logic for the identity provider, orchestrating between the
//! repository layer (data access) and the API layer (HTTP handling).
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                            API Layer                                    │
//! └───────────────────────────────┬─────────────────────────────────────────┘
//! ┌───────────────────────────────▼─────────────────────────────────────────┐
//! │   AuthService                │   OAuthService                          │
//! │   - register                 │   - authorize (code grant, steps 1-6)   │
//! │   - authenticate             │   - token (code exchange, steps 1-11)   │
//! │   - issue_session            │                                         │
//! │   - refresh / revoke         │                                         │
//! └───────────────────────────────┬─────────────────────────────────────────┘
//! ┌───────────────────────────────▼─────────────────────────────────────────┐
//! │              Repository Layer          │    External Services          │
//! │            (Data persistence)          │  (JWT, Password Hashing)      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod auth_service;
pub mod oauth_service;

pub use auth_service::AuthService;
pub use oauth_service::{AuthorizeOutcome, OAuthService};
