//! # Repository Layer
//!
//! Data access for the identity provider, one repository struct per aggregate.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Service Layer                                  │
//! └───────────────────────────────┬─────────────────────────────────────────┘
//!                                 │
//!                                 ▼
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  UserRepository │ RefreshTokenRepository │ AuthCodeRepository │ ClientRepository │
//! └───────────────────────────────────┬─────────────────────────────────────┘
//!                                     │ sqlx queries
//!                                     ▼
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │   users │ refresh_tokens │ auth_codes │ clients                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Decisions
//!
//! 1. **Concrete structs, not traits**: each repository is a plain struct holding
//!    a `PgPool` clone. No trait indirection until something actually needs a
//!    second implementation (e.g. a mock for service-layer unit tests).
//!
//! 2. **One repository per aggregate**: unlike a single do-everything repository,
//!    each struct owns exactly the queries for its table, so a service that only
//!    needs `Clients` doesn't carry a dependency on `refresh_tokens`.
//!
//! 3. **Error Handling**: database errors are mapped to [`shared::errors::ApiError`]
//!    for consistent HTTP responses; constraint violations are inspected via
//!    `db_err.constraint()` rather than string-matching the error message.

pub mod auth_code_repository;
pub mod client_repository;
pub mod refresh_token_repository;
pub mod user_repository;

pub use auth_code_repository::AuthCodeRepository;
pub use client_repository::ClientRepository;
pub use refresh_token_repository::RefreshTokenRepository;
pub use user_repository::UserRepository;
