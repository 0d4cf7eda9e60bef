//! # API Layer
//!
//! The API layer handles HTTP request/response processing. It bridges the
//! HTTP world with the service layer.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                            HTTP Request                                 │
//! └───────────────────────────────┬─────────────────────────────────────────┘
//!                                 │
//!                                 ▼
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Routes (routes.rs)                             │
//! │  Define URL patterns and HTTP methods, map to handlers                  │
//! └───────────────────────────────┬─────────────────────────────────────────┘
//!                                 │
//!                                 ▼
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Handlers (handlers.rs)                           │
//! │  1. Extract request data (JSON/form body, headers, cookies)             │
//! │  2. Validate input using DTOs                                           │
//! │  3. Call service layer                                                  │
//! │  4. Transform response / set cookies                                    │
//! └───────────────────────────────┬─────────────────────────────────────────┘
//!                                 │
//!                                 ▼
//! ┌──────────────────────────┐  ┌───────────────────────────────────────────┐
//! │          DTOs (dto.rs)   │  │        Cookies (cookies.rs)               │
//! │  Request/response shapes │  │  sso_session/access_token/refresh_token   │
//! └───────────────────────────┘  └───────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! | Module       | Responsibility                                           |
//! |--------------|-----------------------------------------------------------|
//! | `routes`     | Route definitions with actix-web's `configure()`          |
//! | `handlers`   | Request handlers (extractors → service → response)        |
//! | `dto`        | Data Transfer Objects for request/response                |
//! | `cookies`    | Session cookie construction/clearing                      |
//!
//! ## Endpoint Summary
//!
//! | Method | Path                          | Handler         | Auth |
//! |--------|-------------------------------|-----------------|------|
//! | POST   | `/api/v1/auth/register`       | `register`      | No   |
//! | POST   | `/api/v1/auth/login`          | `login`         | No   |
//! | POST   | `/api/v1/auth/refresh`        | `refresh_token` | No*  |
//! | POST   | `/api/v1/auth/logout`         | `logout`        | Yes  |
//! | POST   | `/api/v1/auth/logout-all`     | `logout_all`    | Yes  |
//! | GET    | `/api/v1/auth/me`             | `get_profile`   | Yes  |
//! | GET    | `/api/v1/oauth/authorize`     | `authorize`     | No** |
//! | POST   | `/api/v1/oauth/token`         | `token`         | No   |
//! | GET    | `/health`                     | `health_check`  | No   |
//!
//! \* requires a refresh token via cookie or body.
//! \*\* requires a valid `sso_session` cookie, or redirects to login.
//!
//! ## Related Documentation
//!
//! - Service layer: [`crate::service::AuthService`], [`crate::service::OAuthService`]
//! - Error responses: [`shared::errors::ApiError`]
//! - Authentication middleware: [`shared::auth::middleware`]

pub mod cookies;
pub mod dto;
pub mod handlers;
pub mod routes;
