//! # Domain Layer
//!
//! Core business entities for the identity provider. Framework-agnostic -
//! no actix-web or sqlx query code lives here, only the shapes and the
//! invariants that can be checked without a database round-trip.
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────────┐
//! │                         Domain Layer                              │
//! │  - User: core authentication record (includes password_hash)     │
//! │  - UserProfile: public view, safe for API responses              │
//! │  - RefreshRecord: one row per issued refresh token                │
//! │  - AuthCode: single-use OAuth authorization code                  │
//! │  - Client: registered relying party, redirect URI whitelist       │
//! └───────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Structure
//!
//! | Module     | Purpose                                           |
//! |------------|---------------------------------------------------|
//! | `entities` | Core domain entities mapped to database tables    |
//!
//! ## Design Decisions
//!
//! 1. **Entities vs DTOs**: domain entities contain all database fields,
//!    while separate DTOs in the API layer handle request/response transformation.
//!
//! 2. **`FromRow` Derive**: entities use sqlx's `FromRow` for automatic
//!    mapping from database rows, reducing boilerplate.

pub mod entities;

pub use entities::*;
