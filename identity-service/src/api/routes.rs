//! # Route Configuration
//!
//! Defines URL patterns and maps them to handler functions.
//!
//! ## Route Structure
//!
//! ```text
//! /
//! ├── health                           GET  → health_check
//! │
//! ├── api/v1/auth/                     (wrapped: best-effort auth extraction)
//! │   ├── register                     POST → register
//! │   ├── login                        POST → login
//! │   ├── refresh                      POST → refresh_token
//! │   ├── logout                       POST → logout           (protected)
//! │   ├── logout-all                   POST → logout_all       (protected)
//! │   └── me                           GET  → get_profile      (protected)
//! │
//! └── api/v1/oauth/
//!     ├── authorize                    GET  → authorize
//!     └── token                        POST → token
//! ```
//!
//! ## Authentication
//!
//! The `/api/v1/auth` scope is wrapped with a `wrap_fn` that runs
//! [`shared::auth::middleware::AuthMiddleware::authenticate`] on every request,
//! inserting an [`shared::auth::middleware::AuthenticatedUser`] into request
//! extensions when a valid `access_token` cookie or `Authorization` header is
//! present. Failure here is not itself rejected - routes that require
//! authentication take `AuthenticatedUser` as a handler parameter, and the
//! extractor fails the request with `ApiError::MissingAuth` if the wrapper
//! didn't populate it. This keeps public routes in the same scope (`register`,
//! `login`, `refresh`) from paying for rejection on every anonymous call.
//!
//! ## Related Documentation
//!
//! - Handler implementations: [`super::handlers`]
//! - Auth middleware: [`shared::auth::middleware`]

use actix_web::dev::Service;
use actix_web::web;
use shared::auth::middleware::AuthMiddleware;

use super::handlers;
use crate::AppState;

/// Configures all routes for the identity service.
///
/// Called from `main.rs` during app initialization:
///
/// ```rust,ignore
/// App::new()
///     .configure(routes::configure)
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(handlers::health_check))
        .service(
            web::scope("/api/v1/auth")
                .wrap_fn(|req, srv| {
                    if let Some(state) = req.app_data::<web::Data<AppState>>() {
                        let middleware = AuthMiddleware::new(state.jwt_service.clone());
                        let _ = middleware.authenticate(&req);
                    }
                    srv.call(req)
                })
                .route("/register", web::post().to(handlers::register))
                .route("/login", web::post().to(handlers::login))
                .route("/refresh", web::post().to(handlers::refresh_token))
                .route("/me", web::get().to(handlers::get_profile))
                .route("/logout", web::post().to(handlers::logout))
                .route("/logout-all", web::post().to(handlers::logout_all)),
        )
        .service(
            web::scope("/api/v1/oauth")
                .route("/authorize", web::get().to(handlers::authorize))
                .route("/token", web::post().to(handlers::token)),
        );
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    #[test]
    fn test_route_configuration_compiles() {
        assert!(true);
    }
}
