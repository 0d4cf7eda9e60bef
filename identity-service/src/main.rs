//! # Identity Service
//!
//! The **identity-service** is the centralized OAuth 2.0 / OpenID-Connect-style
//! identity provider: it owns user accounts, issues all tokens, and is the sole
//! party that ever sees a password.
//!
//! ## Architecture Overview
//!
//! This service follows **Clean Architecture** principles with clear separation
//! between layers:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        HTTP Layer (api/)                        │
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────────────────┐ │
//! │  │   routes    │  │  handlers   │  │    DTOs (Request/Res)   │ │
//! │  └──────┬──────┘  └──────┬──────┘  └────────────┬────────────┘ │
//! └─────────┼────────────────┼─────────────────────┼───────────────┘
//!           │                │                      │
//!           ▼                ▼                      ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Service Layer (service/)                     │
//! │  ┌──────────────────────────┐  ┌──────────────────────────────┐ │
//! │  │  AuthService: register,  │  │ OAuthService: authorize,      │ │
//! │  │  login, refresh, revoke  │  │ token (authorization-code)    │ │
//! │  └─────────────┬────────────┘  └───────────────┬───────────────┘ │
//! └────────────────┼────────────────────────────────┼─────────────────┘
//!                  │                                │
//!                  ▼                                ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                  Repository Layer (repository/)                 │
//! │   UserRepository · RefreshTokenRepository ·                     │
//! │   AuthCodeRepository · ClientRepository                         │
//! └─────────────────────────────┬───────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Domain Layer (domain/)                       │
//! │   User · UserProfile · RefreshRecord · AuthCode · Client         │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## API Endpoints
//!
//! Direct auth, prefixed `/api/v1/auth`:
//!
//! | Method | Endpoint    | Description                 | Auth Required |
//! |--------|-------------|------------------------------|---------------|
//! | POST   | `/register` | Create new user account      | No            |
//! | POST   | `/login`    | Authenticate user             | No            |
//! | POST   | `/refresh`  | Reissue access token           | No*           |
//! | POST   | `/logout`   | Revoke current refresh token   | Yes           |
//! | POST   | `/logout-all` | Revoke all refresh tokens   | Yes           |
//! | GET    | `/me`       | Get authenticated profile     | Yes           |
//!
//! *Requires a valid refresh token, via cookie or request body.
//!
//! OAuth 2.0 authorization-code grant, prefixed `/api/v1/oauth`:
//!
//! | Method | Endpoint      | Description                              |
//! |--------|---------------|-------------------------------------------|
//! | GET    | `/authorize`  | Start the authorization-code grant        |
//! | POST   | `/token`      | Exchange a code for access/refresh/ID tokens |
//!
//! ## Health Check
//!
//! | Method | Endpoint  | Description                                   |
//! |--------|-----------|------------------------------------------------|
//! | GET    | `/health` | Database connectivity; 503 if unreachable      |
//!
//! ## Security Features
//!
//! - **Password Hashing**: Argon2id with configurable cost parameters
//! - **Constant-Time Authentication**: verification always runs against a
//!   real or dummy hash, so an unknown identifier and a wrong password are
//!   indistinguishable in timing
//! - **JWT Tokens**: short-lived access/ID tokens, longer-lived non-rotating
//!   refresh tokens, stored at rest as a SHA-256 digest rather than in full
//! - **One-Time Authorization Codes**: atomic `UPDATE ... WHERE used = false`
//!   guarantees a code is exchanged at most once
//!
//! ## Configuration
//!
//! Environment variables are loaded via [`shared::config::AppConfig`].

use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use shared::{
    auth::{jwt::JwtService, password::PasswordHasher},
    config::AppConfig,
    database, redis_client::RedisClient,
    tracing_config,
};
use std::sync::Arc;
use tracing::info;

mod api;
mod domain;
mod repository;
mod service;

use api::routes;
use repository::{AuthCodeRepository, ClientRepository, RefreshTokenRepository, UserRepository};
use service::{AuthService, OAuthService};

/// Shared application state injected into all request handlers.
pub struct AppState {
    /// Business logic for direct registration, login, refresh, and revocation.
    pub auth_service: AuthService,
    /// Business logic for the OAuth 2.0 authorization-code grant.
    pub oauth_service: OAuthService,
    /// JWT service, shared so handlers can validate the `sso_session` cookie
    /// without going through `AuthService`.
    pub jwt_service: Arc<JwtService>,
    /// Optional - present only so `/health` can report Redis reachability.
    pub redis_client: Option<RedisClient>,
    pub config: AppConfig,
}

/// Application entry point and server initialization.
///
/// # Initialization Sequence
///
/// 1. Load configuration from environment variables
/// 2. Initialize structured logging/tracing
/// 3. Create PostgreSQL connection pool
/// 4. Attempt a Redis connection (ambient only - failure does not stop startup)
/// 5. Instantiate services with dependencies
/// 6. Configure and start HTTP server
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let config = AppConfig::from_env().expect("Failed to load configuration");

    tracing_config::init_tracing(&config.service_name, config.is_production());

    info!(
        service = %config.service_name,
        host = %config.server.host,
        port = %config.server.port,
        "Starting identity-service"
    );

    let db_pool = database::create_pool(&config.database)
        .await
        .expect("Failed to create database pool");

    // Redis carries no business logic here - session state lives entirely in
    // `refresh_tokens` rows and stateless JWTs. It is kept only so `/health`
    // can surface its reachability; a failed connection is logged, not fatal.
    let redis_client = match RedisClient::new(&config.redis).await {
        Ok(client) => Some(client),
        Err(error) => {
            tracing::warn!(%error, "Redis unavailable at startup; continuing without it");
            None
        }
    };

    let jwt_service = Arc::new(JwtService::new(config.jwt.clone()));
    let password_hasher = Arc::new(PasswordHasher::with_config(&config.password));

    let user_repository = UserRepository::new(db_pool.clone());
    let refresh_token_repository = RefreshTokenRepository::new(db_pool.clone());
    let auth_code_repository = AuthCodeRepository::new(db_pool.clone());
    let client_repository = ClientRepository::new(db_pool.clone());

    let auth_service = AuthService::new(
        user_repository.clone(),
        refresh_token_repository.clone(),
        jwt_service.clone(),
        password_hasher.clone(),
        config.jwt.clone(),
        config.password.clone(),
    );

    let oauth_service = OAuthService::new(
        client_repository,
        auth_code_repository,
        refresh_token_repository,
        user_repository,
        jwt_service.clone(),
        password_hasher,
        config.jwt.clone(),
    );

    let app_state = web::Data::new(AppState {
        auth_service,
        oauth_service,
        jwt_service,
        redis_client,
        config: config.clone(),
    });

    let db_pool = web::Data::new(db_pool);

    let server_host = config.server.host.clone();
    let server_port = config.server.port;

    info!("Server listening on {}:{}", server_host, server_port);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin() // TODO: restrict to registered client redirect origins
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .wrap(tracing_actix_web::TracingLogger::default())
            .app_data(app_state.clone())
            .app_data(db_pool.clone())
            .configure(routes::configure)
    })
    .bind((server_host, server_port))?
    .run()
    .await
}
