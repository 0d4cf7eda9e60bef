//! # Request Handlers
//!
//! Each handler extracts and validates input, calls exactly one service
//! method, and maps the result onto an HTTP response. Business logic lives in
//! `service/`, not here.

use actix_web::{web, HttpRequest, HttpResponse};
use shared::{auth::middleware::AuthenticatedUser, database, errors::ApiError};
use tracing::warn;
use validator::Validate;

use crate::api::cookies;
use crate::api::dto::{
    AuthorizeQuery, HealthResponse, LoginRequest, LogoutRequest, MessageResponse,
    OAuthTokenResponseDto, RefreshTokenRequest, RegisterRequest, SessionResponseDto,
    TokenRequest, TokenResponseDto, UserProfileDto,
};
use crate::service::AuthorizeOutcome;
use crate::AppState;

// =============================================================================
// HEALTH CHECK
// =============================================================================

/// `GET /health`. Reports database connectivity; Redis is best-effort and
/// does not affect the status code, since nothing in the request path
/// depends on it.
pub async fn health_check(
    db_pool: web::Data<sqlx::PgPool>,
    state: web::Data<AppState>,
) -> HttpResponse {
    let database_ok = database::health_check(&db_pool).await.is_ok();

    if let Some(redis) = &state.redis_client {
        if let Err(error) = redis.ping().await {
            warn!(%error, "redis ping failed during health check");
        }
    }

    let body = HealthResponse {
        status: if database_ok { "ok" } else { "degraded" }.to_string(),
        service: state.config.service_name.clone(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    };

    if database_ok {
        HttpResponse::Ok().json(body)
    } else {
        HttpResponse::ServiceUnavailable().json(body)
    }
}

// =============================================================================
// DIRECT AUTH
// =============================================================================

/// `POST /api/v1/auth/register`.
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterRequest>,
) -> Result<HttpResponse, ApiError> {
    body.validate().map_err(ApiError::ValidationError)?;

    let profile = state
        .auth_service
        .register(
            &body.email,
            body.username.as_deref(),
            &body.password,
            body.display_name.as_deref(),
        )
        .await?;

    Ok(HttpResponse::Created().json(UserProfileDto::from(profile)))
}

/// `POST /api/v1/auth/login`.
///
/// Two named operations share this handler:
///
/// - `loginDirect` - no `client_id`/`redirect_uri` in the body: tokens are
///   returned directly in a [`SessionResponseDto`].
/// - `loginAndStartOAuth` - both `client_id` and `redirect_uri` present:
///   session cookies are still set (so the resumed `/oauth/authorize` call
///   sees `sso_session`), but the response is a 302 to
///   `/api/v1/oauth/authorize` with `client_id`, `redirect_uri`,
///   `response_type=code`, and `state` (if present) instead of a token body.
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    body.validate().map_err(ApiError::ValidationError)?;

    let user = state
        .auth_service
        .authenticate(&body.identifier, &body.password)
        .await?;

    let tokens = state.auth_service.issue_session(&user).await?;

    let mut response = if let (Some(client_id), Some(redirect_uri)) =
        (&body.client_id, &body.redirect_uri)
    {
        let mut location = format!(
            "/api/v1/oauth/authorize?client_id={}&redirect_uri={}&response_type=code",
            urlencoding_encode(client_id),
            urlencoding_encode(redirect_uri),
        );
        if let Some(state_param) = &body.state {
            location.push_str(&format!("&state={}", urlencoding_encode(state_param)));
        }
        let mut response = HttpResponse::Found();
        response.append_header(("Location", location));
        response
    } else {
        HttpResponse::Ok()
    };

    for cookie in
        cookies::session_cookies(&state.config, &tokens.access_token, &tokens.refresh_token)
    {
        response.cookie(cookie);
    }

    if body.client_id.is_some() && body.redirect_uri.is_some() {
        return Ok(response.finish());
    }

    Ok(response.json(SessionResponseDto {
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
        token_type: "Bearer".to_string(),
        expires_in: tokens.expires_in,
        user: crate::domain::UserProfile::from(user).into(),
    }))
}

/// `POST /api/v1/auth/refresh`. Reads the refresh token from the
/// `refresh_token` cookie, falling back to the request body.
pub async fn refresh_token(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: Option<web::Json<RefreshTokenRequest>>,
) -> Result<HttpResponse, ApiError> {
    let raw_refresh = resolve_refresh_token(&req, body)?;

    let access_token = state.auth_service.refresh(&raw_refresh).await?;

    let mut response = HttpResponse::Ok();
    response.cookie(cookies::access_token_cookie(&state.config, &access_token));

    Ok(response.json(TokenResponseDto {
        access_token,
        token_type: "Bearer".to_string(),
        expires_in: state.config.jwt.access_ttl_seconds as i64,
    }))
}

/// `POST /api/v1/auth/logout`. Revokes the presented refresh token and clears
/// all session cookies. A refresh token that is already gone or revoked is
/// not an error - logout is idempotent.
pub async fn logout(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: Option<web::Json<LogoutRequest>>,
    _user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let raw_refresh = resolve_refresh_token(&req, body)?;

    state.auth_service.revoke(&raw_refresh).await?;

    let mut response = HttpResponse::Ok();
    for cookie in cookies::clearing_cookies(&state.config.oauth, state.config.is_production()) {
        response.cookie(cookie);
    }

    Ok(response.json(MessageResponse::new("Logged out")))
}

/// `POST /api/v1/auth/logout-all`. Revokes every refresh token for the
/// authenticated user.
pub async fn logout_all(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    state.auth_service.revoke_all(user.user_id).await?;

    let mut response = HttpResponse::Ok();
    for cookie in cookies::clearing_cookies(&state.config.oauth, state.config.is_production()) {
        response.cookie(cookie);
    }

    Ok(response.json(MessageResponse::new("All sessions revoked")))
}

/// `GET /api/v1/auth/me`. 403s when `email_verification_required` is set and
/// the authenticated user hasn't verified their email yet, mirroring the gate
/// `authorize` applies to the `sso_session` cookie.
pub async fn get_profile(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    if state.config.oauth.email_verification_required && !user.email_verified {
        return Err(ApiError::AccessDenied);
    }

    let profile = state.auth_service.get_profile(user.user_id).await?;
    Ok(HttpResponse::Ok().json(UserProfileDto::from(profile)))
}

// =============================================================================
// OAUTH 2.0 AUTHORIZATION-CODE GRANT
// =============================================================================

/// `GET /api/v1/oauth/authorize`.
///
/// Resolves the `sso_session` cookie into an `Option<Uuid>` before delegating
/// to [`crate::service::OAuthService::authorize`]. All three failure shapes -
/// an absent cookie, a bad signature, and (per configuration) an unverified
/// email - collapse to `None` here, since every one of them redirects to
/// login identically.
pub async fn authorize(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<AuthorizeQuery>,
) -> Result<HttpResponse, ApiError> {
    let session_user_id = req
        .cookie("sso_session")
        .and_then(|cookie| state.jwt_service.validate_access_token(cookie.value()).ok())
        .filter(|claims| {
            !state.config.oauth.email_verification_required
                || claims.email_verified.unwrap_or(false)
        })
        .map(|claims| claims.sub);

    let outcome = state
        .oauth_service
        .authorize(
            &query.client_id,
            &query.redirect_uri,
            &query.response_type,
            query.state.clone(),
            session_user_id,
        )
        .await?;

    match outcome {
        AuthorizeOutcome::RedirectToLogin => {
            let mut location = format!(
                "{}?client_id={}&redirect_uri={}",
                state.config.oauth.login_page_path,
                urlencoding_encode(&query.client_id),
                urlencoding_encode(&query.redirect_uri),
            );
            if let Some(state_param) = &query.state {
                location.push_str(&format!("&state={}", urlencoding_encode(state_param)));
            }
            Ok(HttpResponse::Found()
                .append_header(("Location", location))
                .finish())
        }
        AuthorizeOutcome::RedirectWithCode {
            redirect_uri,
            code,
            state: state_param,
        } => {
            let mut location = format!("{}?code={}", redirect_uri, urlencoding_encode(&code));
            if let Some(state_param) = state_param {
                location.push_str(&format!("&state={}", urlencoding_encode(&state_param)));
            }
            Ok(HttpResponse::Found()
                .append_header(("Location", location))
                .finish())
        }
    }
}

/// `POST /api/v1/oauth/token`. Accepts the standard
/// `application/x-www-form-urlencoded` body the authorization-code grant
/// specifies.
pub async fn token(
    state: web::Data<AppState>,
    form: web::Form<TokenRequest>,
) -> Result<HttpResponse, ApiError> {
    let tokens = state
        .oauth_service
        .token(
            &form.grant_type,
            &form.code,
            &form.client_id,
            &form.client_secret,
            &form.redirect_uri,
        )
        .await?;

    Ok(HttpResponse::Ok().json(OAuthTokenResponseDto::from(tokens)))
}

// =============================================================================
// HELPERS
// =============================================================================

/// Cookie-first, falling back to the JSON body - mirrors the precedence
/// `shared::auth::middleware` applies to access tokens.
fn resolve_refresh_token(
    req: &HttpRequest,
    body: Option<web::Json<RefreshTokenRequest>>,
) -> Result<String, ApiError> {
    if let Some(cookie) = req.cookie("refresh_token") {
        return Ok(cookie.value().to_string());
    }
    body.map(|json| json.into_inner().refresh_token)
        .ok_or(ApiError::MissingAuth)
}

/// Minimal percent-encoding for query values placed into a `Location` header.
/// Redirect targets here are either already-whitelisted URLs or short opaque
/// codes/ids, so a conservative reserved-character set is sufficient.
fn urlencoding_encode(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urlencoding_encode_preserves_unreserved_chars() {
        assert_eq!(urlencoding_encode("abc123-_.~"), "abc123-_.~");
    }

    #[test]
    fn test_urlencoding_encode_escapes_special_chars() {
        assert_eq!(urlencoding_encode("a b&c"), "a%20b%26c");
    }
}
