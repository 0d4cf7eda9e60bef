//! # Cookie & Session Adapter
//!
//! Builds and clears the three cookies the identity provider hands to the
//! browser. None of these are read by relying parties directly - RPs only
//! observe their effect through the `/oauth/authorize` round-trip.
//!
//! | Cookie          | Domain                      | Written                         | Read            |
//! |------------------|------------------------------|----------------------------------|------------------|
//! | `sso_session`    | parent domain (`cookie_domain`) | login, every `/token` to hosted UI | `/oauth/authorize` only |
//! | `access_token`   | IdP host only                | login, `/auth/refresh`           | any authenticated endpoint (checked before the `Authorization` header) |
//! | `refresh_token`  | IdP host only                | login                             | `/auth/refresh`, `/auth/logout` |

use actix_web::cookie::{Cookie, SameSite};
use shared::config::{AppConfig, OAuthConfig};

const SSO_SESSION: &str = "sso_session";
const ACCESS_TOKEN: &str = "access_token";
const REFRESH_TOKEN: &str = "refresh_token";

fn base_cookie<'c>(name: &'c str, value: String, production: bool) -> Cookie<'c> {
    Cookie::build(name, value)
        .http_only(true)
        .secure(production)
        .same_site(SameSite::Lax)
        .path("/")
        .finish()
}

/// Builds the three login-time cookies.
pub fn session_cookies<'c>(
    config: &AppConfig,
    access_token: &str,
    refresh_token: &str,
) -> Vec<Cookie<'c>> {
    let production = config.is_production();

    let mut sso = base_cookie(SSO_SESSION, access_token.to_string(), production);
    sso.set_domain(config.oauth.cookie_domain.clone());

    let access = base_cookie(ACCESS_TOKEN, access_token.to_string(), production);
    let refresh = base_cookie(REFRESH_TOKEN, refresh_token.to_string(), production);

    vec![sso, access, refresh]
}

/// Builds just the refreshed `access_token` cookie for `/auth/refresh`.
pub fn access_token_cookie<'c>(config: &AppConfig, access_token: &str) -> Cookie<'c> {
    base_cookie(ACCESS_TOKEN, access_token.to_string(), config.is_production())
}

/// Builds expired versions of all three cookies, clearing them on logout.
pub fn clearing_cookies<'c>(oauth: &OAuthConfig, production: bool) -> Vec<Cookie<'c>> {
    let mut sso = Cookie::build(SSO_SESSION, "")
        .http_only(true)
        .secure(production)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(actix_web::cookie::time::Duration::ZERO)
        .finish();
    sso.set_domain(oauth.cookie_domain.clone());

    let access = Cookie::build(ACCESS_TOKEN, "")
        .http_only(true)
        .secure(production)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(actix_web::cookie::time::Duration::ZERO)
        .finish();

    let refresh = Cookie::build(REFRESH_TOKEN, "")
        .http_only(true)
        .secure(production)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(actix_web::cookie::time::Duration::ZERO)
        .finish();

    vec![sso, access, refresh]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_token_cookie_is_http_only() {
        let config = AppConfig {
            oauth: OAuthConfig {
                cookie_domain: "example.test".to_string(),
                email_verification_required: false,
                login_page_path: "/login".to_string(),
            },
            ..test_app_config()
        };

        let cookie = access_token_cookie(&config, "tok");
        assert!(cookie.http_only().unwrap_or(false));
        assert_eq!(cookie.name(), "access_token");
    }

    fn test_app_config() -> AppConfig {
        use shared::config::{AppEnvironment, DatabaseConfig, JwtConfig, PasswordConfig, RedisConfig, ServerConfig};

        AppConfig {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
                workers: 0,
            },
            database: DatabaseConfig {
                url: "postgres://localhost/test".to_string(),
                max_connections: 5,
                min_connections: 1,
                connect_timeout_seconds: 5,
                max_lifetime_seconds: 1800,
            },
            redis: RedisConfig {
                url: "redis://localhost".to_string(),
                pool_size: 5,
            },
            jwt: JwtConfig {
                access_token_secret: "test_access_secret_minimum_32_characters".to_string(),
                refresh_token_secret: "test_refresh_secret_minimum_32_characters_diff".to_string(),
                access_ttl_seconds: 86400,
                refresh_ttl_seconds: 2_592_000,
                code_ttl_seconds: 600,
                issuer: "test-issuer".to_string(),
                audience: "test-audience".to_string(),
            },
            oauth: OAuthConfig {
                cookie_domain: "example.test".to_string(),
                email_verification_required: false,
                login_page_path: "/login".to_string(),
            },
            password: PasswordConfig {
                memory_cost_kib: 19_456,
                time_cost: 2,
                parallelism: 1,
                min_length: 8,
            },
            service_name: "identity-service".to_string(),
            environment: AppEnvironment::Development,
        }
    }
}
