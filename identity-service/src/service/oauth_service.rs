//! # OAuth Service
//!
//! Implements the authorization-code grant state machine backing
//! `GET /oauth/authorize` and `POST /oauth/token`.
//!
//! Each `AuthCode` moves `Fresh -> Used` (terminal) or `Fresh -> Expired`
//! (implicit, derived from `expires_at` rather than stored). The `Fresh ->
//! Used` transition is atomic and exclusive - [`AuthCodeRepository::mark_used`]
//! performs a conditional `UPDATE ... WHERE used = false`, so at most one
//! concurrent `/oauth/token` call per code can produce tokens.

use chrono::{Duration as ChronoDuration, Utc};
use shared::{
    auth::{
        code::{hash_token, AuthorizationCode},
        jwt::{JwtService, OAuthTokens, TokenSubject},
        password::PasswordHasher,
    },
    config::JwtConfig,
    errors::ApiError,
};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::{Client, NewAuthCode, NewRefreshRecord, User};
use crate::repository::{AuthCodeRepository, ClientRepository, RefreshTokenRepository, UserRepository};

/// Outcome of a successful `/authorize` call: where to send the user-agent next.
#[derive(Debug, Clone)]
pub enum AuthorizeOutcome {
    /// No valid session - redirect to the login page, preserving the original
    /// `client_id`/`redirect_uri`/`state` so login can resume the flow.
    RedirectToLogin,
    /// A code was minted - redirect to `redirect_uri` with `code` (and `state`).
    RedirectWithCode { redirect_uri: String, code: String, state: Option<String> },
}

#[derive(Clone)]
pub struct OAuthService {
    clients: ClientRepository,
    auth_codes: AuthCodeRepository,
    refresh_tokens: RefreshTokenRepository,
    users: UserRepository,
    jwt_service: Arc<JwtService>,
    password_hasher: Arc<PasswordHasher>,
    jwt_config: JwtConfig,
}

impl OAuthService {
    pub fn new(
        clients: ClientRepository,
        auth_codes: AuthCodeRepository,
        refresh_tokens: RefreshTokenRepository,
        users: UserRepository,
        jwt_service: Arc<JwtService>,
        password_hasher: Arc<PasswordHasher>,
        jwt_config: JwtConfig,
    ) -> Self {
        Self {
            clients,
            auth_codes,
            refresh_tokens,
            users,
            jwt_service,
            password_hasher,
            jwt_config,
        }
    }

    /// Implements `/authorize` steps 1-6. The caller (the handler) is responsible
    /// for resolving `sso_session` into `Option<Uuid>` (user id) beforehand -
    /// step 4's three failure cases (absent cookie, bad signature, unverified
    /// email) all collapse to `session_user_id: None` here, since all three
    /// redirect to login identically.
    pub async fn authorize(
        &self,
        client_id: &str,
        redirect_uri: &str,
        response_type: &str,
        state: Option<String>,
        session_user_id: Option<Uuid>,
    ) -> Result<AuthorizeOutcome, ApiError> {
        if client_id.is_empty() || redirect_uri.is_empty() {
            return Err(ApiError::BadRequest {
                message: "client_id and redirect_uri are required".to_string(),
            });
        }
        if response_type != "code" {
            return Err(ApiError::BadRequest {
                message: "response_type must be \"code\"".to_string(),
            });
        }

        let client = self
            .clients
            .find_by_client_id(client_id)
            .await?
            .ok_or(ApiError::UnknownClient)?;

        if !client.allows_redirect(redirect_uri) {
            return Err(ApiError::BadRedirect);
        }

        let user_id = match session_user_id {
            Some(user_id) => user_id,
            None => return Ok(AuthorizeOutcome::RedirectToLogin),
        };

        let code = AuthorizationCode::generate();
        let expires_at = Utc::now() + ChronoDuration::seconds(self.jwt_config.code_ttl_seconds as i64);

        self.auth_codes
            .insert(NewAuthCode {
                code: code.to_string(),
                user_id,
                client_id: client_id.to_string(),
                redirect_uri: redirect_uri.to_string(),
                expires_at,
            })
            .await?;

        info!(client_id = %client_id, "authorization code issued");

        Ok(AuthorizeOutcome::RedirectWithCode {
            redirect_uri: redirect_uri.to_string(),
            code: code.to_string(),
            state,
        })
    }

    /// Implements `/token` steps 1-11. Each failure is terminal; the validation
    /// order matches the spec exactly so error causes are never conflated.
    pub async fn token(
        &self,
        grant_type: &str,
        code: &str,
        client_id: &str,
        client_secret: &str,
        redirect_uri: &str,
    ) -> Result<OAuthTokens, ApiError> {
        if grant_type != "authorization_code"
            || code.is_empty()
            || client_id.is_empty()
            || client_secret.is_empty()
            || redirect_uri.is_empty()
        {
            return Err(ApiError::BadRequest {
                message: "grant_type must be \"authorization_code\" and all parameters are required"
                    .to_string(),
            });
        }

        let client = self
            .clients
            .find_by_client_id(client_id)
            .await?
            .ok_or(ApiError::InvalidClient)?;

        self.verify_client_secret(&client, client_secret)?;

        let auth_code = self
            .auth_codes
            .find_by_code(code)
            .await?
            .filter(|c| c.client_id == client_id)
            .ok_or(ApiError::InvalidGrant { reason: "unknown_code" })?;

        if auth_code.used {
            return Err(ApiError::InvalidGrant { reason: "already_used" });
        }
        if Utc::now() > auth_code.expires_at {
            return Err(ApiError::InvalidGrant { reason: "expired" });
        }
        if auth_code.redirect_uri != redirect_uri {
            return Err(ApiError::InvalidGrant { reason: "redirect_mismatch" });
        }

        let user = self
            .users
            .find_by_id(auth_code.user_id)
            .await?
            .ok_or(ApiError::InvalidGrant { reason: "user_gone" })?;

        let flipped = self.auth_codes.mark_used(code).await?;
        if !flipped {
            warn!(client_id = %client_id, "authorization code exchange lost the race");
            return Err(ApiError::InvalidGrant { reason: "already_used" });
        }

        self.issue_tokens(&user).await
    }

    fn verify_client_secret(&self, client: &Client, client_secret: &str) -> Result<(), ApiError> {
        let valid = self
            .password_hasher
            .verify(client_secret, &client.client_secret_hash)?;
        if !valid {
            return Err(ApiError::InvalidClient);
        }
        Ok(())
    }

    async fn issue_tokens(&self, user: &User) -> Result<OAuthTokens, ApiError> {
        let subject = TokenSubject {
            user_id: user.user_id,
            email: user.email.clone(),
            name: user.display_name.clone(),
            email_verified: user.email_verified,
        };

        let token_id = Uuid::new_v4();
        let access_token = self.jwt_service.generate_access_token(&subject)?;
        let id_token = self.jwt_service.generate_id_token(&subject)?;
        let refresh_token = self
            .jwt_service
            .generate_refresh_token(user.user_id, token_id)?;

        let expires_at =
            Utc::now() + ChronoDuration::seconds(self.jwt_config.refresh_ttl_seconds as i64);

        self.refresh_tokens
            .insert(NewRefreshRecord {
                user_id: user.user_id,
                token_hash: hash_token(&refresh_token),
                expires_at,
            })
            .await?;

        Ok(OAuthTokens {
            access_token,
            refresh_token,
            id_token,
            expires_in: self.jwt_config.access_ttl_seconds as i64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorize_outcome_variants_are_distinguishable() {
        let redirect = AuthorizeOutcome::RedirectWithCode {
            redirect_uri: "https://a.test/cb".to_string(),
            code: "abc".to_string(),
            state: Some("xyz".to_string()),
        };
        match redirect {
            AuthorizeOutcome::RedirectWithCode { code, .. } => assert_eq!(code, "abc"),
            AuthorizeOutcome::RedirectToLogin => panic!("wrong variant"),
        }
    }
}
