//! # Authorization Codes and At-Rest Token Hashing
//!
//! Two small primitives shared by the OAuth and session layers:
//!
//! - [`AuthorizationCode::generate`] - a one-time code handed to the user-agent during
//!   the `/authorize` redirect and exchanged exactly once at `/oauth/token`.
//! - [`hash_token`] - the SHA-256 digest stored in place of a refresh token's plaintext,
//!   so a stolen database row is not a stolen credential.
//!
//! Authorization codes are short-lived (minutes) and are not hashed at rest - they carry
//! no long-term value once `code_ttl_seconds` elapses, unlike refresh tokens which live
//! for weeks.

use rand::RngCore;
use sha2::{Digest, Sha256};

/// A single-use authorization code.
///
/// Wraps a URL-safe, unpadded base64 string generated from 32 bytes of CSPRNG output -
/// 256 bits of entropy, well beyond what an attacker could feasibly guess or enumerate
/// within the code's lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationCode(String);

impl AuthorizationCode {
    /// Generates a new random authorization code.
    pub fn generate() -> Self {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(base64::Engine::encode(
            &base64::engine::general_purpose::URL_SAFE_NO_PAD,
            bytes,
        ))
    }

    /// Returns the code as it should be transmitted in the `/authorize` redirect and
    /// compared against on `/oauth/token`.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AuthorizationCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for AuthorizationCode {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Hashes a bearer token (refresh token, or any other secret handed to a client) for
/// at-rest storage. Hex-encoded SHA-256; lookups hash the presented token and compare
/// digests, so the plaintext is never written to the database.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_codes_are_unique() {
        let a = AuthorizationCode::generate();
        let b = AuthorizationCode::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn generated_codes_are_url_safe() {
        let code = AuthorizationCode::generate();
        assert!(code
            .as_str()
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn hash_token_is_deterministic() {
        assert_eq!(hash_token("refresh-abc"), hash_token("refresh-abc"));
        assert_ne!(hash_token("refresh-abc"), hash_token("refresh-xyz"));
    }

    #[test]
    fn hash_token_never_returns_the_input() {
        let token = "super-secret-refresh-token";
        assert_ne!(hash_token(token), token);
        assert_eq!(hash_token(token).len(), 64); // hex-encoded SHA-256
    }
}
