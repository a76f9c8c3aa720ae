//! Anti-forgery tokens for the upload form
//!
//! A browser that loads the form gets a random session nonce in an
//! `HttpOnly` cookie and a signed token in a hidden form field:
//!
//! ```text
//! <nonce>.<issued unix seconds>.<hex HMAC-SHA256(secret, "<nonce>.<issued>")>
//! ```
//!
//! A submission is accepted only when the signature verifies, the nonce
//! matches the session cookie and the token is within the time limit. A
//! cross-site page can make the browser send the cookie but cannot read the
//! form to learn the token.

use std::time::Duration;

use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

/// Cookie carrying the session nonce
pub const SESSION_COOKIE: &str = "securefile_session";

/// Form field carrying the signed token
pub const TOKEN_FIELD: &str = "csrf_token";

/// Default token lifetime
pub const DEFAULT_TIME_LIMIT: Duration = Duration::from_secs(3600);

/// Reasons a submission's token was refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("CSRF token missing")]
    Missing,

    #[error("CSRF session token missing")]
    SessionMissing,

    #[error("CSRF token invalid")]
    Invalid,

    #[error("CSRF token expired")]
    Expired,

    #[error("CSRF tokens do not match")]
    Mismatch,

    #[error("Invalid CSRF signing key")]
    InvalidKey,
}

/// Issues and verifies signed anti-forgery tokens
#[derive(Clone)]
pub struct TokenSigner {
    mac: HmacSha256,
    time_limit: Duration,
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner")
            .field("time_limit", &self.time_limit)
            .finish_non_exhaustive()
    }
}

impl TokenSigner {
    /// Create a signer keyed with `secret`
    pub fn new(secret: impl AsRef<[u8]>, time_limit: Duration) -> Result<Self, TokenError> {
        let mac = HmacSha256::new_from_slice(secret.as_ref()).map_err(|_| TokenError::InvalidKey)?;
        Ok(Self { mac, time_limit })
    }

    /// Generate a fresh session nonce
    pub fn new_session() -> String {
        Uuid::new_v4().simple().to_string()
    }

    pub fn time_limit(&self) -> Duration {
        self.time_limit
    }

    /// Issue a token bound to `session`
    pub fn issue(&self, session: &str) -> String {
        self.issue_at(session, Utc::now().timestamp())
    }

    /// Verify a submitted token against the session cookie
    pub fn verify(&self, token: Option<&str>, session: Option<&str>) -> Result<(), TokenError> {
        self.verify_at(token, session, Utc::now().timestamp())
    }

    fn sign(&self, payload: &str) -> HmacSha256 {
        let mut mac = self.mac.clone();
        mac.update(payload.as_bytes());
        mac
    }

    fn issue_at(&self, session: &str, issued: i64) -> String {
        let payload = format!("{}.{}", session, issued);
        let signature = hex::encode(self.sign(&payload).finalize().into_bytes());
        format!("{}.{}", payload, signature)
    }

    fn verify_at(
        &self,
        token: Option<&str>,
        session: Option<&str>,
        now: i64,
    ) -> Result<(), TokenError> {
        let token = token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(TokenError::Missing)?;
        let session = session
            .filter(|s| !s.is_empty())
            .ok_or(TokenError::SessionMissing)?;

        let (payload, signature) = token.rsplit_once('.').ok_or(TokenError::Invalid)?;
        let (nonce, issued) = payload.split_once('.').ok_or(TokenError::Invalid)?;
        let issued: i64 = issued.parse().map_err(|_| TokenError::Invalid)?;
        let signature = hex::decode(signature).map_err(|_| TokenError::Invalid)?;

        self.sign(payload)
            .verify_slice(&signature)
            .map_err(|_| TokenError::Invalid)?;

        let age = now.saturating_sub(issued);
        if age < 0 || age as u64 > self.time_limit.as_secs() {
            return Err(TokenError::Expired);
        }

        if nonce != session {
            return Err(TokenError::Mismatch);
        }

        Ok(())
    }
}
