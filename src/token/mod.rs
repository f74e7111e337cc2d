//! Stateless signed tokens for verification and password-reset links.
//!
//! A token is `base64url(claims JSON) . base64url(HMAC-SHA256)`, signed with
//! a key derived from the server secret. Nothing is stored server-side: the
//! token itself carries the subject, the intent, and the issue time.
//!
//! Verification collapses every failure (bad signature, wrong intent,
//! expired, malformed) into a single `None` so callers cannot tell a
//! tampered token apart from an expired one.

use anyhow::{Context, Result};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use time::OffsetDateTime;

type HmacSha256 = Hmac<Sha256>;

/// Domain-separation namespace mixed into the signing key so tokens cannot
/// be confused with any other HMAC use of the same secret.
const SIGNING_NAMESPACE: &str = "windrose.signed-token.v1";

/// Purpose tag embedded in every token. A token issued for one intent never
/// verifies under another.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Intent {
    Verify,
    Reset,
}

impl Intent {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Verify => "verify",
            Self::Reset => "reset",
        }
    }

    /// Maximum accepted age in seconds. Verification links may sit in an
    /// inbox for a day; reset links are higher-risk and expire faster.
    #[must_use]
    pub const fn max_age_seconds(self) -> i64 {
        match self {
            Self::Verify => 24 * 60 * 60,
            Self::Reset => 2 * 60 * 60,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    intent: String,
    iat: i64,
}

/// Issues and verifies signed tokens with a process-wide derived key.
///
/// Read-only after construction; safe to share behind an `Arc`.
pub struct TokenSigner {
    key: [u8; 32],
}

impl TokenSigner {
    /// Derive the signing key from the server secret and the fixed
    /// namespace. Pure function of its inputs, so every process with the
    /// same secret verifies the same tokens.
    #[must_use]
    pub fn new(secret: &SecretString) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(SIGNING_NAMESPACE.as_bytes());
        hasher.update([0u8]);
        hasher.update(secret.expose_secret().as_bytes());
        Self {
            key: hasher.finalize().into(),
        }
    }

    /// Issue a token vouching for `subject` under `intent`, stamped with the
    /// current time.
    ///
    /// # Errors
    ///
    /// Returns an error if claim serialization fails.
    pub fn issue(&self, subject: &str, intent: Intent) -> Result<String> {
        self.issue_at(
            subject,
            intent,
            OffsetDateTime::now_utc().unix_timestamp(),
        )
    }

    /// Issue with an explicit issue time. Exposed so expiry behavior can be
    /// exercised without waiting on the clock.
    ///
    /// # Errors
    ///
    /// Returns an error if claim serialization fails.
    pub fn issue_at(&self, subject: &str, intent: Intent, issued_at_unix: i64) -> Result<String> {
        let claims = Claims {
            sub: subject.to_string(),
            intent: intent.as_str().to_string(),
            iat: issued_at_unix,
        };
        let payload = serde_json::to_vec(&claims).context("failed to serialize token claims")?;
        let payload_b64 = URL_SAFE_NO_PAD.encode(payload);

        let mut mac =
            HmacSha256::new_from_slice(&self.key).context("failed to initialize token mac")?;
        mac.update(payload_b64.as_bytes());
        let signature_b64 = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        Ok(format!("{payload_b64}.{signature_b64}"))
    }

    /// Verify a token against the expected intent and max age, returning the
    /// subject on success. Any failure returns `None`.
    #[must_use]
    pub fn verify(&self, token: &str, expected: Intent, max_age_seconds: i64) -> Option<String> {
        self.verify_at(
            token,
            expected,
            max_age_seconds,
            OffsetDateTime::now_utc().unix_timestamp(),
        )
    }

    /// Verification with an explicit "now", used to pin the expiry boundary
    /// in tests. The signature is checked before the payload is parsed, so
    /// unauthenticated bytes never reach the JSON decoder.
    #[must_use]
    pub fn verify_at(
        &self,
        token: &str,
        expected: Intent,
        max_age_seconds: i64,
        now_unix: i64,
    ) -> Option<String> {
        let token = token.trim();
        let (payload_b64, signature_b64) = token.split_once('.')?;
        if payload_b64.is_empty() || signature_b64.is_empty() || signature_b64.contains('.') {
            return None;
        }

        let signature = URL_SAFE_NO_PAD.decode(signature_b64).ok()?;
        let mut mac = HmacSha256::new_from_slice(&self.key).ok()?;
        mac.update(payload_b64.as_bytes());
        mac.verify_slice(&signature).ok()?;

        let payload = URL_SAFE_NO_PAD.decode(payload_b64).ok()?;
        let claims: Claims = serde_json::from_slice(&payload).ok()?;

        if claims.intent != expected.as_str() {
            return None;
        }

        // Tokens dated in the future are as invalid as expired ones.
        let age = now_unix.checked_sub(claims.iat)?;
        if age < 0 || age > max_age_seconds {
            return None;
        }

        Some(claims.sub)
    }
}
