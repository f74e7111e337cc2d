//! # Windrose (Trip Planning Service)
//!
//! `windrose` collects a traveler's preferences, relays them to a
//! generative-AI completion API to produce a day-by-day itinerary, and
//! persists saved itineraries per account.
//!
//! ## Accounts & Verification
//!
//! Signup creates an account with a hashed password and `verified = false`.
//! Verification and password-reset links carry stateless signed tokens
//! (HMAC over the claims, nothing stored server-side). Verification is
//! advisory: login works before the email is confirmed, and the `verified`
//! flag is surfaced so clients can display trust state.
//!
//! - **Email Normalization:** addresses are trimmed and lower-cased before
//!   any comparison or storage; uniqueness is enforced by the database.
//! - **Token Intents:** a token is bound to a single intent (`verify` or
//!   `reset`) with its own max age; a verify token never works as a reset
//!   token and vice versa.
//! - **Sessions:** cookie sessions store only a hash of the session token.
//!   A password reset revokes every session for the account.
//!
//! ## Trips
//!
//! Saved itineraries are immutable, owned by exactly one account, and listed
//! newest-first. Lookups are owner-scoped: a record that belongs to someone
//! else returns `404 Not Found` rather than `403 Forbidden` to avoid
//! confirming that the record exists.
//!
//! ## Itinerary Generation
//!
//! `/generate` wraps the questionnaire payload in a fixed prompt and calls
//! the completion API once, with an explicit timeout and no retry. Upstream
//! failures surface as a structured error payload in place of the itinerary,
//! never as a request failure.

pub mod api;
pub mod cli;
pub mod token;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        // Should be a hex string (full SHA-1 is 40 chars, but could be short)
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
        assert!(
            GIT_COMMIT_HASH.len() >= 7,
            "GIT_COMMIT_HASH should be at least 7 characters long, got: {GIT_COMMIT_HASH}"
        );
    }

    #[test]
    fn test_app_user_agent_format() {
        assert!(APP_USER_AGENT.starts_with(env!("CARGO_PKG_NAME")));
        assert!(APP_USER_AGENT.contains(env!("CARGO_PKG_VERSION")));
    }
}
