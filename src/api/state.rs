//! Service configuration and the shared state handed to handlers.

use crate::api::mail::Mailer;
use crate::api::planner::Planner;
use crate::token::TokenSigner;

const DEFAULT_SESSION_TTL_SECONDS: i64 = 30 * 24 * 60 * 60;
const DEFAULT_TRIP_TITLE_MAX_CHARS: usize = 255;

#[derive(Clone, Debug)]
pub struct AppConfig {
    public_base_url: String,
    session_ttl_seconds: i64,
    trip_title_max_chars: usize,
}

impl AppConfig {
    #[must_use]
    pub fn new(public_base_url: String) -> Self {
        Self {
            public_base_url,
            session_ttl_seconds: DEFAULT_SESSION_TTL_SECONDS,
            trip_title_max_chars: DEFAULT_TRIP_TITLE_MAX_CHARS,
        }
    }

    #[must_use]
    pub fn with_session_ttl_seconds(mut self, seconds: i64) -> Self {
        self.session_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_trip_title_max_chars(mut self, max_chars: usize) -> Self {
        self.trip_title_max_chars = max_chars;
        self
    }

    #[must_use]
    pub fn public_base_url(&self) -> &str {
        &self.public_base_url
    }

    #[must_use]
    pub fn session_ttl_seconds(&self) -> i64 {
        self.session_ttl_seconds
    }

    #[must_use]
    pub fn trip_title_max_chars(&self) -> usize {
        self.trip_title_max_chars
    }

    /// Only mark session cookies `Secure` when links are served over HTTPS.
    pub(crate) fn session_cookie_secure(&self) -> bool {
        self.public_base_url.starts_with("https://")
    }
}

/// Collaborators built once at startup and injected into handlers.
/// Everything here is read-only after construction.
pub struct AppState {
    config: AppConfig,
    signer: TokenSigner,
    mailer: Mailer,
    planner: Planner,
}

impl AppState {
    #[must_use]
    pub fn new(config: AppConfig, signer: TokenSigner, mailer: Mailer, planner: Planner) -> Self {
        Self {
            config,
            signer,
            mailer,
            planner,
        }
    }

    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[must_use]
    pub fn signer(&self) -> &TokenSigner {
        &self.signer
    }

    #[must_use]
    pub fn mailer(&self) -> &Mailer {
        &self.mailer
    }

    #[must_use]
    pub fn planner(&self) -> &Planner {
        &self.planner
    }
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, AppState};
    use crate::api::mail::Mailer;
    use crate::api::planner::Planner;
    use crate::token::TokenSigner;
    use secrecy::SecretString;

    #[test]
    fn config_defaults_and_overrides() {
        let config = AppConfig::new("https://windrose.dev".to_string());

        assert_eq!(config.public_base_url(), "https://windrose.dev");
        assert_eq!(
            config.session_ttl_seconds(),
            super::DEFAULT_SESSION_TTL_SECONDS
        );
        assert_eq!(
            config.trip_title_max_chars(),
            super::DEFAULT_TRIP_TITLE_MAX_CHARS
        );

        let config = config
            .with_session_ttl_seconds(3600)
            .with_trip_title_max_chars(64);

        assert_eq!(config.session_ttl_seconds(), 3600);
        assert_eq!(config.trip_title_max_chars(), 64);
    }

    #[test]
    fn cookie_secure_follows_base_url_scheme() {
        let https = AppConfig::new("https://windrose.dev".to_string());
        assert!(https.session_cookie_secure());

        let http = AppConfig::new("http://localhost:8080".to_string());
        assert!(!http.session_cookie_secure());
    }

    #[test]
    fn state_exposes_collaborators() {
        let config = AppConfig::new("https://windrose.dev".to_string());
        let signer = TokenSigner::new(&SecretString::from("test-secret"));
        let state = AppState::new(config, signer, Mailer::Disabled, Planner::Disabled);

        assert_eq!(state.config().public_base_url(), "https://windrose.dev");
        assert!(matches!(state.mailer(), Mailer::Disabled));
        assert!(matches!(state.planner(), Planner::Disabled));
    }
}
