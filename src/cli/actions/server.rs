use crate::{
    api::{
        self,
        mail::{MailClient, Mailer},
        planner::{GeminiClient, Planner},
        state::{AppConfig, AppState},
    },
    token::TokenSigner,
};
use anyhow::{Context, Result};
use secrecy::SecretString;
use tracing::warn;
use url::Url;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub dsn: String,
    pub secret_key: String,
    pub base_url: String,
    pub session_ttl_seconds: i64,
    pub trip_title_max_chars: usize,
    pub mail_endpoint: Option<String>,
    pub mail_api_key: Option<String>,
    pub mail_sender: String,
    pub ai_endpoint: String,
    pub ai_model: String,
    pub ai_api_key: Option<String>,
    pub ai_timeout_seconds: u64,
}

/// Execute the server action.
/// # Errors
/// Returns an error if a collaborator cannot be built or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    let config = AppConfig::new(args.base_url)
        .with_session_ttl_seconds(args.session_ttl_seconds)
        .with_trip_title_max_chars(args.trip_title_max_chars);

    let signer = TokenSigner::new(&SecretString::from(args.secret_key));

    // Both collaborators degrade to a disabled variant instead of blocking boot,
    // so the service stays useful with partial configuration.
    let mailer = match (args.mail_endpoint, args.mail_api_key) {
        (Some(endpoint), Some(api_key)) => {
            let endpoint = Url::parse(&endpoint)
                .with_context(|| format!("Invalid mail endpoint: {endpoint}"))?;
            Mailer::Http(
                MailClient::new(endpoint, SecretString::from(api_key), args.mail_sender)
                    .context("Failed to build mail client")?,
            )
        }
        _ => {
            warn!("Mail delivery disabled: verification links fall back to the signup response");
            Mailer::Disabled
        }
    };

    let planner = match args.ai_api_key {
        Some(api_key) => {
            let endpoint = Url::parse(&args.ai_endpoint)
                .with_context(|| format!("Invalid AI endpoint: {}", args.ai_endpoint))?;
            Planner::Gemini(
                GeminiClient::new(
                    &endpoint,
                    &args.ai_model,
                    SecretString::from(api_key),
                    args.ai_timeout_seconds,
                )
                .context("Failed to build completion client")?,
            )
        }
        None => {
            warn!("Itinerary generation disabled: no AI API key configured");
            Planner::Disabled
        }
    };

    let state = AppState::new(config, signer, mailer, planner);

    api::new(args.port, args.dsn, state).await
}
