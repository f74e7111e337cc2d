//! Command-line argument dispatch and server initialization.
//!
//! This module parses validated CLI arguments and maps them to the appropriate
//! action, such as starting the API server with its full configuration state.

use crate::cli::actions::{Action, server::Args};
use crate::cli::commands::{ai, mail};
use anyhow::{Context, Result};

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>("port").copied().unwrap_or(8080);
    let dsn = matches
        .get_one::<String>("dsn")
        .cloned()
        .context("missing required argument: --dsn")?;
    let secret_key = matches
        .get_one::<String>("secret-key")
        .cloned()
        .context("missing required argument: --secret-key")?;
    let base_url = matches
        .get_one::<String>("base-url")
        .cloned()
        .context("missing required argument: --base-url")?;
    let session_ttl_seconds = matches
        .get_one::<i64>("session-ttl-seconds")
        .copied()
        .context("missing required argument: --session-ttl-seconds")?;
    let trip_title_max_chars = matches
        .get_one::<usize>("trip-title-max-chars")
        .copied()
        .context("missing required argument: --trip-title-max-chars")?;

    let mail_opts = mail::Options::parse(matches);
    let ai_opts = ai::Options::parse(matches);

    Ok(Action::Server(Args {
        port,
        dsn,
        secret_key,
        base_url,
        session_ttl_seconds,
        trip_title_max_chars,
        mail_endpoint: mail_opts.endpoint,
        mail_api_key: mail_opts.api_key,
        mail_sender: mail_opts.sender,
        ai_endpoint: ai_opts.endpoint,
        ai_model: ai_opts.model,
        ai_api_key: ai_opts.api_key,
        ai_timeout_seconds: ai_opts.timeout_seconds,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_args_from_matches() {
        temp_env::with_vars(
            [
                ("WINDROSE_PORT", None::<&str>),
                ("WINDROSE_BASE_URL", None::<&str>),
                ("WINDROSE_SESSION_TTL_SECONDS", None::<&str>),
                ("WINDROSE_TRIP_TITLE_MAX_CHARS", None::<&str>),
                ("WINDROSE_MAIL_ENDPOINT", None::<&str>),
                ("WINDROSE_MAIL_API_KEY", None::<&str>),
                ("WINDROSE_AI_API_KEY", None::<&str>),
            ],
            || {
                let command = crate::cli::commands::new();
                let matches = command.get_matches_from(vec![
                    "windrose",
                    "--dsn",
                    "postgres://localhost/windrose",
                    "--secret-key",
                    "sekret",
                ]);

                let result = handler(&matches);
                assert!(result.is_ok());
                if let Ok(Action::Server(args)) = result {
                    assert_eq!(args.port, 8080);
                    assert_eq!(args.dsn, "postgres://localhost/windrose");
                    assert_eq!(args.base_url, "http://localhost:8080");
                    assert_eq!(args.session_ttl_seconds, 2_592_000);
                    assert_eq!(args.trip_title_max_chars, 255);
                    assert!(args.mail_endpoint.is_none());
                    assert!(args.ai_api_key.is_none());
                    assert_eq!(args.ai_timeout_seconds, 30);
                }
            },
        );
    }
}
