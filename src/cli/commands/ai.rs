use crate::api::planner::DEFAULT_MODEL;
use clap::{Arg, ArgMatches, Command};

pub const ARG_AI_ENDPOINT: &str = "ai-endpoint";
pub const ARG_AI_MODEL: &str = "ai-model";
pub const ARG_AI_API_KEY: &str = "ai-api-key";
pub const ARG_AI_TIMEOUT_SECONDS: &str = "ai-timeout-seconds";

const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_AI_ENDPOINT)
                .long("ai-endpoint")
                .help("Base URL of the completion API")
                .env("WINDROSE_AI_ENDPOINT")
                .default_value(DEFAULT_ENDPOINT),
        )
        .arg(
            Arg::new(ARG_AI_MODEL)
                .long("ai-model")
                .help("Completion model used for itinerary generation")
                .env("WINDROSE_AI_MODEL")
                .default_value(DEFAULT_MODEL),
        )
        .arg(
            Arg::new(ARG_AI_API_KEY)
                .long("ai-api-key")
                .help("API key for the completion API; generation is disabled when unset")
                .env("WINDROSE_AI_API_KEY"),
        )
        .arg(
            Arg::new(ARG_AI_TIMEOUT_SECONDS)
                .long("ai-timeout-seconds")
                .help("Per-request completion timeout in seconds")
                .env("WINDROSE_AI_TIMEOUT_SECONDS")
                .default_value("30")
                .value_parser(clap::value_parser!(u64)),
        )
}

#[derive(Debug)]
pub struct Options {
    pub endpoint: String,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout_seconds: u64,
}

impl Options {
    #[must_use]
    pub fn parse(matches: &ArgMatches) -> Self {
        Self {
            endpoint: matches
                .get_one::<String>(ARG_AI_ENDPOINT)
                .cloned()
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            model: matches
                .get_one::<String>(ARG_AI_MODEL)
                .cloned()
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_key: matches.get_one::<String>(ARG_AI_API_KEY).cloned(),
            timeout_seconds: matches
                .get_one::<u64>(ARG_AI_TIMEOUT_SECONDS)
                .copied()
                .unwrap_or(30),
        }
    }
}
