use clap::{Arg, ArgMatches, Command};

pub const ARG_MAIL_ENDPOINT: &str = "mail-endpoint";
pub const ARG_MAIL_API_KEY: &str = "mail-api-key";
pub const ARG_MAIL_SENDER: &str = "mail-sender";

const DEFAULT_SENDER: &str = "no-reply@windrose.dev";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_MAIL_ENDPOINT)
                .long("mail-endpoint")
                .help("Outbound mail HTTP endpoint; delivery is skipped when unset")
                .env("WINDROSE_MAIL_ENDPOINT"),
        )
        .arg(
            Arg::new(ARG_MAIL_API_KEY)
                .long("mail-api-key")
                .help("API key for the mail endpoint")
                .env("WINDROSE_MAIL_API_KEY"),
        )
        .arg(
            Arg::new(ARG_MAIL_SENDER)
                .long("mail-sender")
                .help("From address for verification and reset mail")
                .env("WINDROSE_MAIL_SENDER")
                .default_value(DEFAULT_SENDER),
        )
}

#[derive(Debug)]
pub struct Options {
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub sender: String,
}

impl Options {
    #[must_use]
    pub fn parse(matches: &ArgMatches) -> Self {
        Self {
            endpoint: matches.get_one::<String>(ARG_MAIL_ENDPOINT).cloned(),
            api_key: matches.get_one::<String>(ARG_MAIL_API_KEY).cloned(),
            sender: matches
                .get_one::<String>(ARG_MAIL_SENDER)
                .cloned()
                .unwrap_or_else(|| DEFAULT_SENDER.to_string()),
        }
    }
}
