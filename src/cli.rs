//! Command-line surface for `belenios-bootstrap`.

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::level_filters::LevelFilter;

use crate::config::{
    DEFAULT_FALLBACK_TOKEN, DEFAULT_LOGIN_PATH, DEFAULT_TOKEN_PATH, DEFAULT_URL, MAX_HTTP_TIMEOUT_SECS,
    MAX_READY_TIMEOUT_SECS,
};
use crate::draft::AuthMode;

const EXAMPLE: &str = "Quick start:
  belenios-bootstrap --url http://localhost:8001/ --token <TOKEN> bootstrap --admin-id 1 --voters 5 --open";

#[derive(Parser, Debug)]
#[command(
    name = "belenios-bootstrap",
    version,
    about = "Create and manage a test election through the Belenios API",
    after_help = EXAMPLE
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Server base URL, e.g. <https://vote.example.org/>
    #[arg(long, global = true, env = "BELENIOS_URL", default_value = DEFAULT_URL)]
    pub url: String,

    /// Administrative API token; skips the web login when given
    #[arg(long, global = true, env = "BELENIOS_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Account name used for the web login
    #[arg(long, global = true, env = "BELENIOS_USERNAME")]
    pub username: Option<String>,

    /// Password used for the web login (prompted when missing on a terminal)
    #[arg(long, global = true, env = "BELENIOS_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// HTTP timeout in seconds (at most one day)
    #[arg(
        long,
        global = true,
        default_value_t = 30,
        value_name = "SECONDS",
        value_parser = clap::value_parser!(u64).range(..=MAX_HTTP_TIMEOUT_SECS)
    )]
    pub timeout: u64,

    /// Token used when neither --token nor the web login yields one
    #[arg(
        long,
        global = true,
        env = "BELENIOS_FALLBACK_TOKEN",
        default_value = DEFAULT_FALLBACK_TOKEN,
        hide_default_value = true,
        hide_env_values = true
    )]
    pub fallback_token: String,

    /// Path of the HTML login form, relative to --url
    #[arg(long, global = true, default_value = DEFAULT_LOGIN_PATH, value_name = "PATH")]
    pub login_path: String,

    /// Path returning the API token after login, relative to --url
    #[arg(long, global = true, default_value = DEFAULT_TOKEN_PATH, value_name = "PATH")]
    pub token_path: String,

    /// Base log level (trace|debug|info|warn|error); RUST_LOG overrides it
    #[arg(long, global = true, default_value = "warn", value_name = "LEVEL")]
    pub log_level: LevelFilter,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create, prepare and validate a test election
    Bootstrap(BootstrapArgs),
    /// List the administrator's elections
    List,
    /// Show an election
    Status {
        /// Election UUID
        uuid: String,
    },
    /// Run an administrative action on an election
    Action {
        /// Election UUID
        uuid: String,
        #[arg(value_enum)]
        action: AdminAction,
    },
    /// Delete an election
    Delete {
        /// Election UUID
        uuid: String,
    },
    /// Show the account the token belongs to
    Whoami,
}

#[derive(Args, Debug, Clone)]
pub struct BootstrapArgs {
    /// Numeric id of the admin account (looked up via the API when omitted)
    #[arg(long)]
    pub admin_id: Option<u64>,

    /// Number of voters to register
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u32).range(1..))]
    pub voters: u32,

    /// E-mail domain of the generated voters
    #[arg(long, default_value = "example.org")]
    pub domain: String,

    /// Cryptographic group
    #[arg(long, default_value = "Ed25519")]
    pub group: String,

    /// Voter authentication mode
    #[arg(long, value_enum, default_value_t = AuthMode::Password)]
    pub auth: AuthMode,

    /// Open the election after validating it
    #[arg(long)]
    pub open: bool,

    /// Maximum time to wait for the draft to become ready (at most one week)
    #[arg(
        long,
        default_value_t = 120,
        value_name = "SECONDS",
        value_parser = clap::value_parser!(u64).range(..=MAX_READY_TIMEOUT_SECS)
    )]
    pub ready_timeout: u64,

    /// Delay between two draft status polls
    #[arg(
        long,
        default_value_t = 3,
        value_name = "SECONDS",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub poll_interval: u64,
}

/// State transitions the server accepts on `POST elections/<uuid>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AdminAction {
    #[value(name = "Open")]
    Open,
    #[value(name = "Close")]
    Close,
    #[value(name = "ComputeEncryptedTally")]
    ComputeEncryptedTally,
    #[value(name = "ReleaseTally")]
    ReleaseTally,
    #[value(name = "Archive")]
    Archive,
}

impl AdminAction {
    pub fn as_str(self) -> &'static str {
        match self {
            AdminAction::Open => "Open",
            AdminAction::Close => "Close",
            AdminAction::ComputeEncryptedTally => "ComputeEncryptedTally",
            AdminAction::ReleaseTally => "ReleaseTally",
            AdminAction::Archive => "Archive",
        }
    }
}
