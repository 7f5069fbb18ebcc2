//! Explicit settings for one invocation, built from the parsed command line.
//!
//! The constants below only serve as defaults for the CLI; clients never read
//! them directly and always receive the resolved values.

use std::io::IsTerminal;
use std::time::Duration;

use crate::cli::GlobalArgs;
use crate::session::Credentials;
use crate::ui;

pub const DEFAULT_URL: &str = "http://localhost:8001/";
pub const DEFAULT_FALLBACK_TOKEN: &str = "belenios-test-admin-token";
pub const DEFAULT_LOGIN_PATH: &str = "auth/password";
pub const DEFAULT_TOKEN_PATH: &str = "api-token";
/// Upper bound for `--timeout`, one day.
pub const MAX_HTTP_TIMEOUT_SECS: u64 = 24 * 60 * 60;
/// Upper bound for `--ready-timeout`, one week.
pub const MAX_READY_TIMEOUT_SECS: u64 = 7 * 24 * 60 * 60;

#[derive(Debug, Clone)]
pub struct Settings {
    pub base_url: String,
    pub token: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub fallback_token: String,
    pub login_path: String,
    pub token_path: String,
    pub http_timeout: Duration,
}

impl Settings {
    pub fn from_args(args: &GlobalArgs) -> Self {
        Settings {
            base_url: args.url.clone(),
            token: args.token.clone(),
            username: args.username.clone(),
            password: args.password.clone(),
            fallback_token: args.fallback_token.clone(),
            login_path: args.login_path.clone(),
            token_path: args.token_path.clone(),
            http_timeout: Duration::from_secs(args.timeout),
        }
    }

    /// Login credentials, if a username was given. A missing password is
    /// asked for interactively, but only when stdin is a terminal.
    pub fn credentials(&self) -> Option<Credentials> {
        let username = self.username.clone()?;
        let password = match &self.password {
            Some(password) => password.clone(),
            None if std::io::stdin().is_terminal() => ui::prompt_password(&username)?,
            None => return None,
        };
        Some(Credentials { username, password })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;

    fn settings(extra: &[&str]) -> Settings {
        let mut argv = vec!["belenios-bootstrap"];
        argv.extend_from_slice(extra);
        argv.push("whoami");
        Settings::from_args(&Cli::try_parse_from(argv).unwrap().global)
    }

    #[test]
    fn timeout_becomes_duration() {
        assert_eq!(settings(&["--timeout", "7"]).http_timeout, Duration::from_secs(7));
    }

    #[test]
    fn credentials_need_a_username() {
        assert!(settings(&["--password", "pw"]).credentials().is_none());
    }

    #[test]
    fn credentials_from_flags() {
        let creds = settings(&["--username", "admin", "--password", "pw"]).credentials().unwrap();
        assert_eq!(creds.username, "admin");
        assert_eq!(creds.password, "pw");
    }
}
