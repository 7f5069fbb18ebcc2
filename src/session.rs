//! Token resolution and the best-effort web login.
//!
//! The web login scrapes the server's HTML login form, so it is only a probe:
//! any failure means "no token" and the caller moves on to the next source.

use std::fmt;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::blocking::Client;
use tracing::{debug, info};
use url::Url;

use crate::api::ApiError;

static STATE_INPUT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"name=["']state["'][^>]*?value=["']([^"']+)["']|value=["']([^"']+)["'][^>]*?name=["']state["']"#)
        .unwrap()
});

#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// A way of trading credentials for a bearer token.
pub trait Login {
    /// Returns `None` on any failure; never errors.
    fn login(&self, credentials: &Credentials) -> Option<String>;
}

/// Cookie-based login against the server's HTML login form.
#[derive(Debug, Clone)]
pub struct WebLogin {
    base: Url,
    login_path: String,
    token_path: String,
    timeout: Duration,
}

impl WebLogin {
    pub fn new(base_url: &str, login_path: &str, token_path: &str, timeout: Duration) -> Result<Self, ApiError> {
        let base = Url::parse(&format!("{}/", base_url.trim_end_matches('/')))?;
        crate::api::check_timeout(timeout)?;
        Ok(WebLogin {
            base,
            login_path: login_path.trim_start_matches('/').to_string(),
            token_path: token_path.trim_start_matches('/').to_string(),
            timeout,
        })
    }

    fn attempt(&self, credentials: &Credentials) -> Result<String> {
        let client = Client::builder()
            .cookie_store(true)
            .timeout(self.timeout)
            .build()
            .context("Failed to build login client")?;
        let login_url = self.base.join(&self.login_path)?;

        let page = client
            .get(login_url.clone())
            .send()
            .and_then(|res| res.error_for_status())
            .context("Failed to fetch login page")?
            .text()
            .context("Failed to read login page")?;
        let state = extract_state(&page).ok_or_else(|| anyhow!("no state token in login page"))?;

        client
            .post(login_url)
            .form(&[
                ("state", state.as_str()),
                ("login", credentials.username.as_str()),
                ("password", credentials.password.as_str()),
            ])
            .send()
            .and_then(|res| res.error_for_status())
            .context("Failed to submit login form")?;

        let token = client
            .get(self.base.join(&self.token_path)?)
            .send()
            .context("Failed to request token")?
            .text()
            .context("Failed to read token response")?;
        let token = token.trim();
        if !looks_like_token(token) {
            anyhow::bail!("token endpoint did not return a token");
        }
        Ok(token.to_string())
    }
}

impl Login for WebLogin {
    fn login(&self, credentials: &Credentials) -> Option<String> {
        match self.attempt(credentials) {
            Ok(token) => Some(token),
            Err(err) => {
                debug!(error = ?err, username = %credentials.username, "web login failed");
                None
            }
        }
    }
}

fn extract_state(html: &str) -> Option<String> {
    let caps = STATE_INPUT.captures(html)?;
    caps.get(1).or_else(|| caps.get(2)).map(|m| m.as_str().to_string())
}

fn looks_like_token(body: &str) -> bool {
    let lower = body.to_ascii_lowercase();
    !body.is_empty() && !body.starts_with('<') && !lower.contains("<html") && lower != "forbidden"
}

/// Where the token used for this invocation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    Explicit,
    Login,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedToken {
    pub value: String,
    pub source: TokenSource,
}

/// Pick the token: an explicit one, then a login attempt, then `fallback`.
pub fn resolve_token<L: Login + ?Sized>(
    explicit: Option<&str>,
    credentials: Option<&Credentials>,
    login: &L,
    fallback: &str,
) -> ResolvedToken {
    if let Some(token) = explicit.filter(|t| !t.is_empty()) {
        return ResolvedToken {
            value: token.to_string(),
            source: TokenSource::Explicit,
        };
    }
    if let Some(token) = credentials.and_then(|c| login.login(c)) {
        info!("obtained API token through web login");
        return ResolvedToken {
            value: token,
            source: TokenSource::Login,
        };
    }
    info!("using fallback API token");
    ResolvedToken {
        value: fallback.to_string(),
        source: TokenSource::Fallback,
    }
}
