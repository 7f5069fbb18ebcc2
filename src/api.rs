// API client module: a small blocking HTTP client that talks to the
// Belenios public API rooted at `<base>/api/`. Every call is at-most-once;
// failures of any kind are folded into `ApiError`.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::config::MAX_HTTP_TIMEOUT_SECS;
use crate::draft::Draft;

/// The one error kind surfaced by every command.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP {status} on {method} {path}: {body}")]
    Http {
        status: u16,
        method: Method,
        path: String,
        body: String,
    },
    #[error("connection failure on {method} {path}: {source}")]
    Connection {
        method: Method,
        path: String,
        source: reqwest::Error,
    },
    #[error(
        "timed out waiting for credentials/trustees to become ready; \
         inspect /api/elections/{uuid}/draft/status"
    )]
    ReadinessTimeout { uuid: String },
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Server-owned snapshot of a draft's asynchronous preparation.
///
/// Missing or `null` flags count as not ready. Any other fields the server
/// sends are kept so they can be echoed back in the summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DraftStatus {
    #[serde(default)]
    pub credentials_ready: Option<bool>,
    #[serde(default)]
    pub trustees_ready: Option<bool>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl DraftStatus {
    pub fn credentials_ready(&self) -> bool {
        self.credentials_ready.unwrap_or(false)
    }

    pub fn trustees_ready(&self) -> bool {
        self.trustees_ready.unwrap_or(false)
    }

    pub fn is_ready(&self) -> bool {
        self.credentials_ready() && self.trustees_ready()
    }
}

/// Blocking client holding the API root and the bearer token captured at
/// startup.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    api_root: Url,
    token: String,
}

impl ApiClient {
    /// Build a client for `base_url`; requests go to `<base_url>/api/<path>`.
    pub fn new(base_url: &str, token: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let api_root = api_root(base_url)?;
        check_timeout(timeout)?;
        let client = Client::builder()
            .user_agent(Self::user_agent())
            .timeout(timeout)
            .build()
            .map_err(ApiError::Client)?;
        Ok(ApiClient {
            client,
            api_root,
            token: token.into(),
        })
    }

    pub fn user_agent() -> &'static str {
        concat!("belenios-bootstrap/", env!("CARGO_PKG_VERSION"))
    }

    pub fn api_root(&self) -> &Url {
        &self.api_root
    }

    pub fn get(&self, path: &str) -> Result<Option<Value>, ApiError> {
        self.request::<()>(Method::GET, path, None)
    }

    pub fn post<T: Serialize + ?Sized>(&self, path: &str, payload: &T) -> Result<Option<Value>, ApiError> {
        self.request(Method::POST, path, Some(payload))
    }

    pub fn put<T: Serialize + ?Sized>(&self, path: &str, payload: &T) -> Result<Option<Value>, ApiError> {
        self.request(Method::PUT, path, Some(payload))
    }

    pub fn delete(&self, path: &str) -> Result<Option<Value>, ApiError> {
        self.request::<()>(Method::DELETE, path, None)
    }

    fn request<T: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        payload: Option<&T>,
    ) -> Result<Option<Value>, ApiError> {
        let url = self.api_root.join(path)?;
        debug!(%method, %url, "sending request");

        let mut req = self
            .client
            .request(method.clone(), url)
            .bearer_auth(&self.token)
            .header(ACCEPT, "application/json");
        if let Some(body) = payload {
            // `json` also sets `Content-Type: application/json`.
            req = req.json(body);
        }

        let connection = |source| ApiError::Connection {
            method: method.clone(),
            path: path.to_string(),
            source,
        };
        let res = req.send().map_err(connection)?;
        let status = res.status();
        let text = res.text().map_err(connection)?;
        debug!(%method, path, status = status.as_u16(), "received response");

        if !status.is_success() {
            return Err(ApiError::Http {
                status: status.as_u16(),
                method,
                path: path.to_string(),
                body: text,
            });
        }
        if text.is_empty() {
            return Ok(None);
        }
        serde_json::from_str(&text).map(Some).map_err(|err| {
            ApiError::UnexpectedResponse(format!("{method} {path} returned invalid JSON: {err}"))
        })
    }

    /// Submit a draft and return the UUID the server assigned to it.
    pub fn create_election(&self, draft: &Draft) -> Result<String, ApiError> {
        match self.post("elections", draft)? {
            Some(Value::String(uuid)) => Ok(uuid),
            other => Err(ApiError::UnexpectedResponse(format!(
                "election creation did not return an identifier: {}",
                describe(other.as_ref())
            ))),
        }
    }

    /// Numeric id of the account the token belongs to.
    pub fn account_id(&self) -> Result<u64, ApiError> {
        let account = self.get("account")?;
        account
            .as_ref()
            .and_then(|value| value.get("id"))
            .and_then(Value::as_u64)
            .ok_or_else(|| {
                ApiError::UnexpectedResponse(format!(
                    "account lookup did not return a numeric id: {}",
                    describe(account.as_ref())
                ))
            })
    }

    pub fn draft_status(&self, uuid: &str) -> Result<DraftStatus, ApiError> {
        let path = format!("elections/{uuid}/draft/status");
        let value = self.get(&path)?.ok_or_else(|| {
            ApiError::UnexpectedResponse(format!("{path} returned an empty body"))
        })?;
        serde_json::from_value(value)
            .map_err(|err| ApiError::UnexpectedResponse(format!("{path} returned {err}")))
    }
}

/// Reject request timeouts beyond [`MAX_HTTP_TIMEOUT_SECS`]; reqwest panics
/// when a deadline cannot be represented.
pub(crate) fn check_timeout(timeout: Duration) -> Result<(), ApiError> {
    if timeout > Duration::from_secs(MAX_HTTP_TIMEOUT_SECS) {
        return Err(ApiError::Validation(format!(
            "HTTP timeout of {}s exceeds the maximum of {MAX_HTTP_TIMEOUT_SECS}s",
            timeout.as_secs()
        )));
    }
    Ok(())
}

/// `<base without trailing slashes>/api/`
fn api_root(base_url: &str) -> Result<Url, ApiError> {
    let base = Url::parse(&format!("{}/", base_url.trim_end_matches('/')))?;
    Ok(base.join("api/")?)
}

fn describe(value: Option<&Value>) -> String {
    value.map_or_else(|| "empty body".to_string(), Value::to_string)
}
