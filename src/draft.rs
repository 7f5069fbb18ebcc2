//! Builders for the payloads sent while bootstrapping an election.
//!
//! Nothing here touches the network: the draft and the voter list are
//! assembled locally and handed to the API client afterwards.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::api::ApiError;

/// How voters authenticate in the generated election.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum AuthMode {
    /// Server-generated passwords mailed to each voter.
    Password,
    /// The server's configured `demo` authentication.
    Demo,
}

impl AuthMode {
    pub fn as_str(self) -> &'static str {
        match self {
            AuthMode::Password => "password",
            AuthMode::Demo => "demo",
        }
    }
}

impl fmt::Display for AuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthMode {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "password" => Ok(AuthMode::Password),
            "demo" => Ok(AuthMode::Demo),
            other => Err(ApiError::Validation(format!(
                "auth mode must be 'password' or 'demo', got '{other}'"
            ))),
        }
    }
}

/// The `authentication` field of a draft.
///
/// Belenios encodes plain password auth as the string `"Password"` and a
/// named configured method as `["Configured", name]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Authentication {
    Password,
    Configured(String),
}

impl From<AuthMode> for Authentication {
    fn from(mode: AuthMode) -> Self {
        match mode {
            AuthMode::Password => Authentication::Password,
            AuthMode::Demo => Authentication::Configured("demo".to_string()),
        }
    }
}

impl Serialize for Authentication {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Authentication::Password => serializer.serialize_str("Password"),
            Authentication::Configured(name) => ("Configured", name).serialize(serializer),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Question {
    pub question: String,
    pub answers: Vec<String>,
    pub min: u32,
    pub max: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Questions {
    pub description: String,
    pub name: String,
    pub questions: Vec<Question>,
    pub administrator: String,
    pub credential_authority: String,
}

/// Election draft document submitted to `POST elections`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Draft {
    pub version: u32,
    pub owners: Vec<u64>,
    pub questions: Questions,
    pub languages: Vec<String>,
    pub contact: String,
    pub booth: u32,
    pub authentication: Authentication,
    pub group: String,
    pub cred_authority_info: Option<serde_json::Value>,
}

impl Draft {
    pub fn new(admin_id: u64, group: &str, auth_mode: AuthMode) -> Self {
        Draft {
            version: 1,
            owners: vec![admin_id],
            questions: Questions {
                description: "Test election created automatically through the API.".to_string(),
                name: "Test Election (API)".to_string(),
                questions: vec![Question {
                    question: "Which option do you prefer?".to_string(),
                    answers: ["Option A", "Option B", "Option C"].map(String::from).to_vec(),
                    min: 1,
                    max: 1,
                }],
                administrator: "API Administrator".to_string(),
                credential_authority: "server".to_string(),
            },
            languages: vec!["pt".to_string(), "en".to_string()],
            contact: "API Administrator <admin@example.org>".to_string(),
            booth: 2,
            authentication: auth_mode.into(),
            group: group.to_string(),
            cred_authority_info: None,
        }
    }
}

/// Build a draft from a textual auth mode, rejecting anything but
/// `password` and `demo`.
pub fn make_draft(admin_id: u64, group: &str, auth_mode: &str) -> Result<Draft, ApiError> {
    let mode = auth_mode.parse::<AuthMode>()?;
    Ok(Draft::new(admin_id, group, mode))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Voter {
    pub address: String,
}

/// `count` voters `eleitor<n>@<domain>`, with `n` zero-padded to the width
/// of `count` so lexicographic order matches numeric order.
pub fn voter_list(count: usize, domain: &str) -> Vec<Voter> {
    let width = count.to_string().len();
    (1..=count)
        .map(|idx| Voter {
            address: format!("eleitor{idx:0width$}@{domain}"),
        })
        .collect()
}
