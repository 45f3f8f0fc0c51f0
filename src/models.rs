//! Data models for campus network authentication

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Transient form state for one login attempt (CLI flags before reconciliation)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub account: String,
    pub password: String,
    pub remember: bool,
}

/// Durable credential record owned by the store
///
/// A missing store file reads as the `Default` value: empty strings and
/// `remember = false`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredCredentials {
    #[serde(default)]
    pub account: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub remember: bool,
}

/// JSON payload unwrapped from the portal's JSONP envelope
///
/// Only `result` is interpreted; the remaining fields are carried for
/// logging.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoginPayload {
    /// 1 = accepted, anything else (or absent) = rejected
    #[serde(default)]
    pub result: i64,

    #[serde(default)]
    pub aolno: i64,

    pub v46ip: Option<String>,

    pub uid: Option<String>,

    #[serde(flatten)]
    pub extra: serde_json::Value,
}

/// Everything that can go wrong during a login attempt
///
/// The rendered messages are the user-facing strings; the variants keep the
/// taxonomy distinct for callers that branch on it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LoginFailure {
    #[error("campus network authentication timed out, check your connection")]
    Timeout,

    #[error("cannot reach authentication server, ensure you are on campus WiFi")]
    Unreachable,

    #[error("error during login: {0}")]
    Transport(String),

    #[error("network request failed: status {0}")]
    Status(u16),

    #[error("could not parse server response")]
    Envelope,

    #[error("failed to parse response: {0}")]
    Json(String),

    #[error("login failed, check account and password")]
    Rejected,
}

pub type LoginOutcome = Result<LoginPayload, LoginFailure>;

impl From<reqwest::Error> for LoginFailure {
    /// Timeout and connect-level faults get dedicated messages; everything
    /// else falls through to the generic transport case. Checked in this
    /// order so a whole-request timeout never reads as "unreachable".
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LoginFailure::Timeout
        } else if err.is_connect() {
            LoginFailure::Unreachable
        } else {
            LoginFailure::Transport(err.to_string())
        }
    }
}
