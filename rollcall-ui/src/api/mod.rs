//! REST client for the attendance backend
//!
//! One [`ApiClient`] is built per process and shared by every fetch and
//! submit operation. Credentials are injected per call; nothing in this
//! module stores a token between requests.

pub mod attendance;
pub mod roster;

pub use attendance::SubmitReceipt;

use rollcall_common::{Error, Result};
use std::time::Duration;

const USER_AGENT: &str = "rollcall/0.1.0";

/// Bearer credential supplied by the caller on every request.
///
/// Acquisition and renewal belong to the surrounding application; an
/// expired credential surfaces as [`Error::Auth`] and is never retried
/// with the same token here.
#[derive(Clone)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    fn header_value(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl std::fmt::Debug for Credential {
    // Token bodies must not reach logs
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential(..)")
    }
}

/// REST client for the attendance backend
pub struct ApiClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client against `base_url` with the given per-request
    /// timeout. Trailing slashes on the base URL are stripped.
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| Error::Transport(e.to_string()))?;

        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self {
            http_client,
            base_url,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http_client
    }
}

/// Map a transport-level reqwest failure onto the error taxonomy.
pub(crate) fn transport_error(err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::Transport(format!("request timed out: {}", err))
    } else {
        Error::Transport(err.to_string())
    }
}

/// Shared non-2xx handling: 401/403 become [`Error::Auth`], everything
/// else [`Error::Server`] carrying the backend's detail text.
pub(crate) async fn error_for_status(response: reqwest::Response) -> Error {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let detail = extract_detail(&body);

    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        let message = if detail.is_empty() {
            format!("credential rejected ({})", status)
        } else {
            detail
        };
        Error::Auth(message)
    } else {
        let detail = if detail.is_empty() {
            status.to_string()
        } else {
            detail
        };
        Error::Server {
            status: status.as_u16(),
            detail,
        }
    }
}

/// Pull the `detail` field out of a JSON error body when present, else
/// return the raw body text.
pub(crate) fn extract_detail(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("detail")
                .and_then(|detail| detail.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.trim().to_string())
}
