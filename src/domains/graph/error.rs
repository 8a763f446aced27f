//! Graph API error types.
//!
//! Every failure of a paginated fetch collapses into one of these variants.
//! There is no partial-success value: a call either yields all rows or a
//! `GraphError`.

use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

/// Result type for Graph API operations.
pub type GraphResult<T> = Result<T, GraphError>;

/// Longest slice of an unparseable error body written to the log.
const MAX_LOGGED_BODY: usize = 512;

/// Errors raised while talking to the Facebook Graph API.
#[derive(Debug, Error)]
pub enum GraphError {
    /// Network-level failure: timeout, connection failure, undecodable body.
    #[error("Facebook API request failed: {0}")]
    Transport(String),

    /// Non-2xx response from the API.
    ///
    /// `message` is the fully composed description shown to callers.
    #[error("{message}")]
    Upstream {
        status: u16,
        code: Option<i64>,
        subcode: Option<i64>,
        message: String,
    },

    /// The request could not be built from the supplied arguments.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// No access token was configured.
    #[error(
        "Facebook access token must be provided via the MCP_FACEBOOK_ACCESS_TOKEN \
         or FACEBOOK_ACCESS_TOKEN environment variable"
    )]
    MissingAccessToken,
}

/// Envelope of a Graph API error response: `{"error": {...}}`.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    error_subcode: Option<i64>,
}

impl GraphError {
    /// Create a transport error.
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create an invalid query error.
    pub fn invalid_query(msg: impl Into<String>) -> Self {
        Self::InvalidQuery(msg.into())
    }

    /// Build an upstream error from a non-2xx status and its raw body.
    ///
    /// When the body carries a Graph error object the message reads
    /// `Facebook API Error <code>: <message> (Subcode: <subcode>)`. Otherwise
    /// the body is logged and a generic message naming the status is returned.
    pub fn from_error_body(status: u16, body: &str) -> Self {
        let generic = format!("Facebook API request failed: HTTP status {status}");

        match serde_json::from_str::<ErrorEnvelope>(body) {
            Ok(ErrorEnvelope { error }) => {
                let code = error
                    .code
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "Unknown".to_string());
                let mut message = format!(
                    "Facebook API Error {}: {}",
                    code,
                    error.message.as_deref().unwrap_or(&generic)
                );
                if let Some(subcode) = error.error_subcode {
                    message.push_str(&format!(" (Subcode: {subcode})"));
                }
                Self::Upstream {
                    status,
                    code: error.code,
                    subcode: error.error_subcode,
                    message,
                }
            }
            Err(e) => {
                warn!(
                    status,
                    parse_error = %e,
                    body = %truncate(body, MAX_LOGGED_BODY),
                    "Unparseable Graph API error body"
                );
                Self::Upstream {
                    status,
                    code: None,
                    subcode: None,
                    message: generic,
                }
            }
        }
    }

    /// Whether this error came from the API rather than the network.
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::Upstream { .. })
    }
}

impl From<reqwest::Error> for GraphError {
    fn from(e: reqwest::Error) -> Self {
        // The request URL carries the access token.
        let e = e.without_url();
        if e.is_timeout() {
            Self::Transport(format!("request timed out ({e})"))
        } else if e.is_connect() {
            Self::Transport(format!("connection failed ({e})"))
        } else if e.is_decode() {
            Self::Transport(format!("invalid response body ({e})"))
        } else {
            Self::Transport(e.to_string())
        }
    }
}

fn truncate(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
