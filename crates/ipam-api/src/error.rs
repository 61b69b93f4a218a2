use std::time::Duration;

use thiserror::Error;

/// Top-level error type for the `ipam-api` crate.
///
/// Every failure a request can end in: transport (timeout, unreachable),
/// authorization rejection, structured server errors, and decoding.
/// Resource clients never catch these; they reach the caller unchanged.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// The server rejected the bearer token or credentials (HTTP 401).
    #[error("Authorization rejected: {message}")]
    Unauthorized { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// No response arrived before the deadline; the request was aborted.
    #[error(
        "Request timeout: the server took longer than {} to respond",
        humantime::format_duration(*timeout)
    )]
    Timeout { timeout: Duration },

    /// The server could not be reached at all (connection refused, DNS).
    #[error("Network error: unable to connect to {url}")]
    Unreachable {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Any other HTTP transport failure.
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup error (bad CA file, client builder failure).
    #[error("TLS error: {0}")]
    Tls(String),

    // ── API ─────────────────────────────────────────────────────────
    /// Structured failure from the server: a non-2xx status, or a 2xx
    /// response whose envelope says `success: false`.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// The envelope decoded but its `data` did not match the expected type.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// The request body could not be serialized to JSON.
    #[error("Failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// A bodiless success was asked for its payload.
    #[error("Server returned an empty response")]
    EmptyResponse,
}

impl Error {
    /// Returns `true` if the server rejected the credential and the
    /// session should be torn down.
    pub fn is_auth_rejected(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Returns `true` if re-issuing the same request might succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::Unreachable { .. } => true,
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Returns `true` if the server reported a conflicting resource.
    pub fn is_conflict(&self) -> bool {
        self.status() == Some(409)
    }

    /// HTTP status attached to the failure, when there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Unauthorized { .. } => Some(401),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_message_is_human_readable() {
        let err = Error::Timeout {
            timeout: Duration::from_secs(30),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("Request timeout"), "got: {msg}");
        assert!(msg.contains("30s"), "got: {msg}");
        assert!(err.is_transient());
        assert!(!err.is_auth_rejected());
    }

    #[test]
    fn api_error_classification() {
        let not_found = Error::Api {
            status: 404,
            message: "Subnet not found".into(),
        };
        assert!(not_found.is_not_found());
        assert!(!not_found.is_transient());
        assert_eq!(
            not_found.to_string(),
            "API error (HTTP 404): Subnet not found"
        );

        let conflict = Error::Api {
            status: 409,
            message: "IP already assigned".into(),
        };
        assert!(conflict.is_conflict());
    }

    #[test]
    fn unauthorized_reports_status() {
        let err = Error::Unauthorized {
            message: "Invalid token".into(),
        };
        assert!(err.is_auth_rejected());
        assert_eq!(err.status(), Some(401));
    }
}
