// ── Core error types ──
//
// Session-level failures on top of the wire errors from ipam-api. Wire
// errors pass through untouched so callers can still match on timeouts,
// unreachable servers and server messages.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    /// The server refused the email/password pair.
    #[error("Invalid credentials: {message}")]
    InvalidCredentials { message: String },

    /// The server accepted the login but sent no session back.
    #[error("Login failed: {message}")]
    LoginFailed { message: String },

    #[error("Not authenticated: run `ipam login` first")]
    NotAuthenticated,

    /// The persisted token could not be read, written or removed.
    #[error("Token store error: {message}")]
    TokenStore { message: String },

    #[error(transparent)]
    Api(#[from] ipam_api::Error),
}

impl CoreError {
    pub fn is_auth_rejected(&self) -> bool {
        match self {
            Self::InvalidCredentials { .. } | Self::NotAuthenticated => true,
            Self::Api(e) => e.is_auth_rejected(),
            _ => false,
        }
    }

    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Api(e) if e.is_transient())
    }

    pub fn token_store(err: impl std::fmt::Display) -> Self {
        Self::TokenStore {
            message: err.to_string(),
        }
    }
}
