//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and wire errors into user-facing errors with
//! actionable help text and a stable exit code.

use miette::Diagnostic;
use thiserror::Error;

use ipam_config::ConfigError;
use ipam_core::CoreError;
use ipam_core::api::Error as ApiError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const PERMISSION: i32 = 5;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not connect to the IPAM server at {url}")]
    #[diagnostic(
        code(ipam::connection_failed),
        help(
            "Check that the server is running and the URL is right.\n\
             Set it with: ipam config set-url <URL>  (or --api-url / IPAM_API_URL)"
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("{message}")]
    #[diagnostic(
        code(ipam::timeout),
        help("Increase the timeout with --timeout or check server responsiveness.")
    )]
    Timeout { message: String },

    // ── Authentication ───────────────────────────────────────────────

    #[error("{message}")]
    #[diagnostic(code(ipam::auth_failed), help("Log in again with: ipam login"))]
    AuthFailed { message: String },

    #[error("Not logged in")]
    #[diagnostic(code(ipam::not_authenticated), help("Log in with: ipam login"))]
    NotAuthenticated,

    #[error("Permission denied: {message}")]
    #[diagnostic(
        code(ipam::forbidden),
        help("This operation needs a role your account does not have.")
    )]
    Forbidden { message: String },

    // ── Resources ────────────────────────────────────────────────────

    #[error("Not found: {message}")]
    #[diagnostic(code(ipam::not_found))]
    NotFound { message: String },

    #[error("Conflict: {message}")]
    #[diagnostic(code(ipam::conflict))]
    Conflict { message: String },

    // ── API ──────────────────────────────────────────────────────────

    #[error("API error (HTTP {status}): {message}")]
    #[diagnostic(code(ipam::api_error))]
    ApiError { status: u16, message: String },

    #[error("Unexpected response from server: {message}")]
    #[diagnostic(
        code(ipam::bad_response),
        help("The server and this client may be on incompatible versions. Re-run with -vv for details.")
    )]
    BadResponse { message: String },

    #[error("{0}")]
    #[diagnostic(code(ipam::transport))]
    Transport(String),

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(ipam::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error(transparent)]
    #[diagnostic(
        code(ipam::config),
        help("Inspect the config with: ipam config show")
    )]
    Config(ConfigError),

    #[error("Token store error: {message}")]
    #[diagnostic(
        code(ipam::token_store),
        help("Set token_store = \"file\" in the config if no system keyring is available.")
    )]
    TokenStore { message: String },

    // ── Interactive ──────────────────────────────────────────────────

    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(ipam::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render output: {0}")]
    #[diagnostic(code(ipam::render))]
    Render(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::NotAuthenticated => exit_code::AUTH,
            Self::Forbidden { .. } => exit_code::PERMISSION,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Conflict { .. } => exit_code::CONFLICT,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    pub fn validation(field: &str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            other => CliError::Config(other),
        }
    }
}

// ── ApiError → CliError mapping ──────────────────────────────────────

impl From<ApiError> for CliError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Unreachable { url, source } => CliError::ConnectionFailed {
                url,
                source: Box::new(source),
            },
            err @ ApiError::Timeout { .. } => CliError::Timeout {
                message: err.to_string(),
            },
            ApiError::Unauthorized { message } => CliError::AuthFailed { message },
            ApiError::Api { status, message } => match status {
                403 => CliError::Forbidden { message },
                404 => CliError::NotFound { message },
                409 => CliError::Conflict { message },
                _ => CliError::ApiError { status, message },
            },
            ApiError::Deserialization { message, .. } => CliError::BadResponse { message },
            ApiError::EmptyResponse => CliError::BadResponse {
                message: "the server sent no data".into(),
            },
            ApiError::InvalidUrl(e) => CliError::validation("api_url", e.to_string()),
            other => CliError::Transport(other.to_string()),
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidCredentials { message } | CoreError::LoginFailed { message } => {
                CliError::AuthFailed { message }
            }
            CoreError::NotAuthenticated => CliError::NotAuthenticated,
            CoreError::TokenStore { message } => CliError::TokenStore { message },
            CoreError::Api(e) => e.into(),
        }
    }
}
