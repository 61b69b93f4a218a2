//! Shared configuration for IPAM tools.
//!
//! TOML config file + `IPAM_` environment layering, translation to
//! `ipam_core::ClientConfig`, and the durable session token stores
//! (plain file or OS keyring).

mod token_store;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use ipam_core::{ClientConfig, DEFAULT_API_URL, MemoryTokenStore, TlsVerification, TokenStore};

pub use token_store::{FileTokenStore, KeyringTokenStore, TOKEN_ACCOUNT, TOKEN_SERVICE};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// API base URL including the path prefix (e.g. "https://ipam.example.net/api").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Path to an extra CA certificate (PEM).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<PathBuf>,

    /// Where the session token is kept between runs.
    #[serde(default)]
    pub token_store: TokenStoreKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default)]
    pub insecure: bool,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
            insecure: false,
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenStoreKind {
    /// OS keyring (Secret Service, Keychain, Credential Manager).
    #[default]
    Keyring,
    /// `session-token` file in the platform data directory.
    File,
    /// Not persisted: every run starts logged out.
    Memory,
}

impl Config {
    /// The base URL in effect, falling back to the built-in default.
    pub fn api_url(&self) -> &str {
        self.api_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or(DEFAULT_API_URL)
    }

    /// Build the runtime `ClientConfig`. Validates the URL and timeout.
    pub fn to_client_config(&self) -> Result<ClientConfig, ConfigError> {
        let api_url = self.api_url();
        let parsed = url::Url::parse(api_url).map_err(|e| ConfigError::Validation {
            field: "api_url".into(),
            reason: format!("{e}: {api_url}"),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::Validation {
                field: "api_url".into(),
                reason: format!("expected an http(s) URL, got '{api_url}'"),
            });
        }

        if self.defaults.timeout == 0 {
            return Err(ConfigError::Validation {
                field: "timeout".into(),
                reason: "must be at least 1 second".into(),
            });
        }

        let tls = if self.defaults.insecure {
            TlsVerification::DangerAcceptInvalid
        } else if let Some(ref ca_path) = self.ca_cert {
            TlsVerification::CustomCa(ca_path.clone())
        } else {
            TlsVerification::SystemDefaults
        };

        Ok(ClientConfig::new(api_url)
            .with_tls(tls)
            .with_timeout(Duration::from_secs(self.defaults.timeout)))
    }
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "ipam", "ipam")
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || home_fallback(".config").join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Default location of the file token store.
pub fn token_path() -> PathBuf {
    project_dirs().map_or_else(
        || home_fallback(".local/share").join(TOKEN_ACCOUNT),
        |dirs| dirs.data_dir().join(TOKEN_ACCOUNT),
    )
}

fn home_fallback(base: &str) -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(base);
    p.push("ipam");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from a specific file, layered as defaults → file → `IPAM_*` env.
///
/// Nested keys use a double underscore: `IPAM_DEFAULTS__TIMEOUT=5`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("IPAM_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load only what is written in the file (plus defaults), ignoring the
/// environment. Use this before editing and saving the file.
pub fn load_config_file(path: &Path) -> Result<Config, ConfigError> {
    let config: Config = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to `path`.
pub fn save_config_to(path: &Path, cfg: &Config) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Token store selection ───────────────────────────────────────────

/// The token store the config asks for.
pub fn token_store(cfg: &Config) -> Arc<dyn TokenStore> {
    match cfg.token_store {
        TokenStoreKind::Keyring => Arc::new(KeyringTokenStore::default()),
        TokenStoreKind::File => Arc::new(FileTokenStore::new(token_path())),
        TokenStoreKind::Memory => Arc::new(MemoryTokenStore::new()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn default_config_targets_local_server() {
        let cfg = Config::default();
        assert_eq!(cfg.api_url(), "http://localhost:3000/api");
        let client = cfg.to_client_config().unwrap();
        assert_eq!(client.timeout, Duration::from_secs(30));
        assert_eq!(client.tls, TlsVerification::SystemDefaults);
    }

    #[test]
    fn insecure_wins_over_ca_cert() {
        let cfg = Config {
            ca_cert: Some(PathBuf::from("/etc/ipam/ca.pem")),
            defaults: Defaults {
                insecure: true,
                ..Defaults::default()
            },
            ..Config::default()
        };
        let client = cfg.to_client_config().unwrap();
        assert_eq!(client.tls, TlsVerification::DangerAcceptInvalid);
    }

    #[test]
    fn invalid_url_is_rejected() {
        let cfg = Config {
            api_url: Some("ftp://ipam.example.net".into()),
            ..Config::default()
        };
        assert!(matches!(
            cfg.to_client_config(),
            Err(ConfigError::Validation { ref field, .. }) if field == "api_url"
        ));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let cfg = Config {
            defaults: Defaults {
                timeout: 0,
                ..Defaults::default()
            },
            ..Config::default()
        };
        assert!(cfg.to_client_config().is_err());
    }
}
