//! Shared helpers for command handlers.

use std::io::{self, IsTerminal};
use std::net::IpAddr;

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};

use ipam_core::api::{ApiResponse, IpStatus, MessageResponse, User, UserRole};
use ipam_core::{CoreError, Ipam};

use crate::cli::{IpStatusArg, RoleArg};
use crate::error::CliError;

impl From<IpStatusArg> for IpStatus {
    fn from(arg: IpStatusArg) -> Self {
        match arg {
            IpStatusArg::Available => Self::Available,
            IpStatusArg::Reserved => Self::Reserved,
            IpStatusArg::Assigned => Self::Assigned,
            IpStatusArg::Dhcp => Self::Dhcp,
            IpStatusArg::Static => Self::Static,
        }
    }
}

impl From<RoleArg> for UserRole {
    fn from(arg: RoleArg) -> Self {
        match arg {
            RoleArg::Admin => Self::Admin,
            RoleArg::User => Self::User,
            RoleArg::Readonly => Self::Readonly,
        }
    }
}

/// Revalidate the stored session, failing with `NotAuthenticated` when
/// there is none (or the server no longer accepts it).
pub async fn require_session(ipam: &Ipam) -> Result<User, CliError> {
    match ipam.restore_session().await? {
        Some(user) => Ok(user),
        None => Err(CoreError::NotAuthenticated.into()),
    }
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: message.into(),
        });
    }
    dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(prompt_err)
}

/// Map a dialoguer / interactive I/O failure into CliError.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::validation("interactive", format!("prompt failed: {e}"))
}

pub fn prompt_text(prompt: &str) -> Result<String, CliError> {
    let value: String = dialoguer::Input::new()
        .with_prompt(prompt)
        .interact_text()
        .map_err(prompt_err)?;
    Ok(value.trim().to_owned())
}

/// Read a password without echo; `preset` wins when given (`--password`).
pub fn password(prompt: &str, preset: Option<String>) -> Result<SecretString, CliError> {
    let raw = match preset {
        Some(p) => p,
        None => rpassword::prompt_password(prompt).map_err(prompt_err)?,
    };
    if raw.is_empty() {
        return Err(CliError::validation("password", "cannot be empty"));
    }
    Ok(SecretString::from(raw))
}

/// Prompt for a new password twice; `preset` skips the prompts.
pub fn new_password(preset: Option<String>) -> Result<SecretString, CliError> {
    if preset.is_some() {
        return password("", preset);
    }
    let first = password("New password: ", None)?;
    let second = password("Repeat password: ", None)?;
    if first.expose_secret() != second.expose_secret() {
        return Err(CliError::validation("password", "the two entries do not match"));
    }
    Ok(first)
}

/// Split `10.20.0.0/24` into network address and prefix length.
pub fn parse_cidr(cidr: &str) -> Result<(String, u8), CliError> {
    let invalid = |reason: &str| CliError::validation("cidr", format!("{reason}: '{cidr}'"));

    let (network, prefix) = cidr
        .trim()
        .split_once('/')
        .ok_or_else(|| invalid("expected ADDRESS/PREFIX"))?;
    let addr: IpAddr = network.parse().map_err(|_| invalid("not an IP address"))?;
    let prefix: u8 = prefix.parse().map_err(|_| invalid("prefix is not a number"))?;
    let max = if addr.is_ipv4() { 32 } else { 128 };
    if prefix > max {
        return Err(invalid(&format!("prefix must be at most {max}")));
    }
    Ok((network.to_owned(), prefix))
}

/// Parse an RFC 3339 timestamp given on the command line.
pub fn parse_timestamp(field: &str, value: &str) -> Result<DateTime<Utc>, CliError> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| CliError::validation(field, format!("{e} (expected e.g. 2026-12-31T00:00:00Z)")))
}

/// The server's confirmation text for a delete, or `fallback`.
pub fn message_or(resp: &ApiResponse<MessageResponse>, fallback: &str) -> String {
    resp.data()
        .map(|m| m.message.clone())
        .or_else(|| resp.message.clone())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| fallback.to_owned())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn cidr_is_split_and_validated() {
        assert_eq!(parse_cidr("10.20.0.0/24").unwrap(), ("10.20.0.0".into(), 24));
        assert_eq!(parse_cidr("2001:db8::/48").unwrap(), ("2001:db8::".into(), 48));
        assert!(parse_cidr("10.20.0.0").is_err());
        assert!(parse_cidr("10.20.0.0/33").is_err());
        assert!(parse_cidr("core/24").is_err());
    }

    #[test]
    fn timestamps_must_be_rfc3339() {
        let t = parse_timestamp("expires", "2026-12-31T12:00:00+01:00").unwrap();
        assert_eq!(t.to_rfc3339(), "2026-12-31T11:00:00+00:00");
        assert!(parse_timestamp("expires", "next week").is_err());
    }

    #[test]
    fn delete_message_prefers_payload() {
        let resp = ApiResponse::new(MessageResponse {
            message: "Subnet deleted successfully".into(),
        });
        assert_eq!(message_or(&resp, "Deleted"), "Subnet deleted successfully");
        assert_eq!(message_or(&ApiResponse::empty(), "Deleted"), "Deleted");
    }

    #[test]
    fn cli_enums_map_to_wire_enums() {
        assert_eq!(IpStatus::from(IpStatusArg::Dhcp).to_string(), "DHCP");
        assert_eq!(UserRole::from(RoleArg::Readonly).to_string(), "readonly");
    }
}
