//! Wire types for the IPAM server.
//!
//! Field names are camelCase on the wire. Response types tolerate unknown
//! fields and most keep them in `extra`, so re-serializing is lossless.
//! Request types omit `None` fields entirely instead of sending `null`.

mod audit;
mod ip_address;
mod report;
mod reservation;
mod subnet;
mod user;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub use audit::{AuditIpRef, AuditLog, CidrRef};
pub use ip_address::{AssignIpAddress, IpAddress, IpHistory, IpStatus, UpdateIpAddress};
pub use report::{StatusReport, UtilizationItem, UtilizationReport};
pub use reservation::{CreateReservation, Reservation, UpdateReservation};
pub use subnet::{CreateSubnet, Subnet, SubnetRef, UpdateSubnet, Utilization};
pub use user::{
    ChangePassword, CreateUser, LoginResponse, Registration, UpdateProfile, UpdateUser, User,
    UserRole,
};

/// Bare acknowledgement, e.g. `{ "message": "Subnet deleted successfully" }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

// ── Secret helpers ───────────────────────────────────────────────────

pub(crate) fn expose_secret<S: Serializer>(
    secret: &SecretString,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

#[allow(clippy::ref_option)]
pub(crate) fn expose_optional_secret<S: Serializer>(
    secret: &Option<SecretString>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match secret {
        Some(secret) => serializer.serialize_some(secret.expose_secret()),
        None => serializer.serialize_none(),
    }
}

pub(crate) fn secret_from_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<SecretString, D::Error> {
    String::deserialize(deserializer).map(SecretString::from)
}
