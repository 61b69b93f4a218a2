use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Address-space snapshot for a subnet (or the totals of a report).
///
/// The server sends the percentage as a decimal string (`"42.19"`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utilization {
    #[serde(rename = "totalIPs", default)]
    pub total_ips: u64,
    #[serde(rename = "usedIPs", default)]
    pub used_ips: u64,
    #[serde(rename = "reservedIPs", default)]
    pub reserved_ips: u64,
    #[serde(rename = "availableIPs", default)]
    pub available_ips: u64,
    #[serde(rename = "utilizationPercentage", default)]
    pub utilization_percentage: String,
}

impl Utilization {
    /// Parsed percentage, `None` if the server sent something unparseable.
    pub fn percentage(&self) -> Option<f64> {
        self.utilization_percentage.trim().parse().ok()
    }
}

/// Subnet — from `GET /subnets` and `GET /subnets/{id}`.
///
/// List responses usually leave `utilization` out; detail responses carry it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subnet {
    pub id: String,
    pub network_address: String,
    pub subnet_mask: u8,
    pub cidr: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_version: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vlan_id: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_subnet_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utilization: Option<Utilization>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Embedded `{ id, cidr }` reference carried by IPs and reservations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubnetRef {
    pub id: String,
    pub cidr: String,
}

/// Body for `POST /subnets`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubnet {
    pub network_address: String,
    pub subnet_mask: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vlan_id: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_subnet_id: Option<String>,
}

impl CreateSubnet {
    pub fn new(network_address: impl Into<String>, subnet_mask: u8) -> Self {
        Self {
            network_address: network_address.into(),
            subnet_mask,
            description: None,
            vlan_id: None,
            location: None,
            parent_subnet_id: None,
        }
    }
}

/// Body for `PUT /subnets/{id}`. Only the fields that are set are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSubnet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subnet_mask: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vlan_id: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_subnet_id: Option<String>,
}

impl UpdateSubnet {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
