use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Utilization;

/// Per-subnet row of the utilization report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UtilizationItem {
    pub subnet_id: String,
    pub cidr: String,
    #[serde(flatten)]
    pub utilization: Utilization,
}

/// `GET /reports/utilization`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtilizationReport {
    #[serde(default)]
    pub subnets: Vec<UtilizationItem>,
    #[serde(default)]
    pub totals: Utilization,
}

/// `GET /reports/status`: address count per status name.
///
/// Keyed by the raw status string so statuses the client does not model
/// still show up.
pub type StatusReport = BTreeMap<String, u64>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn report_rows_flatten_utilization() {
        let report: UtilizationReport = serde_json::from_value(json!({
            "subnets": [{
                "subnetId": "sn-1",
                "cidr": "10.0.0.0/24",
                "totalIPs": 254,
                "usedIPs": 127,
                "reservedIPs": 0,
                "availableIPs": 127,
                "utilizationPercentage": "50.00"
            }],
            "totals": {
                "totalIPs": 254,
                "usedIPs": 127,
                "reservedIPs": 0,
                "availableIPs": 127,
                "utilizationPercentage": "50.00"
            }
        }))
        .unwrap();
        assert_eq!(report.subnets[0].utilization.used_ips, 127);
        assert_eq!(report.totals.utilization_percentage, "50.00");
    }
}
