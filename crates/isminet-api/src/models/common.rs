// Field groups shared by several records. Each is flattened into its
// parent, so on the wire the fields sit at the parent's top level.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::validation::validate_ip;

/// Traffic counters and rates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct TrafficStats {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_bytes: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rx_bytes: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_packets: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rx_packets: Option<u64>,
    #[serde(rename = "bytes-r", default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0))]
    pub bytes_r: Option<f64>,
    #[serde(rename = "tx_bytes-r", default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0))]
    pub tx_bytes_r: Option<f64>,
    #[serde(rename = "rx_bytes-r", default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0))]
    pub rx_bytes_r: Option<f64>,
    /// Experience score, percent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0, max = 100))]
    pub satisfaction: Option<i32>,
}

/// Network membership of a port or station.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct NetworkMembership {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1))]
    pub network_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1))]
    pub network_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_ip"))]
    pub netmask: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_guest: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, max = 4095))]
    pub vlan: Option<i32>,
}

/// Host resource usage, as reported by gateways, switches, and APs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct SystemStats {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, max = 100.0))]
    pub cpu_usage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, max = 100.0))]
    pub mem_usage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0))]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0))]
    pub loadavg_1: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0))]
    pub loadavg_5: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0))]
    pub loadavg_15: Option<f64>,
}

/// Convert an epoch-seconds field for display.
pub fn timestamp(secs: Option<i64>) -> Option<chrono::DateTime<chrono::Utc>> {
    secs.and_then(|s| chrono::DateTime::from_timestamp(s, 0))
}
