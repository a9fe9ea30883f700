// Adopted network hardware: access points, switches, gateways.
//
// `stat/device` returns one flat object per device. The component
// records below group those fields by concern and are flattened back
// into the parent on (de)serialization.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

use super::common::{NetworkMembership, SystemStats, TrafficStats, timestamp};
use super::enums::{DeviceType, LedOverride, PoeMode};
use super::system::SystemHealth;
use crate::validation::{
    ResponseModel, normalize_mac, normalize_mac_opt, validate_http_url, validate_ip,
    validate_ip_list, validate_mac, validate_mac_list, validate_version,
};

// ── Ports ───────────────────────────────────────────────────────────

/// Per-port counters and configuration of a switch or gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct PortStats {
    #[validate(range(min = 1))]
    pub port_idx: i32,
    pub name: String,
    /// Media type, e.g. `GE` or `SFP+`.
    pub media: String,
    pub port_poe: bool,
    pub speed: u32,
    pub up: bool,
    pub is_uplink: bool,
    #[validate(custom(function = "validate_mac"))]
    pub mac: String,
    pub rx_errors: u64,
    pub tx_errors: u64,
    #[serde(rename = "type")]
    pub port_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poe_power: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poe_mode: Option<PoeMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poe_enable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_ip"))]
    pub ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ifname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autoneg: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_duplex: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isolation: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub native_networkconf_id: Option<String>,

    // SFP module
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sfp_vendor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sfp_part: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sfp_serial: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sfp_temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0))]
    pub sfp_voltage: Option<f64>,
    /// dBm
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(exclusive_max = 0.0))]
    pub sfp_rxpower: Option<f64>,
    /// dBm
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(exclusive_max = 0.0))]
    pub sfp_txpower: Option<f64>,

    // Storm control, percent of line rate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stormctrl_bcast_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0, max = 100))]
    pub stormctrl_bcast_rate: Option<i16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stormctrl_mcast_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0, max = 100))]
    pub stormctrl_mcast_rate: Option<i16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stormctrl_ucast_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0, max = 100))]
    pub stormctrl_ucast_rate: Option<i16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port_security_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[validate(custom(function = "validate_mac_list"))]
    pub port_security_mac_address: Vec<String>,

    #[serde(flatten)]
    #[validate(nested)]
    pub stats: TrafficStats,
    #[serde(flatten)]
    #[validate(nested)]
    pub network: NetworkMembership,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ResponseModel for PortStats {
    const NAME: &'static str = "PortStats";

    fn normalize(&mut self) {
        self.mac = normalize_mac(&self.mac);
        for mac in &mut self.port_security_mac_address {
            *mac = normalize_mac(mac);
        }
    }
}

// ── Device components ───────────────────────────────────────────────

/// Addressing and uplink information.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct DeviceNetwork {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_mac"))]
    pub gateway_mac: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[validate(custom(function = "validate_ip_list"))]
    pub ipv6: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_http_url"))]
    pub inform_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_ip"))]
    pub inform_ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_network: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ethernet_table: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uplink: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uplink_table: Option<Vec<Value>>,
}

/// Radios and attached stations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct DeviceWireless {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radio_table: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vap_table: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_sta: Option<u32>,
    #[serde(rename = "user-num_sta", default, skip_serializing_if = "Option::is_none")]
    pub user_num_sta: Option<u32>,
    #[serde(rename = "guest-num_sta", default, skip_serializing_if = "Option::is_none")]
    pub guest_num_sta: Option<u32>,
}

/// Adoption secrets and fingerprints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct DeviceSecurity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locating: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_fingerprint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_has_ssh_hostkey: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_ssh_hostkey: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_aes_gcm: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_inform_authkey: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guest_token: Option<String>,
}

/// Lifecycle state and hardware identity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct DeviceSystem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adopted: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_code: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upgradable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unsupported: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unsupported_reason: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discovered_via: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub led_override: Option<LedOverride>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hw_caps: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub board_rev: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kernel_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub architecture: Option<String>,
}

// ── Device ──────────────────────────────────────────────────────────

/// A UniFi network device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Device {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[validate(custom(function = "validate_mac"))]
    pub mac: String,
    #[serde(rename = "type")]
    pub device_type: DeviceType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Firmware version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_version"))]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_version"))]
    pub required_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_ip"))]
    pub ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    /// Seconds since boot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0))]
    pub uptime: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_seen: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_available: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[validate(nested)]
    pub port_table: Vec<PortStats>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[validate(nested)]
    pub health: Vec<SystemHealth>,

    #[serde(flatten)]
    #[validate(nested)]
    pub network: DeviceNetwork,
    #[serde(flatten)]
    #[validate(nested)]
    pub wireless: DeviceWireless,
    #[serde(flatten)]
    #[validate(nested)]
    pub security: DeviceSecurity,
    #[serde(flatten)]
    #[validate(nested)]
    pub system: DeviceSystem,
    #[serde(flatten)]
    #[validate(nested)]
    pub usage: SystemStats,
    #[serde(flatten)]
    #[validate(nested)]
    pub stats: TrafficStats,
    /// Fields this crate does not model, kept for round-tripping.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ResponseModel for Device {
    const NAME: &'static str = "Device";

    fn normalize(&mut self) {
        self.mac = normalize_mac(&self.mac);
        normalize_mac_opt(&mut self.network.gateway_mac);
        self.port_table.iter_mut().for_each(ResponseModel::normalize);
    }
}

impl Device {
    /// Name if set, otherwise the MAC.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.mac)
    }

    pub fn last_seen_at(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        timestamp(self.last_seen)
    }

    pub fn is_adopted(&self) -> bool {
        self.system.adopted.unwrap_or(false)
    }
}
