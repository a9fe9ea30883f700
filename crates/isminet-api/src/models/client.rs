// Stations connected to the network, wired or wireless.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::{Validate, ValidationError};

use super::common::{NetworkMembership, TrafficStats, timestamp};
use super::enums::{RadioProto, RadioType};
use crate::validation::{
    ResponseModel, normalize_mac, normalize_mac_opt, rule, validate_ip, validate_ip_list,
    validate_mac,
};

const CHANNEL_WIDTHS: [u16; 5] = [20, 40, 80, 160, 320];

// ── WiFi ────────────────────────────────────────────────────────────

/// Radio link details of a wireless station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "check_wifi_stats"))]
pub struct WifiStats {
    #[validate(custom(function = "validate_mac"))]
    pub ap_mac: String,
    pub radio: RadioType,
    pub radio_proto: RadioProto,
    pub essid: String,
    #[validate(custom(function = "validate_mac"))]
    pub bssid: String,
    /// dBm
    #[validate(range(exclusive_max = 0))]
    pub signal: i32,
    /// dBm
    #[validate(range(exclusive_max = 0))]
    pub noise: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<u16>,
    /// MHz
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_width: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1))]
    pub radio_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, max = 8))]
    pub nss: Option<i16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0, max = 11))]
    pub tx_mcs: Option<i16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0, max = 1000))]
    pub ccq: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_rate: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rx_rate: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_power: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_retries: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wifi_tx_attempts: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wifi_tx_dropped: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, max = 100.0))]
    pub wifi_tx_retries_percentage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_retry_burst_count: Option<u64>,
    /// Seconds idle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idletime: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub powersave_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_11r: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_mlo: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorized: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qos_policy_applied: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn check_wifi_stats(stats: &WifiStats) -> Result<(), ValidationError> {
    if let Some(channel) = stats.channel {
        stats
            .radio
            .check_channel(channel)
            .map_err(|message| rule("channel", message))?;
    }
    match stats.channel_width {
        Some(width) if !CHANNEL_WIDTHS.contains(&width) => Err(rule(
            "channel_width",
            format!("channel width {width} MHz is not one of 20, 40, 80, 160, 320"),
        )),
        _ => Ok(()),
    }
}

impl ResponseModel for WifiStats {
    const NAME: &'static str = "WifiStats";

    fn normalize(&mut self) {
        self.ap_mac = normalize_mac(&self.ap_mac);
        self.bssid = normalize_mac(&self.bssid);
    }
}

// ── Client components ───────────────────────────────────────────────

/// Addressing of a station.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct ClientNetwork {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_fixedip: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_ip"))]
    pub fixed_ip: Option<String>,
    /// Epoch seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dhcpend_time: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wired_rate_mbps: Option<u32>,
}

/// Where the controller has seen the station, and what it thinks it is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct ClientTracking {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sw_depth: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uptime_by_uap: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uptime_by_usw: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uptime_by_ugw: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_seen_by_uap: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_seen_by_usw: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_seen_by_ugw: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_reachable_by_gw: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dev_cat: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dev_family: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dev_vendor: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os_name: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os_class: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fingerprint_source: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fingerprint_engine_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub satisfaction_avg: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anomalies: Option<i64>,
}

/// Guest portal state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct ClientGuest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_guest_by_uap: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_guest_by_usw: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_guest_by_ugw: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorized: Option<bool>,
    /// Epoch seconds at which guest authorization lapses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct ClientDns {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname_source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_dns_record_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_dns_record: Option<String>,
}

// ── Client ──────────────────────────────────────────────────────────

/// A station known to the controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "check_client"))]
pub struct Client {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[validate(custom(function = "validate_mac"))]
    pub mac: String,
    pub hostname: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_ip"))]
    pub ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_ip"))]
    pub last_ip: Option<String>,
    pub is_wired: bool,
    /// Epoch seconds.
    pub first_seen: i64,
    /// Epoch seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_seen: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oui: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub noted: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocked: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0, max = 100))]
    pub confidence: Option<i16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_mac"))]
    pub gw_mac: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0, max = 4095))]
    pub gw_vlan: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1))]
    pub sw_port: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_mac"))]
    pub sw_mac: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[validate(custom(function = "validate_ip_list"))]
    pub ipv6_addresses: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(nested)]
    pub wifi_stats: Option<WifiStats>,

    #[serde(flatten)]
    #[validate(nested)]
    pub network: ClientNetwork,
    #[serde(flatten)]
    #[validate(nested)]
    pub membership: NetworkMembership,
    #[serde(flatten)]
    #[validate(nested)]
    pub tracking: ClientTracking,
    #[serde(flatten)]
    #[validate(nested)]
    pub guest: ClientGuest,
    #[serde(flatten)]
    #[validate(nested)]
    pub dns: ClientDns,
    #[serde(flatten)]
    #[validate(nested)]
    pub stats: TrafficStats,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn check_client(client: &Client) -> Result<(), ValidationError> {
    match client.last_seen {
        Some(last) if client.first_seen > last => Err(rule(
            "timestamp_order",
            format!(
                "first_seen ({}) is after last_seen ({last})",
                client.first_seen
            ),
        )),
        _ => Ok(()),
    }
}

impl ResponseModel for Client {
    const NAME: &'static str = "Client";

    fn normalize(&mut self) {
        self.mac = normalize_mac(&self.mac);
        normalize_mac_opt(&mut self.gw_mac);
        normalize_mac_opt(&mut self.sw_mac);
        if let Some(wifi) = &mut self.wifi_stats {
            wifi.normalize();
        }
    }
}

impl Client {
    /// Name if set, then hostname.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.hostname)
    }

    pub fn is_guest(&self) -> bool {
        self.membership.is_guest.unwrap_or(false)
    }

    pub fn first_seen_at(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        timestamp(Some(self.first_seen))
    }

    pub fn last_seen_at(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        timestamp(self.last_seen)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::models::test_support::round_trip;

    fn wifi() -> Value {
        json!({
            "ap_mac": "00:11:22:33:44:55",
            "radio": "na",
            "radio_proto": "ax",
            "essid": "office",
            "bssid": "00:11:22:33:44:56",
            "signal": -55,
            "noise": -95,
            "channel": 36,
            "channel_width": 80,
            "nss": 2
        })
    }

    fn client() -> Value {
        json!({
            "_id": "60b1",
            "mac": "AA:BB:CC:DD:EE:FF",
            "hostname": "laptop",
            "ip": "192.168.1.100",
            "is_wired": false,
            "first_seen": 1_700_000_000,
            "last_seen": 1_700_003_600,
            "oui": "Apple",
            "network_name": "LAN",
            "vlan": 10,
            "is_guest": false,
            "use_fixedip": true,
            "fixed_ip": "192.168.1.100",
            "sw_port": 3,
            "wifi_stats": wifi(),
            "rx_bytes": 4096,
            "dev_cat": 1,
            "os_hint": "macos"
        })
    }

    #[test]
    fn round_trip_keeps_supplied_fields() {
        let mut expected = client();
        expected["mac"] = json!("aa:bb:cc:dd:ee:ff");
        let parsed: Client = round_trip(client(), &expected);
        assert_eq!(parsed.membership.vlan, Some(10));
        assert_eq!(parsed.network.use_fixedip, Some(true));
        assert_eq!(parsed.tracking.dev_cat, Some(1));
        assert_eq!(parsed.wifi_stats.as_ref().unwrap().radio, RadioType::Na);
    }

    #[test]
    fn extra_holds_only_unmodeled_keys() {
        let parsed = Client::from_value(client()).unwrap();
        assert_eq!(parsed.extra.keys().collect::<Vec<_>>(), ["os_hint"]);
        assert!(parsed.wifi_stats.unwrap().extra.is_empty());
    }

    #[test]
    fn membership_edit_is_serialized_once() {
        let mut parsed = Client::from_value(client()).unwrap();
        parsed.membership.vlan = Some(20);
        let text = serde_json::to_string(&parsed).unwrap();
        assert_eq!(text.matches("\"vlan\"").count(), 1);
        assert_eq!(text.matches("\"network_name\"").count(), 1);
        let back: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(back["vlan"], json!(20));
    }

    #[test]
    fn membership_violation_uses_wire_name() {
        let mut value = client();
        value["vlan"] = json!(5000);
        value["sw_port"] = json!(-1);
        let err = Client::from_value(value).unwrap_err();
        let found: Vec<(&str, &str)> = err
            .violations()
            .iter()
            .map(|v| (v.field.as_str(), v.code.as_str()))
            .collect();
        assert_eq!(found, [("sw_port", "range"), ("vlan", "range")]);
    }

    #[test]
    fn mac_normalization_is_idempotent() {
        let once = Client::from_value(client()).unwrap();
        assert_eq!(once.mac, "aa:bb:cc:dd:ee:ff");
        let twice = Client::from_value(serde_json::to_value(&once).unwrap()).unwrap();
        assert_eq!(twice, once);
    }

    #[test]
    fn first_seen_after_last_seen_fails() {
        let mut value = client();
        value["first_seen"] = json!(1_700_003_601);
        let err = Client::from_value(value).unwrap_err();
        let violation = &err.violations()[0];
        assert_eq!(violation.field, "$");
        assert_eq!(violation.code, "timestamp_order");
    }

    #[test]
    fn equal_timestamps_are_allowed() {
        let mut value = client();
        value["first_seen"] = value["last_seen"].clone();
        let parsed = Client::from_value(value).unwrap();
        assert_eq!(parsed.first_seen_at(), parsed.last_seen_at());
    }

    #[test]
    fn channel_must_match_radio_band() {
        for (radio, ok, bad) in [("ng", 14, 15), ("na", 165, 166), ("6e", 233, 234)] {
            let mut value = wifi();
            value["radio"] = json!(radio);
            value["channel"] = json!(ok);
            assert!(WifiStats::from_value(value.clone()).is_ok(), "{radio} {ok}");

            value["channel"] = json!(bad);
            let err = WifiStats::from_value(value).unwrap_err();
            assert_eq!(err.violations()[0].code, "channel", "{radio} {bad}");
        }
    }

    #[test]
    fn invalid_wifi_is_reported_under_its_path() {
        let mut value = client();
        value["wifi_stats"]["channel_width"] = json!(60);
        let err = Client::from_value(value).unwrap_err();
        assert_eq!(err.violations()[0].field, "wifi_stats");
        assert_eq!(err.violations()[0].code, "channel_width");
    }

    #[test]
    fn positive_signal_is_rejected() {
        let mut value = wifi();
        value["signal"] = json!(0);
        let err = WifiStats::from_value(value).unwrap_err();
        assert_eq!(err.violations()[0].field, "signal");
    }
}
