// Radio and SSID configuration.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::{Validate, ValidationError};

use super::enums::{
    Encryption, MacFilterPolicy, PmfMode, RadioProto, RadioType, TxPowerMode, WlanSecurity,
    WpaMode,
};
use crate::validation::{ResponseModel, normalize_mac, rule, validate_mac_list};

const RADIO_WIDTHS: [u16; 4] = [20, 40, 80, 160];

/// One radio of an access point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "check_radio"))]
pub struct RadioSettings {
    pub name: String,
    pub enabled: bool,
    pub radio: RadioType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radio_proto: Option<RadioProto>,
    pub channel: u16,
    /// MHz
    pub channel_width: u16,
    /// dBm
    #[validate(range(min = 0, max = 30))]
    pub tx_power: i32,
    pub tx_power_mode: TxPowerMode,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn check_radio(radio: &RadioSettings) -> Result<(), ValidationError> {
    radio
        .radio
        .check_channel(radio.channel)
        .map_err(|message| rule("channel", message))?;
    if !RADIO_WIDTHS.contains(&radio.channel_width) {
        return Err(rule(
            "channel_width",
            format!(
                "channel width {} MHz is not one of 20, 40, 80, 160",
                radio.channel_width
            ),
        ));
    }
    let Some(proto) = radio.radio_proto else {
        return Ok(());
    };
    let supported = match radio.radio {
        RadioType::Ng => true,
        RadioType::Na => matches!(proto, RadioProto::Ac | RadioProto::Ax | RadioProto::Be),
        RadioType::SixE => matches!(proto, RadioProto::Ax | RadioProto::Be),
    };
    if supported {
        Ok(())
    } else {
        Err(rule(
            "radio_proto",
            format!("{} radios do not support {proto}", radio.radio.band()),
        ))
    }
}

impl ResponseModel for RadioSettings {
    const NAME: &'static str = "RadioSettings";
}

/// An SSID and its security settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "check_profile"))]
pub struct NetworkProfile {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[validate(length(min = 1, max = 32))]
    pub ssid: String,
    pub enabled: bool,
    pub is_guest: bool,
    pub security: WlanSecurity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wpa_mode: Option<WpaMode>,
    pub encryption: Encryption,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vlan_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, max = 4094))]
    pub vlan_id: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hide_ssid: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_private: Option<bool>,
    /// Seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_rekey: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dtim_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, max = 255))]
    pub dtim_period: Option<i16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mac_filter_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[validate(custom(function = "validate_mac_list"))]
    pub mac_filter_list: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mac_filter_policy: Option<MacFilterPolicy>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub radius_servers: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn check_profile(profile: &NetworkProfile) -> Result<(), ValidationError> {
    if profile.vlan_enabled == Some(true) && profile.vlan_id.is_none() {
        return Err(rule(
            "vlan_id_required",
            "vlan_id must be set when VLAN tagging is enabled",
        ));
    }
    if profile.security != WlanSecurity::Open && profile.wpa_mode.is_none() {
        return Err(rule(
            "wpa_mode_required",
            format!("wpa_mode must be set for {} security", profile.security),
        ));
    }
    Ok(())
}

impl ResponseModel for NetworkProfile {
    const NAME: &'static str = "NetworkProfile";

    fn normalize(&mut self) {
        for mac in &mut self.mac_filter_list {
            *mac = normalize_mac(mac);
        }
    }
}

/// Wireless settings of one access point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct WlanConfiguration {
    #[validate(nested)]
    pub radio_table: Vec<RadioSettings>,
    #[validate(nested)]
    pub network_profiles: Vec<NetworkProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pmf_mode: Option<PmfMode>,
    /// dBm
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = -100, max = 0))]
    pub minimum_rssi: Option<i32>,
    /// Kbps
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_uplink: Option<u32>,
    /// Kbps
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_downlink: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1))]
    pub max_clients: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ResponseModel for WlanConfiguration {
    const NAME: &'static str = "WlanConfiguration";

    fn normalize(&mut self) {
        self.network_profiles
            .iter_mut()
            .for_each(ResponseModel::normalize);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::models::test_support::round_trip;

    fn radio(band: &str, channel: u16) -> Value {
        json!({
            "name": "wifi0",
            "enabled": true,
            "radio": band,
            "channel": channel,
            "channel_width": 40,
            "tx_power": 20,
            "tx_power_mode": "auto"
        })
    }

    fn profile() -> Value {
        json!({
            "name": "Office",
            "ssid": "office",
            "enabled": true,
            "is_guest": false,
            "security": "wpa-psk",
            "wpa_mode": "wpa2",
            "encryption": "aes",
            "mac_filter_enabled": true,
            "mac_filter_list": ["AA:BB:CC:DD:EE:01"],
            "mac_filter_policy": "allow"
        })
    }

    #[test]
    fn radio_round_trips_with_unknown_keys() {
        let mut value = radio("na", 36);
        value["radio_proto"] = json!("ax");
        value["antenna_gain"] = json!(3);
        let parsed: RadioSettings = round_trip(value.clone(), &value);
        assert_eq!(parsed.extra.keys().collect::<Vec<_>>(), ["antenna_gain"]);
    }

    #[test]
    fn profile_round_trips_with_lower_cased_macs() {
        let mut input = profile();
        input["vlan_enabled"] = json!(true);
        input["vlan_id"] = json!(30);
        input["dtim_period"] = json!(3);
        input["group_rekey"] = json!(3600);
        input["wlan_band"] = json!("both");
        let mut expected = input.clone();
        expected["mac_filter_list"] = json!(["aa:bb:cc:dd:ee:01"]);

        let parsed: NetworkProfile = round_trip(input, &expected);
        assert_eq!(parsed.vlan_id, Some(30));
        assert_eq!(parsed.extra.keys().collect::<Vec<_>>(), ["wlan_band"]);
    }

    #[test]
    fn wlan_configuration_round_trips() {
        let input = json!({
            "radio_table": [radio("ng", 6), radio("na", 36)],
            "network_profiles": [profile()],
            "pmf_mode": "optional",
            "minimum_rssi": -75,
            "max_clients": 64,
            "site_id": "default"
        });
        let mut expected = input.clone();
        expected["network_profiles"][0]["mac_filter_list"] = json!(["aa:bb:cc:dd:ee:01"]);

        let parsed: WlanConfiguration = round_trip(input, &expected);
        assert_eq!(parsed.pmf_mode, Some(PmfMode::Optional));
        assert_eq!(parsed.radio_table.len(), 2);
    }

    #[test]
    fn radio_channel_boundaries() {
        for (band, low, high) in [("ng", 1, 14), ("na", 36, 165), ("6e", 1, 233)] {
            assert!(RadioSettings::from_value(radio(band, low)).is_ok());
            assert!(RadioSettings::from_value(radio(band, high)).is_ok());
            let err = RadioSettings::from_value(radio(band, high + 1)).unwrap_err();
            assert_eq!(err.violations()[0].code, "channel");
        }
    }

    #[test]
    fn band_limits_protocol() {
        let mut value = radio("na", 36);
        value["radio_proto"] = json!("ng");
        let err = RadioSettings::from_value(value.clone()).unwrap_err();
        assert_eq!(err.violations()[0].code, "radio_proto");

        value["radio_proto"] = json!("ax");
        assert!(RadioSettings::from_value(value).is_ok());

        let mut value = radio("6e", 37);
        value["radio_proto"] = json!("ac");
        assert!(RadioSettings::from_value(value).is_err());
    }

    #[test]
    fn tx_power_above_thirty_is_rejected() {
        let mut value = radio("ng", 6);
        value["tx_power"] = json!(31);
        let err = RadioSettings::from_value(value).unwrap_err();
        assert_eq!(err.violations()[0].field, "tx_power");
    }

    #[test]
    fn profile_normalizes_filter_macs() {
        let parsed = NetworkProfile::from_value(profile()).unwrap();
        assert_eq!(parsed.mac_filter_list, vec!["aa:bb:cc:dd:ee:01"]);
        assert_eq!(parsed.mac_filter_policy, Some(MacFilterPolicy::Allow));
    }

    #[test]
    fn ssid_longer_than_32_is_rejected() {
        let mut value = profile();
        value["ssid"] = json!("x".repeat(33));
        let err = NetworkProfile::from_value(value).unwrap_err();
        assert_eq!(err.violations()[0].field, "ssid");
    }

    #[test]
    fn secured_profile_needs_wpa_mode() {
        let mut value = profile();
        value.as_object_mut().unwrap().remove("wpa_mode");
        let err = NetworkProfile::from_value(value.clone()).unwrap_err();
        assert_eq!(err.violations()[0].code, "wpa_mode_required");

        value["security"] = json!("open");
        value["encryption"] = json!("none");
        assert!(NetworkProfile::from_value(value).is_ok());
    }

    #[test]
    fn vlan_tagging_needs_an_id() {
        let mut value = profile();
        value["vlan_enabled"] = json!(true);
        let err = NetworkProfile::from_value(value).unwrap_err();
        assert_eq!(err.violations()[0].code, "vlan_id_required");
    }

    #[test]
    fn wlan_paths_point_into_tables() {
        let value = json!({
            "radio_table": [radio("ng", 6), radio("ng", 20)],
            "network_profiles": [profile()],
            "minimum_rssi": -80,
            "max_clients": 0
        });
        let err = WlanConfiguration::from_value(value).unwrap_err();
        let fields: Vec<&str> = err.violations().iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, vec!["max_clients", "radio_table[1]"]);
    }
}
