// Closed vocabularies used across the controller's JSON.
//
// Serialized exactly as the controller spells them.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// Radio band, as the controller names it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum RadioType {
    /// 2.4 GHz
    #[serde(rename = "ng")]
    #[strum(serialize = "ng")]
    Ng,
    /// 5 GHz
    #[serde(rename = "na")]
    #[strum(serialize = "na")]
    Na,
    /// 6 GHz
    #[serde(rename = "6e")]
    #[strum(serialize = "6e")]
    SixE,
}

impl RadioType {
    /// Valid channel numbers for this band.
    pub fn channels(self) -> RangeInclusive<u16> {
        match self {
            Self::Ng => 1..=14,
            Self::Na => 36..=165,
            Self::SixE => 1..=233,
        }
    }

    pub fn band(self) -> &'static str {
        match self {
            Self::Ng => "2.4 GHz",
            Self::Na => "5 GHz",
            Self::SixE => "6 GHz",
        }
    }

    /// `Err` carries a message naming the band and its range.
    pub fn check_channel(self, channel: u16) -> Result<(), String> {
        let range = self.channels();
        if range.contains(&channel) {
            Ok(())
        } else {
            Err(format!(
                "channel {channel} is outside the {} range {}-{}",
                self.band(),
                range.start(),
                range.end()
            ))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RadioProto {
    /// 802.11n
    Ng,
    /// 802.11ac
    Ac,
    /// 802.11ax (WiFi 6)
    Ax,
    /// 802.11be (WiFi 7)
    Be,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum DeviceType {
    /// Access point
    Uap,
    /// Switch
    Usw,
    /// Security gateway
    Ugw,
    /// Dream Machine
    Udm,
    /// Dream Machine Pro
    UdmPro,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PoeMode {
    Off,
    Auto,
    Pasv24,
    #[serde(rename = "auto+")]
    #[strum(serialize = "auto+")]
    AutoPlus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LedOverride {
    On,
    Off,
    Default,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DhcpMode {
    Disabled,
    Server,
    Relay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum IgmpMode {
    Snooping,
    Proxy,
    Disabled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum NetworkPurpose {
    Corporate,
    Guest,
    Iot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum HealthStatus {
    Ok,
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ServiceState {
    Running,
    Stopped,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TxPowerMode {
    Auto,
    Low,
    Medium,
    High,
    Custom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum WlanSecurity {
    Open,
    WpaPsk,
    WpaEnterprise,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum WpaMode {
    Wpa2,
    Wpa3,
    Wpa3Transition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Encryption {
    None,
    Aes,
    Tkip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PmfMode {
    Disabled,
    Optional,
    Required,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MacFilterPolicy {
    Allow,
    Deny,
}
