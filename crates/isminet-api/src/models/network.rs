// Network, VLAN, and DHCP configuration records.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::{Validate, ValidationError};

use super::enums::{DhcpMode, IgmpMode, NetworkPurpose};
use crate::validation::{ResponseModel, rule, validate_ip, validate_ip_list, validate_subnet};

// ── DHCP ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "check_dhcp_range"))]
pub struct DhcpConfiguration {
    pub mode: DhcpMode,
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_ip"))]
    pub start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_ip"))]
    pub end: Option<String>,
    /// Seconds, between five minutes and thirty days.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 300, max = 2_592_000))]
    pub lease_time: Option<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[validate(custom(function = "validate_ip_list"))]
    pub dns: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_ip"))]
    pub gateway_ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_ip"))]
    pub unifi_controller: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_ip"))]
    pub ntp_server: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_ip"))]
    pub tftp_server: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boot_file: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub static_leases: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn check_dhcp_range(dhcp: &DhcpConfiguration) -> Result<(), ValidationError> {
    let serving = dhcp.mode == DhcpMode::Server && dhcp.enabled;
    if serving && (dhcp.start.is_none() || dhcp.end.is_none()) {
        return Err(rule(
            "dhcp_range",
            "DHCP range start and end must be set when server mode is enabled",
        ));
    }
    Ok(())
}

impl ResponseModel for DhcpConfiguration {
    const NAME: &'static str = "DhcpConfiguration";
}

// ── VLAN ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "check_vlan_ports"))]
pub struct VlanConfiguration {
    #[serde(alias = "id")]
    #[validate(range(min = 1, max = 4094))]
    pub vlan_id: i32,
    pub name: String,
    pub enabled: bool,
    #[validate(custom(function = "validate_subnet"))]
    pub subnet: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_ip"))]
    pub gateway_ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(nested)]
    pub dhcp: Option<DhcpConfiguration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub igmp_snooping: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub igmp_mode: Option<IgmpMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multicast_dns: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tagged_ports: Vec<u16>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub untagged_ports: Vec<u16>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn check_vlan_ports(vlan: &VlanConfiguration) -> Result<(), ValidationError> {
    let tagged: BTreeSet<u16> = vlan.tagged_ports.iter().copied().collect();
    let conflicts: Vec<String> = vlan
        .untagged_ports
        .iter()
        .filter(|port| tagged.contains(port))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(ToString::to_string)
        .collect();
    if conflicts.is_empty() {
        Ok(())
    } else {
        Err(rule(
            "port_conflict",
            format!(
                "ports [{}] cannot be both tagged and untagged",
                conflicts.join(", ")
            ),
        ))
    }
}

impl ResponseModel for VlanConfiguration {
    const NAME: &'static str = "VlanConfiguration";
}

// ── Network ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "check_vlans"))]
pub struct NetworkConfiguration {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub purpose: NetworkPurpose,
    pub enabled: bool,
    #[validate(custom(function = "validate_subnet"))]
    pub subnet: String,
    pub vlan_enabled: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[validate(nested)]
    pub vlans: Vec<VlanConfiguration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(nested)]
    pub dhcp: Option<DhcpConfiguration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub igmp_snooping: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub igmp_mode: Option<IgmpMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multicast_dns: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multicast_enhancement: Option<bool>,

    // IPv6
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv6_interface_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv6_ra_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv6_pd_interface: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv6_pd_prefixid: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv6_pd_start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv6_pd_stop: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn check_vlans(network: &NetworkConfiguration) -> Result<(), ValidationError> {
    if network.vlan_enabled && network.vlans.is_empty() {
        return Err(rule(
            "vlans_required",
            "VLAN configurations must be provided when VLAN is enabled",
        ));
    }
    let mut seen = BTreeSet::new();
    for vlan in &network.vlans {
        if !seen.insert(vlan.vlan_id) {
            return Err(rule(
                "duplicate_vlan",
                format!("VLAN id {} appears more than once", vlan.vlan_id),
            ));
        }
    }
    Ok(())
}

impl ResponseModel for NetworkConfiguration {
    const NAME: &'static str = "NetworkConfiguration";
}
