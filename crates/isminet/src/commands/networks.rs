//! Network, VLAN, DHCP, and WLAN command handlers.

use tabled::{Table, Tabled, settings::Style};

use isminet_api::UnifiClient;
use isminet_api::models::{
    DhcpConfiguration, NetworkConfiguration, NetworkProfile, RadioSettings, VlanConfiguration,
    WlanConfiguration,
};

use crate::cli::{GlobalOpts, NetworksArgs, NetworksCommand};
use crate::error::CliError;
use crate::output::{self, or_dash};

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct NetworkRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Purpose")]
    purpose: String,
    #[tabled(rename = "Subnet")]
    subnet: String,
    #[tabled(rename = "VLANs")]
    vlans: String,
    #[tabled(rename = "Enabled")]
    enabled: bool,
}

impl From<&NetworkConfiguration> for NetworkRow {
    fn from(n: &NetworkConfiguration) -> Self {
        let vlans = n
            .vlans
            .iter()
            .map(|v| v.vlan_id.to_string())
            .collect::<Vec<_>>()
            .join(",");
        Self {
            id: or_dash(n.id.as_deref()),
            name: n.name.clone(),
            purpose: n.purpose.to_string(),
            subnet: n.subnet.clone(),
            vlans: if vlans.is_empty() { "-".into() } else { vlans },
            enabled: n.enabled,
        }
    }
}

#[derive(Tabled)]
struct ProfileRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "SSID")]
    ssid: String,
    #[tabled(rename = "Security")]
    security: String,
    #[tabled(rename = "VLAN")]
    vlan: String,
    #[tabled(rename = "Guest")]
    guest: bool,
    #[tabled(rename = "Enabled")]
    enabled: bool,
}

impl From<&NetworkProfile> for ProfileRow {
    fn from(p: &NetworkProfile) -> Self {
        Self {
            name: p.name.clone(),
            ssid: p.ssid.clone(),
            security: p.security.to_string(),
            vlan: or_dash(p.vlan_id),
            guest: p.is_guest,
            enabled: p.enabled,
        }
    }
}

#[derive(Tabled)]
struct RadioRow {
    #[tabled(rename = "Radio")]
    name: String,
    #[tabled(rename = "Band")]
    band: String,
    #[tabled(rename = "Channel")]
    channel: u16,
    #[tabled(rename = "Width")]
    width: String,
    #[tabled(rename = "TX Power")]
    tx_power: String,
    #[tabled(rename = "Enabled")]
    enabled: bool,
}

impl From<&RadioSettings> for RadioRow {
    fn from(r: &RadioSettings) -> Self {
        Self {
            name: r.name.clone(),
            band: r.radio.band().to_owned(),
            channel: r.channel,
            width: format!("{} MHz", r.channel_width),
            tx_power: format!("{} dBm ({})", r.tx_power, r.tx_power_mode),
            enabled: r.enabled,
        }
    }
}

// ── Detail views ────────────────────────────────────────────────────

fn network_detail(n: &NetworkConfiguration) -> String {
    let mut lines = vec![
        format!("ID:       {}", or_dash(n.id.as_deref())),
        format!("Name:     {}", n.name),
        format!("Purpose:  {}", n.purpose),
        format!("Subnet:   {}", n.subnet),
        format!("Enabled:  {}", n.enabled),
    ];
    for vlan in &n.vlans {
        lines.push(format!("VLAN {:<4} {} ({})", vlan.vlan_id, vlan.name, vlan.subnet));
    }
    if let Some(dhcp) = &n.dhcp {
        lines.push(format!("DHCP:     {}", dhcp_range(dhcp)));
    }
    lines.join("\n")
}

fn vlan_detail(v: &VlanConfiguration) -> String {
    let ports = |list: &[u16]| {
        if list.is_empty() {
            "-".to_owned()
        } else {
            list.iter().map(u16::to_string).collect::<Vec<_>>().join(",")
        }
    };
    let mut lines = vec![
        format!("VLAN:     {}", v.vlan_id),
        format!("Name:     {}", v.name),
        format!("Subnet:   {}", v.subnet),
        format!("Gateway:  {}", or_dash(v.gateway_ip.as_deref())),
        format!("Enabled:  {}", v.enabled),
        format!("Tagged:   {}", ports(&v.tagged_ports)),
        format!("Untagged: {}", ports(&v.untagged_ports)),
    ];
    if let Some(dhcp) = &v.dhcp {
        lines.push(format!("DHCP:     {}", dhcp_range(dhcp)));
    }
    lines.join("\n")
}

fn dhcp_range(d: &DhcpConfiguration) -> String {
    if !d.enabled {
        return "disabled".to_owned();
    }
    format!(
        "{} {} - {}",
        d.mode,
        or_dash(d.start.as_deref()),
        or_dash(d.end.as_deref())
    )
}

fn dhcp_detail(d: &DhcpConfiguration) -> String {
    let dns = if d.dns.is_empty() {
        "-".to_owned()
    } else {
        d.dns.join(", ")
    };
    [
        format!("Mode:     {}", d.mode),
        format!("Enabled:  {}", d.enabled),
        format!("Start:    {}", or_dash(d.start.as_deref())),
        format!("End:      {}", or_dash(d.end.as_deref())),
        format!("Lease:    {}", or_dash(d.lease_time.map(|s| format!("{s}s")))),
        format!("Gateway:  {}", or_dash(d.gateway_ip.as_deref())),
        format!("DNS:      {dns}"),
    ]
    .join("\n")
}

fn wlan_detail(w: &WlanConfiguration) -> String {
    let mut out = String::new();
    if !w.radio_table.is_empty() {
        let rows: Vec<RadioRow> = w.radio_table.iter().map(RadioRow::from).collect();
        out.push_str(&Table::new(rows).with(Style::rounded()).to_string());
    }
    for profile in &w.network_profiles {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(&format!("SSID {} ({})", profile.ssid, profile.security));
    }
    if let Some(rssi) = w.minimum_rssi {
        out.push_str(&format!("\nMinimum RSSI: {rssi} dBm"));
    }
    out
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn handle(
    client: &UnifiClient,
    args: NetworksArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let out = match args.command {
        NetworksCommand::List => {
            let networks = client.list_network_configs().await?;
            output::render_list(global.output, &networks, |x| NetworkRow::from(x), |n| {
                n.id.clone().unwrap_or_else(|| n.name.clone())
            })?
        }
        NetworksCommand::Get(args) => {
            let network = client.get_network_config(&args.id).await?;
            output::render_single(global.output, &network, network_detail, |n| n.name.clone())?
        }
        NetworksCommand::Profiles => {
            let profiles = client.list_network_profiles().await?;
            output::render_list(global.output, &profiles, |x| ProfileRow::from(x), |p| {
                p.ssid.clone()
            })?
        }
    };
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn vlan(client: &UnifiClient, id: &str, global: &GlobalOpts) -> Result<(), CliError> {
    let vlan = client.get_vlan_config(id).await?;
    let out = output::render_single(global.output, &vlan, vlan_detail, |v| {
        v.vlan_id.to_string()
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn dhcp(client: &UnifiClient, id: &str, global: &GlobalOpts) -> Result<(), CliError> {
    let dhcp = client.get_dhcp_config(id).await?;
    let out = output::render_single(global.output, &dhcp, dhcp_detail, dhcp_range)?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn wlan(client: &UnifiClient, mac: &str, global: &GlobalOpts) -> Result<(), CliError> {
    let wlan = client.get_wlan_config(mac).await?;
    let out = output::render_single(global.output, &wlan, wlan_detail, |w| {
        w.network_profiles
            .iter()
            .map(|p| p.ssid.clone())
            .collect::<Vec<_>>()
            .join("\n")
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}
