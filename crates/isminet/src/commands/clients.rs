//! Client command handlers.

use tabled::Tabled;

use isminet_api::UnifiClient;
use isminet_api::models::Client;

use crate::cli::{ClientsArgs, ClientsCommand, GlobalOpts};
use crate::error::CliError;
use crate::output::{self, or_dash};

#[derive(Tabled)]
struct ClientRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "MAC")]
    mac: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "Link")]
    link: String,
    #[tabled(rename = "SSID")]
    ssid: String,
    #[tabled(rename = "Signal")]
    signal: String,
    #[tabled(rename = "Guest")]
    guest: String,
}

impl From<&Client> for ClientRow {
    fn from(c: &Client) -> Self {
        let wifi = c.wifi_stats.as_ref();
        Self {
            name: c.display_name().to_owned(),
            mac: c.mac.clone(),
            ip: or_dash(c.ip.as_deref()),
            link: if c.is_wired { "wired" } else { "wireless" }.into(),
            ssid: or_dash(wifi.map(|w| w.essid.as_str())),
            signal: or_dash(wifi.map(|w| format!("{} dBm", w.signal))),
            guest: if c.is_guest() { "yes" } else { "no" }.into(),
        }
    }
}

fn detail(c: &Client) -> String {
    let mut lines = vec![
        format!("Name:       {}", c.display_name()),
        format!("Hostname:   {}", c.hostname),
        format!("MAC:        {}", c.mac),
        format!("IP:         {}", or_dash(c.ip.as_deref())),
        format!("Wired:      {}", c.is_wired),
        format!("Guest:      {}", c.is_guest()),
        format!("First seen: {}", output::when(c.first_seen_at())),
        format!("Last seen:  {}", output::when(c.last_seen_at())),
    ];
    if let Some(wifi) = &c.wifi_stats {
        lines.push(format!("SSID:       {}", wifi.essid));
        lines.push(format!("AP:         {}", wifi.ap_mac));
        lines.push(format!("Signal:     {} dBm", wifi.signal));
        lines.push(format!("Channel:    {}", or_dash(wifi.channel)));
    }
    if let (Some(rx), Some(tx)) = (c.stats.rx_bytes, c.stats.tx_bytes) {
        lines.push(format!("Traffic:    {rx} B in / {tx} B out"));
    }
    lines.join("\n")
}

pub async fn handle(
    client: &UnifiClient,
    args: ClientsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ClientsCommand::List(list) => {
            let mut clients = client.list_clients().await?;
            if list.wired || list.wireless {
                clients.retain(|c| c.is_wired == list.wired);
            }
            let out = output::render_list(global.output, &clients, |x| ClientRow::from(x), |c| {
                c.mac.clone()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ClientsCommand::Get(args) => {
            let found = client.get_client(&args.mac).await?;
            let out = output::render_single(global.output, &found, detail, |c| c.mac.clone())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
