//! Device command handlers.

use tabled::Tabled;

use isminet_api::UnifiClient;
use isminet_api::models::Device;

use crate::cli::{DevicesArgs, DevicesCommand, GlobalOpts};
use crate::error::CliError;
use crate::output::{self, or_dash};

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "MAC")]
    mac: String,
    #[tabled(rename = "Type")]
    dtype: String,
    #[tabled(rename = "Model")]
    model: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "Firmware")]
    version: String,
    #[tabled(rename = "Adopted")]
    adopted: String,
}

impl From<&Device> for DeviceRow {
    fn from(d: &Device) -> Self {
        Self {
            name: d.display_name().to_owned(),
            mac: d.mac.clone(),
            dtype: d.device_type.to_string(),
            model: or_dash(d.model.as_deref()),
            ip: or_dash(d.ip.as_deref()),
            version: or_dash(d.version.as_deref()),
            adopted: if d.is_adopted() { "yes" } else { "no" }.into(),
        }
    }
}

fn detail(d: &Device) -> String {
    let mut lines = vec![
        format!("Name:     {}", d.display_name()),
        format!("MAC:      {}", d.mac),
        format!("Type:     {}", d.device_type),
        format!("Model:    {}", or_dash(d.model.as_deref())),
        format!("IP:       {}", or_dash(d.ip.as_deref())),
        format!("Firmware: {}", or_dash(d.version.as_deref())),
        format!("Adopted:  {}", d.is_adopted()),
        format!("Seen:     {}", output::when(d.last_seen_at())),
    ];
    if let Some(up) = d.uptime {
        lines.push(format!("Uptime:   {up}s"));
    }
    if let Some(cpu) = d.usage.cpu_usage {
        lines.push(format!("CPU:      {cpu:.1}%"));
    }
    if let Some(mem) = d.usage.mem_usage {
        lines.push(format!("Memory:   {mem:.1}%"));
    }
    if !d.port_table.is_empty() {
        let up = d.port_table.iter().filter(|p| p.up).count();
        lines.push(format!("Ports:    {up}/{} up", d.port_table.len()));
    }
    lines.join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &UnifiClient,
    args: DevicesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        DevicesCommand::List => {
            let devices = client.list_devices().await?;
            let out = output::render_list(global.output, &devices, |x| DeviceRow::from(x), |d| {
                d.mac.clone()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DevicesCommand::Get(args) => {
            let device = client.get_device(&args.mac).await?;
            let out = output::render_single(global.output, &device, detail, |d| d.mac.clone())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DevicesCommand::Restart(args) => {
            client.restart_device(&args.mac).await?;
            output::print_output(&format!("Restart requested for {}", args.mac), global.quiet);
            Ok(())
        }

        DevicesCommand::Update(args) => {
            let changes = util::read_json_payload(args.data.as_deref(), args.file.as_deref())?;
            let device = client.update_device(&args.mac, &changes).await?;
            let out = output::render_single(global.output, &device, detail, |d| d.mac.clone())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
