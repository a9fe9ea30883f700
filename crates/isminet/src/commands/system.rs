//! System command handlers.

use tabled::Tabled;

use isminet_api::UnifiClient;
use isminet_api::models::{ProcessInfo, ServiceStatus, SystemHealth, SystemStatus, VersionInfo};

use crate::cli::{GlobalOpts, SystemArgs, SystemCommand};
use crate::error::CliError;
use crate::output::{self, or_dash};

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct HealthRow {
    #[tabled(rename = "Subsystem")]
    subsystem: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Message")]
    message: String,
    #[tabled(rename = "Checked")]
    checked: String,
}

impl From<&SystemHealth> for HealthRow {
    fn from(h: &SystemHealth) -> Self {
        Self {
            subsystem: h.subsystem.clone(),
            status: h.status.to_string(),
            message: h.status_message.clone(),
            checked: output::when(h.last_check_at()),
        }
    }
}

#[derive(Tabled)]
struct ProcessRow {
    #[tabled(rename = "PID")]
    pid: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "CPU %")]
    cpu: String,
    #[tabled(rename = "Mem %")]
    mem: String,
    #[tabled(rename = "Threads")]
    threads: String,
}

impl From<&ProcessInfo> for ProcessRow {
    fn from(p: &ProcessInfo) -> Self {
        Self {
            pid: p.pid,
            name: p.name.clone(),
            cpu: format!("{:.1}", p.cpu_usage),
            mem: format!("{:.1}", p.mem_usage),
            threads: or_dash(p.threads),
        }
    }
}

#[derive(Tabled)]
struct ServiceRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Enabled")]
    enabled: bool,
    #[tabled(rename = "PID")]
    pid: String,
    #[tabled(rename = "Restarts")]
    restarts: String,
}

impl From<&ServiceStatus> for ServiceRow {
    fn from(s: &ServiceStatus) -> Self {
        Self {
            name: s.name.clone(),
            status: s.status.to_string(),
            enabled: s.enabled,
            pid: or_dash(s.pid),
            restarts: or_dash(s.restart_count),
        }
    }
}

// ── Detail views ────────────────────────────────────────────────────

fn status_detail(s: &SystemStatus) -> String {
    let mut lines = vec![
        format!("Type:       {}", s.device_type),
        format!("Version:    {}", s.version),
        format!("Uptime:     {}s", s.uptime),
        format!("Storage:    {}% used", s.storage_usage),
        format!("Upgradable: {}", s.upgradable),
        format!(
            "Health:     {}/{} ok",
            s.health.len() - s.failing_checks().count(),
            s.health.len()
        ),
    ];
    for check in s.failing_checks() {
        lines.push(format!(
            "  {} {}: {}",
            check.subsystem, check.status, check.status_message
        ));
    }
    for alert in &s.alerts {
        lines.push(format!("Alert:      {alert}"));
    }
    lines.join("\n")
}

fn version_detail(v: &VersionInfo) -> String {
    let mut lines = vec![format!("Version: {}", v.version)];
    if let Some(build) = &v.build {
        lines.push(format!("Build:   {build}"));
    }
    if let Some(update) = &v.update_version {
        lines.push(format!("Update:  {update}"));
    }
    lines.join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &UnifiClient,
    args: SystemArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let out = match args.command {
        SystemCommand::Status => {
            let status = client.get_system_status().await?;
            output::render_single(global.output, &status, status_detail, |s| {
                s.version.clone()
            })?
        }
        SystemCommand::Health => {
            let health = client.get_system_health().await?;
            output::render_list(global.output, &health, |x| HealthRow::from(x), |h| {
                format!("{} {}", h.subsystem, h.status)
            })?
        }
        SystemCommand::Processes => {
            let processes = client.list_processes().await?;
            output::render_list(global.output, &processes, |x| ProcessRow::from(x), |p| {
                p.pid.to_string()
            })?
        }
        SystemCommand::Services => {
            let services = client.list_services().await?;
            output::render_list(global.output, &services, |x| ServiceRow::from(x), |s| {
                s.name.clone()
            })?
        }
        SystemCommand::Version => {
            let version = client.get_version().await?;
            output::render_single(global.output, &version, version_detail, |v| {
                v.version.clone()
            })?
        }
    };
    output::print_output(&out, global.quiet);
    Ok(())
}
