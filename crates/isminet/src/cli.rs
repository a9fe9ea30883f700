//! Clap derive structures for the `isminet` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// isminet -- inspect and manage a UniFi Network controller
#[derive(Debug, Parser)]
#[command(
    name = "isminet",
    version,
    about = "Inspect and manage a UniFi Network controller from the command line",
    long_about = "Typed access to the UniFi Network REST API.\n\n\
        Settings come from built-in defaults, a TOML file, a .env file,\n\
        and UNIFI_* environment variables, in that order.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Load environment variables from this file instead of ./.env
    #[arg(long, global = true, value_name = "PATH")]
    pub env_file: Option<PathBuf>,

    /// Settings file (defaults to the platform config path)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Site name (overrides UNIFI_SITE)
    #[arg(long, short = 's', global = true)]
    pub site: Option<String>,

    /// Output format
    #[arg(long, short = 'o', default_value = "table", global = true)]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List, inspect, restart, and update devices
    #[command(alias = "dev", alias = "d")]
    Devices(DevicesArgs),

    /// List and inspect connected clients
    #[command(alias = "cl")]
    Clients(ClientsArgs),

    /// List and inspect network configurations
    #[command(alias = "net", alias = "n")]
    Networks(NetworksArgs),

    /// Show the VLAN settings of a network
    Vlan(IdArg),

    /// Show the DHCP settings of a network
    Dhcp(IdArg),

    /// Show the wireless settings of an access point
    Wlan(MacArg),

    /// Controller health, processes, services, and version
    #[command(alias = "sys")]
    System(SystemArgs),

    /// List sites visible to the API key
    Sites,

    /// Save raw API responses as pretty JSON files
    Fetch(FetchArgs),

    /// Inspect settings and store the API key
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared argument shapes ───────────────────────────────────────────

#[derive(Debug, Args)]
pub struct MacArg {
    /// MAC address (any case, colon separated)
    pub mac: String,
}

#[derive(Debug, Args)]
pub struct IdArg {
    /// Network ID
    pub id: String,
}

// ── Devices ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DevicesArgs {
    #[command(subcommand)]
    pub command: DevicesCommand,
}

#[derive(Debug, Subcommand)]
pub enum DevicesCommand {
    /// List all devices on the site
    #[command(alias = "ls")]
    List,
    /// Show one device
    Get(MacArg),
    /// Restart a device
    Restart(MacArg),
    /// Apply a JSON change set to a device
    Update(DeviceUpdateArgs),
}

#[derive(Debug, Args)]
pub struct DeviceUpdateArgs {
    /// MAC address of the device
    pub mac: String,

    /// Inline JSON object with the fields to change
    #[arg(long, conflicts_with = "file", required_unless_present = "file")]
    pub data: Option<String>,

    /// File containing the JSON change set
    #[arg(long, short = 'F', value_name = "PATH")]
    pub file: Option<PathBuf>,
}

// ── Clients ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ClientsArgs {
    #[command(subcommand)]
    pub command: ClientsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ClientsCommand {
    /// List connected clients
    #[command(alias = "ls")]
    List(ClientsListArgs),
    /// Show one client
    Get(MacArg),
}

#[derive(Debug, Args)]
pub struct ClientsListArgs {
    /// Only wired clients
    #[arg(long, conflicts_with = "wireless")]
    pub wired: bool,

    /// Only wireless clients
    #[arg(long)]
    pub wireless: bool,
}

// ── Networks ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct NetworksArgs {
    #[command(subcommand)]
    pub command: NetworksCommand,
}

#[derive(Debug, Subcommand)]
pub enum NetworksCommand {
    /// List network configurations
    #[command(alias = "ls")]
    List,
    /// Show one network configuration
    Get(IdArg),
    /// List SSID profiles
    Profiles,
}

// ── System ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SystemArgs {
    #[command(subcommand)]
    pub command: SystemCommand,
}

#[derive(Debug, Subcommand)]
pub enum SystemCommand {
    /// Overall controller status
    Status,
    /// Subsystem health checks
    Health,
    /// Running processes
    Processes,
    /// Managed services
    Services,
    /// Controller version
    Version,
}

// ── Fetch ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct FetchArgs {
    /// Directory to write the response files into
    #[arg(long, default_value = "docs/api_responses", value_name = "DIR")]
    pub out: PathBuf,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the resolved settings (API key hidden)
    Show,
    /// Print the settings file path
    Path,
    /// Store the API key for a host in the OS keyring
    SetKey(SetKeyArgs),
}

#[derive(Debug, Args)]
pub struct SetKeyArgs {
    /// Controller host the key belongs to (defaults to the configured host)
    #[arg(long)]
    pub host: Option<String>,

    /// API key; read from stdin if omitted
    #[arg(long)]
    pub key: Option<String>,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}
