//! Command dispatch.
//!
//! `config` and `completions` work offline; everything else builds a
//! [`UnifiClient`] from the resolved settings first.

pub mod clients;
pub mod config_cmd;
pub mod devices;
pub mod fetch;
pub mod networks;
pub mod sites;
pub mod system;
pub mod util;

use clap::CommandFactory;
use tracing::{debug, warn};

use isminet_api::UnifiClient;
use isminet_config::{LoggingSettings, Settings, Sources};

use crate::cli::{Cli, Command, GlobalOpts};
use crate::error::CliError;

pub async fn dispatch(cli: Cli, logging: &LoggingSettings) -> Result<(), CliError> {
    let Cli { global, command } = cli;
    match command {
        Command::Completions(args) => {
            let mut cmd = Cli::command();
            clap_complete::generate(args.shell, &mut cmd, "isminet", &mut std::io::stdout());
            Ok(())
        }
        Command::Config(args) => config_cmd::handle(args, &global),
        cmd => {
            let settings = load_settings(&global)?;
            for warning in settings.warnings(logging.dev_mode) {
                warn!(%warning, "check settings");
            }
            let client = UnifiClient::from_config(&settings.client_config()?, settings.site.clone())?;
            debug!(?client, command = ?cmd, "dispatching command");
            let result = run(cmd, &client, &global).await;
            client.close();
            result
        }
    }
}

async fn run(cmd: Command, client: &UnifiClient, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Devices(args) => devices::handle(client, args, global).await,
        Command::Clients(args) => clients::handle(client, args, global).await,
        Command::Networks(args) => networks::handle(client, args, global).await,
        Command::Vlan(args) => networks::vlan(client, &args.id, global).await,
        Command::Dhcp(args) => networks::dhcp(client, &args.id, global).await,
        Command::Wlan(args) => networks::wlan(client, &args.mac, global).await,
        Command::System(args) => system::handle(client, args, global).await,
        Command::Sites => sites::handle(client, global).await,
        Command::Fetch(args) => fetch::handle(client, &args, global).await,
        Command::Config(_) | Command::Completions(_) => unreachable!("handled before connecting"),
    }
}

/// Resolve settings from every source, then apply `--site`.
pub fn load_settings(global: &GlobalOpts) -> Result<Settings, CliError> {
    let sources = Sources {
        config_file: global.config.clone(),
        env_file: global.env_file.clone(),
    };
    let mut settings = Settings::load(&sources)?;
    if let Some(site) = &global.site {
        settings.site.clone_from(site);
        settings.check()?;
    }
    Ok(settings)
}
