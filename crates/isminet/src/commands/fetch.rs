//! Save raw controller responses for fixtures and debugging.
//!
//! Bodies are written unvalidated so schema drift can be inspected.

use std::path::Path;

use serde_json::Value;
use tracing::info;

use isminet_api::UnifiClient;

use crate::cli::{FetchArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

pub async fn handle(
    client: &UnifiClient,
    args: &FetchArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    std::fs::create_dir_all(&args.out)?;

    let sites = client.api().get("api/self/sites").await?;
    save(&args.out, "sites.json", &sites, global.quiet)?;

    let devices = client.raw_get("stat/device").await?;
    save(&args.out, "devices.json", &devices, global.quiet)?;

    let clients = client.raw_get("stat/sta").await?;
    save(&args.out, "clients.json", &clients, global.quiet)?;

    let version = client.raw_get("self").await?;
    save(&args.out, "version.json", &version, global.quiet)?;

    Ok(())
}

fn save(dir: &Path, name: &str, body: &Value, quiet: bool) -> Result<(), CliError> {
    let path = dir.join(name);
    let mut text = serde_json::to_string_pretty(body)?;
    text.push('\n');
    std::fs::write(&path, text)?;
    info!(path = %path.display(), "saved response");
    output::print_output(&format!("Saved {}", path.display()), quiet);
    Ok(())
}
