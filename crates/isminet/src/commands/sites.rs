//! Site listing.

use tabled::Tabled;

use isminet_api::UnifiClient;
use isminet_api::models::Site;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output::{self, or_dash};

#[derive(Tabled)]
struct SiteRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Description")]
    desc: String,
    #[tabled(rename = "Devices")]
    devices: u32,
    #[tabled(rename = "Role")]
    role: String,
}

impl From<&Site> for SiteRow {
    fn from(s: &Site) -> Self {
        Self {
            name: s.name.clone(),
            desc: s.desc.clone(),
            devices: s.device_count,
            role: or_dash(s.role.as_deref()),
        }
    }
}

pub async fn handle(client: &UnifiClient, global: &GlobalOpts) -> Result<(), CliError> {
    let sites = client.list_sites().await?;
    let out = output::render_list(global.output, &sites, |x| SiteRow::from(x), |s| s.name.clone())?;
    output::print_output(&out, global.quiet);
    Ok(())
}
