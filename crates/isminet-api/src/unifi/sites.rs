// Site and version endpoints

use tracing::debug;

use crate::error::Error;
use crate::models::{Site, VersionInfo};
use crate::unifi::client::UnifiClient;

impl UnifiClient {
    /// Sites visible to the API key. Not site-scoped.
    ///
    /// `GET /api/self/sites`
    pub async fn list_sites(&self) -> Result<Vec<Site>, Error> {
        debug!("listing sites");
        self.fetch_list("api/self/sites".to_owned()).await
    }

    /// Controller version as seen from the current site.
    ///
    /// `GET /api/s/{site}/self`
    pub async fn get_version(&self) -> Result<VersionInfo, Error> {
        debug!("fetching controller version");
        self.fetch_one(self.site_path("self")).await
    }
}
