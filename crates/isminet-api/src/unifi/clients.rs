// Station endpoints

use tracing::debug;

use crate::client::ApiRequest;
use crate::error::Error;
use crate::models::Client;
use crate::unifi::client::UnifiClient;

impl UnifiClient {
    /// List currently connected stations.
    ///
    /// `GET /api/s/{site}/stat/sta`
    pub async fn list_clients(&self) -> Result<Vec<Client>, Error> {
        debug!(site = self.site(), "listing clients");
        self.fetch_list(self.site_path("stat/sta")).await
    }

    /// Get one station by MAC.
    ///
    /// `GET /api/s/{site}/stat/sta/{mac}`
    pub async fn get_client(&self, mac: &str) -> Result<Client, Error> {
        let mac = Self::mac_arg(mac)?;
        debug!(mac, "fetching client");
        let env = self
            .fetch::<Client>(ApiRequest::get(self.site_path(&format!("stat/sta/{mac}"))))
            .await?;
        env.into_data().into_iter().next().ok_or_else(|| Error::NotFound {
            message: format!("client {mac} not found"),
        })
    }
}
