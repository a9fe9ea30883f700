// WLAN configuration endpoints

use tracing::debug;

use crate::client::ApiRequest;
use crate::error::Error;
use crate::models::WlanConfiguration;
use crate::unifi::client::UnifiClient;

impl UnifiClient {
    /// Wireless configuration of one access point.
    ///
    /// `GET /api/s/{site}/rest/wlanconf/{mac}`
    pub async fn get_wlan_config(&self, mac: &str) -> Result<WlanConfiguration, Error> {
        let mac = Self::mac_arg(mac)?;
        debug!(mac, "fetching WLAN configuration");
        self.fetch_one(self.site_path(&format!("rest/wlanconf/{mac}"))).await
    }

    /// `PUT /api/s/{site}/rest/wlanconf/{mac}`
    pub async fn update_wlan_config(
        &self,
        mac: &str,
        config: &WlanConfiguration,
    ) -> Result<WlanConfiguration, Error> {
        let mac = Self::mac_arg(mac)?;
        debug!(mac, radios = config.radio_table.len(), "updating WLAN configuration");
        let req = ApiRequest::put(self.site_path(&format!("rest/wlanconf/{mac}"))).json(config)?;
        self.fetch(req).await?.into_single()
    }
}
