// Device endpoints
//
// Inventory via stat/device, configuration via rest/device, and
// commands via cmd/devmgr.

use serde_json::{Value, json};
use tracing::debug;

use crate::client::ApiRequest;
use crate::error::Error;
use crate::models::Device;
use crate::unifi::client::UnifiClient;

impl UnifiClient {
    /// List all adopted and pending devices.
    ///
    /// `GET /api/s/{site}/stat/device`
    pub async fn list_devices(&self) -> Result<Vec<Device>, Error> {
        debug!(site = self.site(), "listing devices");
        self.fetch_list(self.site_path("stat/device")).await
    }

    /// Get one device by MAC.
    ///
    /// `GET /api/s/{site}/stat/device/{mac}`
    ///
    /// An empty result is [`Error::NotFound`].
    pub async fn get_device(&self, mac: &str) -> Result<Device, Error> {
        let mac = Self::mac_arg(mac)?;
        debug!(mac, "fetching device");
        let env = self
            .fetch::<Device>(ApiRequest::get(self.site_path(&format!("stat/device/{mac}"))))
            .await?;
        env.into_data().into_iter().next().ok_or_else(|| Error::NotFound {
            message: format!("device {mac} not found"),
        })
    }

    /// Update device settings. `changes` is sent as-is.
    ///
    /// `PUT /api/s/{site}/rest/device/{mac}`
    pub async fn update_device(&self, mac: &str, changes: &Value) -> Result<Device, Error> {
        let mac = Self::mac_arg(mac)?;
        debug!(mac, "updating device");
        let req = ApiRequest::put(self.site_path(&format!("rest/device/{mac}")))
            .body(changes.clone());
        self.fetch(req).await?.into_single()
    }

    /// Restart a device.
    ///
    /// `POST /api/s/{site}/cmd/devmgr` with `{"cmd": "restart", "mac": "..."}`
    pub async fn restart_device(&self, mac: &str) -> Result<(), Error> {
        let mac = Self::mac_arg(mac)?;
        debug!(mac, "restarting device");
        self.api()
            .post(
                &self.site_path("cmd/devmgr"),
                &json!({
                    "cmd": "restart",
                    "mac": mac,
                }),
            )
            .await?;
        Ok(())
    }
}
