// Network, VLAN, and DHCP configuration endpoints
//
// rest/networkconf serves both the wireless profile view and the full
// network configuration; the caller picks the model.

use tracing::debug;

use crate::client::ApiRequest;
use crate::error::Error;
use crate::models::{DhcpConfiguration, NetworkConfiguration, NetworkProfile, VlanConfiguration};
use crate::unifi::client::UnifiClient;

impl UnifiClient {
    /// `GET /api/s/{site}/rest/networkconf`
    pub async fn list_network_profiles(&self) -> Result<Vec<NetworkProfile>, Error> {
        debug!(site = self.site(), "listing network profiles");
        self.fetch_list(self.site_path("rest/networkconf")).await
    }

    /// `GET /api/s/{site}/rest/networkconf/{id}`
    pub async fn get_network_profile(&self, id: &str) -> Result<NetworkProfile, Error> {
        debug!(id, "fetching network profile");
        self.fetch_one(self.site_path(&format!("rest/networkconf/{}", path_id(id)?))).await
    }

    /// `GET /api/s/{site}/rest/networkconf`
    pub async fn list_network_configs(&self) -> Result<Vec<NetworkConfiguration>, Error> {
        debug!(site = self.site(), "listing network configurations");
        self.fetch_list(self.site_path("rest/networkconf")).await
    }

    /// `GET /api/s/{site}/rest/networkconf/{id}`
    pub async fn get_network_config(&self, id: &str) -> Result<NetworkConfiguration, Error> {
        debug!(id, "fetching network configuration");
        self.fetch_one(self.site_path(&format!("rest/networkconf/{}", path_id(id)?))).await
    }

    /// Replace a network configuration and return the controller's copy.
    ///
    /// `PUT /api/s/{site}/rest/networkconf/{id}`
    pub async fn update_network_config(
        &self,
        id: &str,
        config: &NetworkConfiguration,
    ) -> Result<NetworkConfiguration, Error> {
        debug!(id, name = %config.name, "updating network configuration");
        let req = ApiRequest::put(self.site_path(&format!("rest/networkconf/{}", path_id(id)?)))
            .json(config)?;
        self.fetch(req).await?.into_single()
    }

    /// `GET /api/s/{site}/rest/vlanconf/{id}`
    pub async fn get_vlan_config(&self, id: &str) -> Result<VlanConfiguration, Error> {
        debug!(id, "fetching VLAN configuration");
        self.fetch_one(self.site_path(&format!("rest/vlanconf/{}", path_id(id)?))).await
    }

    /// `GET /api/s/{site}/rest/dhcpconf/{id}`
    pub async fn get_dhcp_config(&self, id: &str) -> Result<DhcpConfiguration, Error> {
        debug!(id, "fetching DHCP configuration");
        self.fetch_one(self.site_path(&format!("rest/dhcpconf/{}", path_id(id)?))).await
    }
}

/// Resource ids are opaque but must be a single non-empty path segment.
fn path_id(id: &str) -> Result<&str, Error> {
    let id = id.trim();
    if id.is_empty() || id.contains('/') {
        return Err(Error::InvalidRequest(format!("invalid resource id: {id:?}")));
    }
    Ok(id)
}
