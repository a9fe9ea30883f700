// System endpoints
//
// Health dashboard, process and service tables, and sysinfo.

use tracing::debug;

use crate::error::Error;
use crate::models::{ProcessInfo, ServiceStatus, SystemHealth, SystemStatus};
use crate::unifi::client::UnifiClient;

impl UnifiClient {
    /// Subsystem health checks.
    ///
    /// `GET /api/s/{site}/stat/health`
    pub async fn get_system_health(&self) -> Result<Vec<SystemHealth>, Error> {
        debug!("fetching system health");
        self.fetch_list(self.site_path("stat/health")).await
    }

    /// `GET /api/s/{site}/stat/process`
    pub async fn list_processes(&self) -> Result<Vec<ProcessInfo>, Error> {
        debug!("listing processes");
        self.fetch_list(self.site_path("stat/process")).await
    }

    /// `GET /api/s/{site}/stat/service`
    pub async fn list_services(&self) -> Result<Vec<ServiceStatus>, Error> {
        debug!("listing services");
        self.fetch_list(self.site_path("stat/service")).await
    }

    /// Overall controller state.
    ///
    /// `GET /api/s/{site}/stat/sysinfo`
    ///
    /// sysinfo returns a one-element array; an empty one is a validation error.
    pub async fn get_system_status(&self) -> Result<SystemStatus, Error> {
        debug!("fetching sysinfo");
        self.fetch_one(self.site_path("stat/sysinfo")).await
    }
}
