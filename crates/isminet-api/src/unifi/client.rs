// Site-scoped client
//
// Builds `api/s/{site}/...` paths and validates typed responses. The
// transport, retries, and status mapping all live in `ApiClient`.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::client::{ApiClient, ApiRequest};
use crate::envelope::Envelope;
use crate::error::Error;
use crate::transport::ClientConfig;
use crate::validation::{ResponseModel, normalize_mac, validate_mac};

/// Site name used when none is configured.
pub const DEFAULT_SITE: &str = "default";

/// Typed client for one site on a UniFi Network controller.
///
/// Cheap to clone; clones share the underlying session.
#[derive(Clone)]
pub struct UnifiClient {
    api: Arc<ApiClient>,
    site: String,
}

impl UnifiClient {
    pub fn new(api: Arc<ApiClient>, site: impl Into<String>) -> Self {
        Self {
            api,
            site: site.into(),
        }
    }

    /// Build the session from `config` and scope it to `site`.
    pub fn from_config(config: &ClientConfig, site: impl Into<String>) -> Result<Self, Error> {
        let site = site.into();
        if site.trim().is_empty() {
            return Err(Error::InvalidRequest("site must not be empty".into()));
        }
        let api = Arc::new(ApiClient::new(config)?);
        debug!(site, "created site client");
        Ok(Self { api, site })
    }

    pub fn site(&self) -> &str {
        &self.site
    }

    /// The shared request layer.
    pub fn api(&self) -> &Arc<ApiClient> {
        &self.api
    }

    /// Release the session; later calls fail with [`Error::ClientClosed`].
    pub fn close(&self) {
        self.api.close();
    }

    // ── Path helpers ─────────────────────────────────────────────────

    /// `api/s/{site}/{endpoint}`
    pub fn site_path(&self, endpoint: &str) -> String {
        format!("api/s/{}/{}", self.site, endpoint.trim_start_matches('/'))
    }

    /// Validate a MAC argument and return its normalized form.
    pub(crate) fn mac_arg(mac: &str) -> Result<String, Error> {
        validate_mac(mac)
            .map_err(|_| Error::InvalidRequest(format!("invalid MAC address: {mac}")))?;
        Ok(normalize_mac(mac))
    }

    // ── Request helpers ──────────────────────────────────────────────

    pub(crate) async fn fetch<M: ResponseModel>(
        &self,
        req: ApiRequest,
    ) -> Result<Envelope<M>, Error> {
        self.api.request_model(req).await
    }

    pub(crate) async fn fetch_list<M: ResponseModel>(&self, path: String) -> Result<Vec<M>, Error> {
        Ok(self.fetch(ApiRequest::get(path)).await?.into_data())
    }

    pub(crate) async fn fetch_one<M: ResponseModel>(&self, path: String) -> Result<M, Error> {
        self.fetch(ApiRequest::get(path)).await?.into_single()
    }

    /// GET a site-relative endpoint without validation.
    ///
    /// `GET /api/s/{site}/{endpoint}`
    pub async fn raw_get(&self, endpoint: &str) -> Result<Value, Error> {
        self.api.get(&self.site_path(endpoint)).await
    }
}

impl std::fmt::Debug for UnifiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnifiClient")
            .field("base_url", &self.api.base_url().as_str())
            .field("site", &self.site)
            .finish_non_exhaustive()
    }
}
