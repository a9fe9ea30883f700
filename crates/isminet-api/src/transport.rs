// Connection settings and `reqwest::Client` construction.
//
// Everything needed to reach one controller lives in `ClientConfig`:
// address, platform prefix, credentials, TLS, timeout, and retry policy.

use std::path::PathBuf;
use std::sync::Once;
use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tracing::warn;
use url::Url;

use crate::auth::{AuthHeader, Platform};
use crate::error::Error;
use crate::retry::RetryPolicy;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

static INSECURE_WARNING: Once = Once::new();

/// TLS verification mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TlsMode {
    /// Use the system certificate store.
    System,
    /// Use a custom CA certificate from the given PEM file.
    CustomCa(PathBuf),
    /// Accept any certificate (for self-signed controllers).
    DangerAcceptInvalid,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Scheme {
    #[default]
    Https,
    Http,
}

/// Everything needed to talk to one controller.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub host: String,
    pub port: Option<u16>,
    pub scheme: Scheme,
    pub platform: Platform,
    pub api_key: SecretString,
    pub auth_header: AuthHeader,
    pub tls: TlsMode,
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl ClientConfig {
    /// Defaults: HTTPS, UniFi OS prefix, `X-API-KEY`, certificate
    /// checks off, 10 s timeout, 3 retries.
    pub fn new(host: impl Into<String>, api_key: SecretString) -> Self {
        Self {
            host: host.into(),
            port: None,
            scheme: Scheme::Https,
            platform: Platform::UnifiOs,
            api_key,
            auth_header: AuthHeader::ApiKey,
            tls: TlsMode::DangerAcceptInvalid,
            timeout: Duration::from_secs(10),
            retry: RetryPolicy::default(),
        }
    }

    /// `scheme://host[:port]{prefix}/`
    ///
    /// The trailing slash lets endpoint paths be joined relative to it.
    pub fn base_url(&self) -> Result<Url, Error> {
        if self.host.trim().is_empty() {
            return Err(Error::InvalidRequest("host must not be empty".into()));
        }
        let host = if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]", self.host)
        } else {
            self.host.clone()
        };
        let port = self.port.map(|p| format!(":{p}")).unwrap_or_default();
        let raw = format!("{}://{host}{port}{}/", self.scheme, self.platform.prefix());
        Ok(Url::parse(&raw)?)
    }

    /// Default headers sent on every request.
    pub fn headers(&self) -> Result<HeaderMap, Error> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        self.auth_header.apply(&self.api_key, &mut headers)?;
        Ok(headers)
    }

    /// Build a pooled `reqwest::Client` for this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(USER_AGENT)
            .default_headers(self.headers()?);

        match &self.tls {
            TlsMode::System => {}
            TlsMode::CustomCa(path) => {
                let cert_pem = std::fs::read(path)
                    .map_err(|e| Error::Tls(format!("failed to read CA cert: {e}")))?;
                let cert = reqwest::Certificate::from_pem(&cert_pem)
                    .map_err(|e| Error::Tls(format!("invalid CA cert: {e}")))?;
                builder = builder.add_root_certificate(cert);
            }
            TlsMode::DangerAcceptInvalid => {
                INSECURE_WARNING.call_once(|| {
                    warn!("TLS certificate verification is disabled; connections are not authenticated");
                });
                builder = builder.danger_accept_invalid_certs(true);
            }
        }

        builder
            .build()
            .map_err(|e| Error::Tls(format!("failed to build HTTP client: {e}")))
    }
}
