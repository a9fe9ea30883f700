//! Layered settings for isminet.
//!
//! Sources, lowest priority first: built-in defaults, a TOML file, a
//! `.env` file (loaded into the process environment), then `UNIFI_*`
//! environment variables. The API key falls back to the OS keyring.
//! Logging options are read separately from `ISMINET_*` variables.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use regex::Regex;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use validator::{Validate, ValidationError};

use isminet_api::{AuthHeader, ClientConfig, Platform, RetryPolicy, Scheme, TlsMode};

const KEYRING_SERVICE: &str = "isminet";

static SITE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_-]+$").expect("site pattern compiles"));

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no API key configured for host '{host}'")]
    NoCredentials { host: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("failed to read env file: {0}")]
    Dotenv(#[from] dotenvy::Error),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Settings ────────────────────────────────────────────────────────

/// API generation. Both share the same path prefix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ApiVersion {
    #[default]
    V1,
    V2,
}

/// Connection settings for one controller.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct Settings {
    /// Never serialized; use [`Settings::api_key`] to read it.
    #[serde(skip_serializing)]
    pub api_key: Option<SecretString>,

    /// Hostname or IP, without scheme.
    #[validate(
        length(min = 1, message = "host is required"),
        custom(function = "validate_host")
    )]
    pub host: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, max = 65535))]
    pub port: Option<u16>,

    pub verify_ssl: bool,

    /// Seconds.
    #[validate(range(min = 1, max = 300))]
    pub timeout: u64,

    #[validate(
        length(min = 1, max = 50),
        regex(path = *SITE_RE, message = "may only contain letters, digits, '_' and '-'")
    )]
    pub site: String,

    pub api_version: ApiVersion,
    pub platform: Platform,
    pub scheme: Scheme,
    pub auth_header: AuthHeader,
    pub max_retries: u32,
    pub retry_base_delay_ms: u64,

    /// PEM bundle used when `verify_ssl` is on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        let retry = RetryPolicy::default();
        Self {
            api_key: None,
            host: String::new(),
            port: None,
            verify_ssl: false,
            timeout: 10,
            site: isminet_api::unifi::client::DEFAULT_SITE.into(),
            api_version: ApiVersion::V1,
            platform: Platform::default(),
            scheme: Scheme::default(),
            auth_header: AuthHeader::default(),
            max_retries: retry.max_retries,
            retry_base_delay_ms: u64::try_from(retry.base_delay.as_millis()).unwrap_or(500),
            ca_cert: None,
        }
    }
}

fn validate_host(host: &str) -> Result<(), ValidationError> {
    if host.contains("://") {
        return Err(ValidationError::new("host")
            .with_message("must not include a scheme; set `scheme` instead".into()));
    }
    if host.chars().any(char::is_whitespace) || host.contains('/') {
        return Err(
            ValidationError::new("host").with_message("must be a bare hostname or IP".into())
        );
    }
    Ok(())
}

/// Where to look for settings.
#[derive(Debug, Clone, Default)]
pub struct Sources {
    /// TOML file; the platform config path when `None`.
    pub config_file: Option<PathBuf>,
    /// `.env` file; `./.env` is tried when `None`.
    pub env_file: Option<PathBuf>,
}

impl Settings {
    /// Load, validate, and resolve credentials from every source.
    pub fn load(sources: &Sources) -> Result<Self, ConfigError> {
        load_env(sources.env_file.as_deref())?;
        if let Some(path) = &sources.config_file {
            if !path.exists() {
                return Err(ConfigError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("config file not found: {}", path.display()),
                )));
            }
        }
        Self::from_figment(&Self::figment(sources.config_file.as_deref()))
    }

    /// The provider chain without the `.env` step.
    pub fn figment(config_file: Option<&Path>) -> Figment {
        let path = config_file.map_or_else(config_path, Path::to_path_buf);
        debug!(path = %path.display(), "reading settings");
        Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed("UNIFI_"))
    }

    /// Extract, validate, and resolve the API key.
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let mut settings: Self = figment.extract()?;
        settings.check()?;
        settings.resolve_api_key()?;
        Ok(settings)
    }

    /// Field rules, reported one at a time in field order.
    pub fn check(&self) -> Result<(), ConfigError> {
        let Err(errors) = self.validate() else {
            return Ok(());
        };
        let violations = isminet_api::validation::flatten(&errors, "");
        let first = violations.into_iter().next();
        Err(first.map_or_else(
            || ConfigError::Validation {
                field: "settings".into(),
                reason: errors.to_string(),
            },
            |v| ConfigError::Validation {
                field: v.field,
                reason: v.message,
            },
        ))
    }

    fn resolve_api_key(&mut self) -> Result<(), ConfigError> {
        let present = self
            .api_key
            .as_ref()
            .is_some_and(|key| !key.expose_secret().trim().is_empty());
        if present {
            return Ok(());
        }
        let stored = keyring_entry(&self.host)
            .and_then(|entry| entry.get_password().map_err(ConfigError::from));
        if let Ok(secret) = stored {
            debug!(host = %self.host, "using API key from keyring");
            self.api_key = Some(SecretString::from(secret));
            return Ok(());
        }
        Err(ConfigError::NoCredentials {
            host: self.host.clone(),
        })
    }

    pub fn api_key(&self) -> Result<&SecretString, ConfigError> {
        self.api_key.as_ref().ok_or_else(|| ConfigError::NoCredentials {
            host: self.host.clone(),
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    /// Settings that are valid but probably not what the user wants.
    pub fn warnings(&self, dev_mode: bool) -> Vec<SettingsWarning> {
        let mut out = Vec::new();
        if self.timeout > 60 {
            out.push(SettingsWarning::LongTimeout { secs: self.timeout });
        }
        if self.verify_ssl && !dev_mode {
            out.push(SettingsWarning::VerifySsl);
        }
        if self.api_version == ApiVersion::V2 && dev_mode {
            out.push(SettingsWarning::ApiV2InDevMode);
        }
        out
    }

    /// Connection settings for the API client.
    pub fn client_config(&self) -> Result<ClientConfig, ConfigError> {
        let mut config = ClientConfig::new(self.host.clone(), self.api_key()?.clone());
        config.port = self.port;
        config.scheme = self.scheme;
        config.platform = self.platform;
        config.auth_header = self.auth_header;
        config.timeout = self.timeout();
        config.retry = RetryPolicy {
            max_retries: self.max_retries,
            base_delay: Duration::from_millis(self.retry_base_delay_ms),
        };
        config.tls = match (self.verify_ssl, &self.ca_cert) {
            (false, _) => TlsMode::DangerAcceptInvalid,
            (true, Some(path)) => TlsMode::CustomCa(path.clone()),
            (true, None) => TlsMode::System,
        };
        Ok(config)
    }

    /// TOML rendering with the API key left out.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

// ── Warnings ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsWarning {
    LongTimeout { secs: u64 },
    VerifySsl,
    ApiV2InDevMode,
}

impl fmt::Display for SettingsWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LongTimeout { secs } => {
                write!(f, "timeout of {secs}s is long; requests may hang before failing")
            }
            Self::VerifySsl => f.write_str(
                "verify_ssl is on; controllers usually serve self-signed certificates",
            ),
            Self::ApiV2InDevMode => f.write_str("api_version v2 is experimental in development mode"),
        }
    }
}

// ── Logging ─────────────────────────────────────────────────────────

/// Logging options from `ISMINET_LOG_LEVEL`, `ISMINET_DEV_MODE`,
/// `ISMINET_LOG_TO_FILE`, and `ISMINET_LOG_DIR`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub log_level: String,
    pub dev_mode: bool,
    pub log_to_file: bool,
    pub log_dir: PathBuf,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            log_level: "info".into(),
            dev_mode: false,
            log_to_file: false,
            log_dir: PathBuf::from("logs"),
        }
    }
}

impl LoggingSettings {
    pub fn figment() -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Env::prefixed("ISMINET_"))
    }

    pub fn load() -> Result<Self, ConfigError> {
        Ok(Self::figment().extract()?)
    }

    /// `dev.log` in development mode, `prod.log` otherwise.
    pub fn log_file_name(&self) -> &'static str {
        if self.dev_mode { "dev.log" } else { "prod.log" }
    }
}

// ── Environment ─────────────────────────────────────────────────────

/// Load a `.env` file into the process environment. Variables already set
/// win. An explicit path must exist; `./.env` is optional.
pub fn load_env(env_file: Option<&Path>) -> Result<(), ConfigError> {
    match env_file {
        Some(path) => {
            dotenvy::from_path(path)?;
            debug!(path = %path.display(), "loaded env file");
        }
        None => {
            _ = dotenvy::dotenv();
        }
    }
    Ok(())
}

// ── Paths & keyring ─────────────────────────────────────────────────

/// Platform config file: `<config dir>/isminet/config.toml`.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("", "", "isminet").map_or_else(
        || PathBuf::from(".isminet").join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn keyring_entry(host: &str) -> Result<keyring::Entry, ConfigError> {
    Ok(keyring::Entry::new(KEYRING_SERVICE, &format!("{host}/api-key"))?)
}

/// Store an API key for `host` in the OS keyring.
pub fn store_api_key(host: &str, key: &SecretString) -> Result<(), ConfigError> {
    if host.trim().is_empty() {
        return Err(ConfigError::Validation {
            field: "host".into(),
            reason: "host is required".into(),
        });
    }
    keyring_entry(host)?.set_password(key.expose_secret())?;
    Ok(())
}
