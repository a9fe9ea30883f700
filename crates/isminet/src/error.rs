//! CLI error types with miette diagnostics.
//!
//! Maps API and settings failures into user-facing errors with help text
//! and a stable process exit code.

use miette::Diagnostic;
use thiserror::Error;

use isminet_api::FieldViolation;
use isminet_config::ConfigError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const PERMISSION: i32 = 5;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
    pub const VALIDATION: i32 = 9;
}

#[derive(Debug, Error, Diagnostic)]
#[allow(unused_assignments)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not connect to the controller")]
    #[diagnostic(
        code(isminet::connection_failed),
        help(
            "Check that the controller is reachable and that UNIFI_HOST, UNIFI_PORT,\n\
             UNIFI_SCHEME, and UNIFI_PLATFORM match it."
        )
    )]
    ConnectionFailed {
        #[source]
        source: isminet_api::Error,
    },

    #[error("TLS handshake failed: {message}")]
    #[diagnostic(
        code(isminet::tls_error),
        help(
            "The controller probably uses a self-signed certificate.\n\
             Set UNIFI_VERIFY_SSL=false, or point ca_cert at its CA bundle."
        )
    )]
    Tls { message: String },

    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(isminet::timeout),
        help("Raise UNIFI_TIMEOUT or check controller responsiveness.")
    )]
    Timeout { seconds: u64 },

    // ── Authentication ───────────────────────────────────────────────

    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(isminet::auth_failed),
        help(
            "Verify the API key under Settings > Control Plane > Integrations.\n\
             Store a new one with: isminet config set-key"
        )
    )]
    AuthFailed { message: String },

    #[error("No API key configured for host '{host}'")]
    #[diagnostic(
        code(isminet::no_credentials),
        help("Set UNIFI_API_KEY, or run: isminet config set-key --host {host}")
    )]
    NoCredentials { host: String },

    #[error("Permission denied: {message}")]
    #[diagnostic(
        code(isminet::permission_denied),
        help("The API key is valid but its role cannot access this resource.")
    )]
    PermissionDenied { message: String },

    // ── Resources ────────────────────────────────────────────────────

    #[error("Not found: {message}")]
    #[diagnostic(code(isminet::not_found), help("Run a `list` command to see what exists."))]
    NotFound { message: String },

    // ── API ──────────────────────────────────────────────────────────

    #[error("Rate limited: {message}{}", retry_hint(*retry_after_secs))]
    #[diagnostic(
        code(isminet::rate_limited),
        help("Wait before retrying, or lower the request rate.")
    )]
    RateLimited {
        message: String,
        retry_after_secs: Option<u64>,
    },

    #[error("{model} response failed validation")]
    #[diagnostic(code(isminet::invalid_response), help("{details}"))]
    InvalidResponse { model: String, details: String },

    #[error(transparent)]
    #[diagnostic(code(isminet::api_error))]
    Api(isminet_api::Error),

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(isminet::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error(transparent)]
    #[diagnostic(code(isminet::config))]
    Config(ConfigError),

    // ── IO / Serialization ───────────────────────────────────────────

    #[error(transparent)]
    #[diagnostic(code(isminet::io))]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(isminet::json), help("Check the JSON contents and try again."))]
    Json(#[from] serde_json::Error),

    #[error("Could not render YAML: {0}")]
    #[diagnostic(code(isminet::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

fn retry_hint(retry_after_secs: Option<u64>) -> String {
    retry_after_secs.map_or_else(String::new, |secs| format!(" (retry after {secs}s)"))
}

fn describe(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| format!("{}: {}", v.field, v.message))
        .collect::<Vec<_>>()
        .join("\n")
}

impl From<isminet_api::Error> for CliError {
    fn from(err: isminet_api::Error) -> Self {
        use isminet_api::Error as E;
        match err {
            E::Authentication { message } => Self::AuthFailed { message },
            E::Permission { message } => Self::PermissionDenied { message },
            E::NotFound { message } => Self::NotFound { message },
            E::RateLimited {
                message,
                retry_after_secs,
            } => Self::RateLimited {
                message,
                retry_after_secs,
            },
            E::Timeout { timeout_secs } => Self::Timeout {
                seconds: timeout_secs,
            },
            E::Tls(message) => Self::Tls { message },
            E::InvalidRequest(reason) => Self::Validation {
                field: "argument".into(),
                reason,
            },
            E::ResponseValidation { model, violations } => Self::InvalidResponse {
                model: model.to_owned(),
                details: describe(&violations),
            },
            E::RetriesExhausted { source, .. } => match *source {
                E::Timeout { timeout_secs } => Self::Timeout {
                    seconds: timeout_secs,
                },
                other => Self::ConnectionFailed { source: other },
            },
            err @ E::Transport(_) => Self::ConnectionFailed { source: err },
            other => Self::Api(other),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::NoCredentials { host } => Self::NoCredentials { host },
            other => Self::Config(other),
        }
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::Tls { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::PermissionDenied { .. } => exit_code::PERMISSION,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. }
            | Self::InvalidResponse { .. }
            | Self::Config(ConfigError::Figment(_)) => exit_code::VALIDATION,
            Self::Json(_) => exit_code::USAGE,
            Self::RateLimited { .. }
            | Self::Api(_)
            | Self::Config(_)
            | Self::Io(_)
            | Self::Yaml(_) => exit_code::GENERAL,
        }
    }
}
