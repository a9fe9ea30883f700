use std::error::Error as StdError;

use thiserror::Error;

use crate::validation::FieldViolation;

/// Top-level error type for the `isminet-api` crate.
///
/// Every failure the request layer can observe maps onto exactly one variant:
/// HTTP status classes, controller envelope rejections, transport failures,
/// and schema violations in otherwise well-formed responses.
#[derive(Debug, Error)]
pub enum Error {
    // ── HTTP status ─────────────────────────────────────────────────
    /// 401: the API key was rejected.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// 403: the key is valid but lacks access to the resource.
    #[error("Permission denied: {message}")]
    Permission { message: String },

    /// 404: the resource does not exist.
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// 429: the controller asked us to slow down.
    #[error("Rate limited: {message}")]
    RateLimited {
        message: String,
        retry_after_secs: Option<u64>,
    },

    /// 400 / 422: the controller rejected the request payload.
    #[error("Invalid request (HTTP {status}): {message}")]
    InvalidRequestBody { status: u16, message: String },

    /// 5xx from the controller.
    #[error("Server error (HTTP {status}): {message}")]
    Server { status: u16, message: String },

    /// Any other non-success status.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// HTTP 200 whose `{meta: {rc}}` envelope is not `ok`.
    #[error("Controller returned rc={rc}: {message}")]
    Controller { rc: String, message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, reset, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// TLS handshake or certificate error. Never retried.
    #[error("TLS error: {0}")]
    Tls(String),

    /// A transient failure persisted through every retry.
    #[error("Request failed after {attempts} attempts: {source}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        source: Box<Error>,
    },

    // ── Client state ────────────────────────────────────────────────
    /// The client was closed; no further requests are issued.
    #[error("Client is closed")]
    ClientClosed,

    /// The caller supplied an unusable request (empty path, bad MAC, etc.)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    // ── Data ────────────────────────────────────────────────────────
    /// Response body was not JSON, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// Response JSON did not satisfy the model schema.
    #[error("{model} failed validation: {}", summarize(violations))]
    ResponseValidation {
        model: &'static str,
        violations: Vec<FieldViolation>,
    },
}

fn summarize(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl Error {
    /// Returns `true` if this is a transient error worth retrying.
    ///
    /// Only connection-level failures qualify; HTTP statuses and TLS
    /// failures never do.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => {
                !is_tls_failure(e) && (e.is_timeout() || e.is_connect() || is_connection_reset(e))
            }
            Self::Timeout { .. } => true,
            _ => false,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` for 401/403 outcomes.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Authentication { .. } | Self::Permission { .. })
    }

    /// The HTTP status that produced this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Authentication { .. } => Some(401),
            Self::Permission { .. } => Some(403),
            Self::NotFound { .. } => Some(404),
            Self::RateLimited { .. } => Some(429),
            Self::InvalidRequestBody { status, .. }
            | Self::Server { status, .. }
            | Self::Api { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            Self::RetriesExhausted { source, .. } => source.status(),
            _ => None,
        }
    }

    /// Field-level violations carried by a response-validation failure.
    pub fn violations(&self) -> &[FieldViolation] {
        match self {
            Self::ResponseValidation { violations, .. } => violations,
            _ => &[],
        }
    }

    /// Classify a `reqwest` failure, separating TLS and timeouts out of the
    /// generic transport bucket.
    pub(crate) fn from_reqwest(err: reqwest::Error, timeout_secs: u64) -> Self {
        if is_tls_failure(&err) {
            Self::Tls(err_chain(&err))
        } else if err.is_timeout() {
            Self::Timeout { timeout_secs }
        } else {
            Self::Transport(err)
        }
    }
}

// ── Error chain inspection ──────────────────────────────────────────

fn sources<'a>(
    err: &'a (dyn StdError + 'static),
) -> impl Iterator<Item = &'a (dyn StdError + 'static)> {
    std::iter::successors(Some(err), |e: &&'a (dyn StdError + 'static)| (*e).source())
}

/// `io::Error::source()` skips its own payload, so the payload is checked
/// explicitly at each `io::Error` in the chain.
fn is_tls_failure(err: &reqwest::Error) -> bool {
    sources(err).any(|e| {
        if e.is::<rustls::Error>() {
            return true;
        }
        if let Some(io) = e.downcast_ref::<std::io::Error>() {
            if io.get_ref().is_some_and(|inner| inner.is::<rustls::Error>()) {
                return true;
            }
        }
        let text = e.to_string().to_ascii_lowercase();
        text.contains("certificate") || text.contains("handshake")
    })
}

fn is_connection_reset(err: &reqwest::Error) -> bool {
    use std::io::ErrorKind;

    sources(err).any(|e| {
        e.downcast_ref::<std::io::Error>().is_some_and(|io| {
            matches!(
                io.kind(),
                ErrorKind::ConnectionReset
                    | ErrorKind::ConnectionAborted
                    | ErrorKind::ConnectionRefused
                    | ErrorKind::BrokenPipe
            )
        })
    })
}

fn err_chain(err: &reqwest::Error) -> String {
    sources(err)
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(": ")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn status_is_reported_per_variant() {
        let err = Error::Server {
            status: 502,
            message: "bad gateway".into(),
        };
        assert_eq!(err.status(), Some(502));
        assert_eq!(
            Error::Permission {
                message: String::new()
            }
            .status(),
            Some(403)
        );
        assert_eq!(Error::ClientClosed.status(), None);
    }

    #[test]
    fn only_timeouts_are_transient_among_non_transport_errors() {
        assert!(Error::Timeout { timeout_secs: 10 }.is_transient());
        assert!(
            !Error::Server {
                status: 500,
                message: String::new()
            }
            .is_transient()
        );
        assert!(!Error::Tls("handshake failure".into()).is_transient());
        assert!(!Error::ClientClosed.is_transient());
    }

    #[test]
    fn validation_display_lists_every_field() {
        let err = Error::ResponseValidation {
            model: "Device",
            violations: vec![
                FieldViolation::new("mac", "mac", "invalid MAC address"),
                FieldViolation::new("version", "version", "expected major.minor.patch"),
            ],
        };
        let text = err.to_string();
        assert!(text.contains("Device"));
        assert!(text.contains("mac: invalid MAC address"));
        assert!(text.contains("version: expected major.minor.patch"));
        assert_eq!(err.violations().len(), 2);
    }
}
