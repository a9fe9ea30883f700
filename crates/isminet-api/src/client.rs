// Request layer
//
// Owns the pooled HTTP session, joins endpoint paths onto the controller
// base URL, maps HTTP statuses into typed errors, and retries transient
// transport failures. Resource-specific methods live on `UnifiClient`.

use std::future::Future;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::RETRY_AFTER;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::envelope::{Envelope, check_meta};
use crate::error::Error;
use crate::retry::RetryPolicy;
use crate::transport::ClientConfig;
use crate::validation::ResponseModel;

/// Longest slice of a raw body quoted back in an error message.
const BODY_PREVIEW: usize = 500;

/// HTTP methods the controller API accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => Self::GET,
            Method::Post => Self::POST,
            Method::Put => Self::PUT,
            Method::Delete => Self::DELETE,
        }
    }
}

/// One API call: method, relative path, query pairs, optional JSON body.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Serialize `body` up front so retries resend identical bytes.
    pub fn json(self, body: &impl Serialize) -> Result<Self, Error> {
        let value = serde_json::to_value(body)
            .map_err(|e| Error::InvalidRequest(format!("unserializable body: {e}")))?;
        Ok(self.body(value))
    }
}

/// HTTP client for the UniFi Network API.
///
/// Holds a single pooled session. After [`close`](Self::close) every call
/// fails with [`Error::ClientClosed`] without touching the network.
pub struct ApiClient {
    http: RwLock<Option<reqwest::Client>>,
    base_url: Url,
    retry: RetryPolicy,
    timeout_secs: u64,
}

impl ApiClient {
    /// Build a client (and its session) from a [`ClientConfig`].
    pub fn new(config: &ClientConfig) -> Result<Self, Error> {
        let http = config.build_client()?;
        let base_url = config.base_url()?;
        debug!(%base_url, "created API client");
        Ok(Self {
            http: RwLock::new(Some(http)),
            base_url,
            retry: config.retry,
            timeout_secs: config.timeout.as_secs(),
        })
    }

    /// Wrap a pre-built `reqwest::Client`.
    ///
    /// `base_url` should end with `/` (including any platform prefix);
    /// request paths are joined onto it. `timeout` is the one `http` was
    /// built with and is only used to report timeouts.
    pub fn with_client(
        http: reqwest::Client,
        base_url: Url,
        retry: RetryPolicy,
        timeout: Duration,
    ) -> Self {
        Self {
            http: RwLock::new(Some(http)),
            base_url,
            retry,
            timeout_secs: timeout.as_secs(),
        }
    }

    /// Run `f` with a fresh client and close it afterwards, whatever the
    /// outcome.
    pub async fn scoped<T, F, Fut>(config: &ClientConfig, f: F) -> Result<T, Error>
    where
        F: FnOnce(Arc<Self>) -> Fut,
        Fut: Future<Output = Result<T, Error>>,
    {
        let client = Arc::new(Self::new(config)?);
        let result = f(Arc::clone(&client)).await;
        client.close();
        result
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Release the HTTP session. Idempotent.
    pub fn close(&self) {
        let mut guard = self.http.write().unwrap_or_else(PoisonError::into_inner);
        if guard.take().is_some() {
            debug!(base_url = %self.base_url, "closed API client");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.http
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }

    fn session(&self) -> Result<reqwest::Client, Error> {
        self.http
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(Error::ClientClosed)
    }

    /// Resolve an endpoint path against the base URL.
    ///
    /// A leading `/` is ignored so `"/api/self"` and `"api/self"` agree.
    pub fn url(&self, path: &str) -> Result<Url, Error> {
        let path = path.trim_start_matches('/');
        if path.is_empty() {
            return Err(Error::InvalidRequest("path must not be empty".into()));
        }
        Ok(self.base_url.join(path)?)
    }

    // ── Request execution ────────────────────────────────────────────

    /// Send a request and return the raw JSON body.
    ///
    /// A `{meta: {rc}}` envelope that is not `ok` is still an error.
    pub async fn request(&self, req: ApiRequest) -> Result<Value, Error> {
        let http = self.session()?;
        let url = self.url(&req.path)?;
        self.retry
            .run(|| self.send_once(&http, &req, url.clone()))
            .await
    }

    /// Send a request and validate every `data` record as `M`.
    pub async fn request_model<M: ResponseModel>(
        &self,
        req: ApiRequest,
    ) -> Result<Envelope<M>, Error> {
        let body = self.request(req).await?;
        Envelope::parse(body)
    }

    pub async fn get(&self, path: &str) -> Result<Value, Error> {
        self.request(ApiRequest::get(path)).await
    }

    pub async fn post(&self, path: &str, body: &impl Serialize) -> Result<Value, Error> {
        self.request(ApiRequest::post(path).json(body)?).await
    }

    pub async fn put(&self, path: &str, body: &impl Serialize) -> Result<Value, Error> {
        self.request(ApiRequest::put(path).json(body)?).await
    }

    pub async fn delete(&self, path: &str) -> Result<Value, Error> {
        self.request(ApiRequest::delete(path)).await
    }

    async fn send_once(
        &self,
        http: &reqwest::Client,
        req: &ApiRequest,
        url: Url,
    ) -> Result<Value, Error> {
        debug!(method = %req.method, %url, "sending request");

        let mut builder = http.request(req.method.into(), url);
        if !req.query.is_empty() {
            builder = builder.query(&req.query);
        }
        if let Some(body) = &req.body {
            builder = builder.json(body);
        }

        let resp = builder
            .send()
            .await
            .map_err(|e| Error::from_reqwest(e, self.timeout_secs))?;
        let status = resp.status();
        let retry_after = resp
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());
        let body = resp
            .text()
            .await
            .map_err(|e| Error::from_reqwest(e, self.timeout_secs))?;

        debug!(status = status.as_u16(), bytes = body.len(), "received response");

        if !status.is_success() {
            return Err(status_error(status, error_message(&body), retry_after));
        }
        parse_body(&body)
    }
}

// ── Response classification ─────────────────────────────────────────

/// Map a failed HTTP status onto an error kind.
pub(crate) fn status_error(status: StatusCode, message: String, retry_after: Option<u64>) -> Error {
    match status {
        StatusCode::UNAUTHORIZED => Error::Authentication { message },
        StatusCode::FORBIDDEN => Error::Permission { message },
        StatusCode::NOT_FOUND => Error::NotFound { message },
        StatusCode::TOO_MANY_REQUESTS => Error::RateLimited {
            message,
            retry_after_secs: retry_after,
        },
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => Error::InvalidRequestBody {
            status: status.as_u16(),
            message,
        },
        s if s.is_server_error() => Error::Server {
            status: s.as_u16(),
            message,
        },
        s => Error::Api {
            status: s.as_u16(),
            message,
        },
    }
}

/// Pull a human-readable message out of an error body.
///
/// Understands `{meta: {msg}}`, `{message}`, and UniFi OS's
/// `{error: {message}}`; anything else is quoted back verbatim.
pub(crate) fn error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        let found = value
            .pointer("/meta/msg")
            .or_else(|| value.get("message"))
            .or_else(|| value.pointer("/error/message"))
            .and_then(Value::as_str);
        if let Some(msg) = found {
            return msg.to_owned();
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "empty response body".into();
    }
    preview(trimmed)
}

fn preview(body: &str) -> String {
    match body.char_indices().nth(BODY_PREVIEW) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_owned(),
    }
}

fn parse_body(body: &str) -> Result<Value, Error> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    let value: Value = serde_json::from_str(body).map_err(|e| Error::Deserialization {
        message: format!("{e} (body preview: {:?})", preview(body)),
        body: body.to_owned(),
    })?;

    // UniFi OS reports some failures as `{"error": {"code": N, "message": ...}}`
    // with HTTP 200.
    if let Some(code) = value.pointer("/error/code").and_then(Value::as_u64) {
        let status = u16::try_from(code)
            .ok()
            .and_then(|c| StatusCode::from_u16(c).ok())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        return Err(status_error(status, error_message(body), None));
    }

    check_meta(&value)?;
    Ok(value)
}
