// isminet-api: Async Rust client and validated models for the UniFi Network API

pub mod auth;
pub mod client;
pub mod envelope;
pub mod error;
pub mod models;
pub mod retry;
pub mod transport;
pub mod unifi;
pub mod validation;

pub use auth::{AuthHeader, Platform};
pub use client::{ApiClient, ApiRequest, Method};
pub use envelope::{Envelope, Meta};
pub use error::Error;
pub use retry::RetryPolicy;
pub use transport::{ClientConfig, Scheme, TlsMode};
pub use unifi::UnifiClient;
pub use validation::{FieldViolation, ResponseModel};
