use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// How the API key travels on each request.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum AuthHeader {
    /// `X-API-KEY: <key>`, the Network application's native scheme.
    #[default]
    ApiKey,
    /// `Authorization: Bearer <key>`.
    Bearer,
}

impl AuthHeader {
    /// Build the header pair for `key`, marked sensitive so it never
    /// shows up in debug output.
    pub fn header(self, key: &SecretString) -> Result<(HeaderName, HeaderValue), Error> {
        let (name, raw) = match self {
            Self::ApiKey => (
                HeaderName::from_static("x-api-key"),
                key.expose_secret().to_owned(),
            ),
            Self::Bearer => (AUTHORIZATION, format!("Bearer {}", key.expose_secret())),
        };
        let mut value = HeaderValue::from_str(&raw).map_err(|_| {
            Error::InvalidRequest("API key contains characters not allowed in a header".into())
        })?;
        value.set_sensitive(true);
        Ok((name, value))
    }

    pub(crate) fn apply(self, key: &SecretString, headers: &mut HeaderMap) -> Result<(), Error> {
        let (name, value) = self.header(key)?;
        headers.insert(name, value);
        Ok(())
    }
}

/// The platform type of the UniFi controller.
///
/// Determines the URL prefix in front of `api/...` paths.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Platform {
    /// UniFi OS console (UDM, UCG, Cloud Key Gen2+) -- `/proxy/network` prefix.
    #[default]
    UnifiOs,
    /// Standalone Network Application -- no prefix.
    Classic,
}

impl Platform {
    pub fn prefix(self) -> &'static str {
        match self {
            Self::UnifiOs => "/proxy/network",
            Self::Classic => "",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn api_key_header_is_sensitive() {
        let key = SecretString::from("s3cret".to_owned());
        let (name, value) = AuthHeader::ApiKey.header(&key).unwrap();
        assert_eq!(name.as_str(), "x-api-key");
        assert_eq!(value.to_str().unwrap(), "s3cret");
        assert!(value.is_sensitive());
    }

    #[test]
    fn bearer_header_uses_authorization() {
        let key = SecretString::from("s3cret".to_owned());
        let (name, value) = AuthHeader::Bearer.header(&key).unwrap();
        assert_eq!(name, AUTHORIZATION);
        assert_eq!(value.to_str().unwrap(), "Bearer s3cret");
    }

    #[test]
    fn header_rejects_control_characters() {
        let key = SecretString::from("bad\nkey".to_owned());
        assert!(matches!(
            AuthHeader::ApiKey.header(&key),
            Err(Error::InvalidRequest(_))
        ));
    }

    #[test]
    fn platform_parses_from_config_strings() {
        assert_eq!("unifi-os".parse::<Platform>().unwrap(), Platform::UnifiOs);
        assert_eq!("classic".parse::<Platform>().unwrap(), Platform::Classic);
        assert_eq!(Platform::Classic.prefix(), "");
    }
}
