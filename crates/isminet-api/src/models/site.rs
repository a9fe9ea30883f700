use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

use crate::validation::{ResponseModel, validate_version};

/// A site on the controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Site {
    #[serde(rename = "_id")]
    #[validate(length(min = 1))]
    pub id: String,
    /// Short name used in URLs (`api/s/{name}`).
    #[validate(length(min = 1))]
    pub name: String,
    pub desc: String,
    #[serde(default)]
    pub device_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_hotspot: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anonymous_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attr_no_delete: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attr_hidden_id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ResponseModel for Site {
    const NAME: &'static str = "Site";
}

/// Controller version information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct VersionInfo {
    #[validate(custom(function = "validate_version"))]
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_available: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_downloaded: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_version"))]
    pub update_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hardware_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version_min: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version_max: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ResponseModel for VersionInfo {
    const NAME: &'static str = "VersionInfo";
}
