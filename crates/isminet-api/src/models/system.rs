// Controller health, processes, and services.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::{Validate, ValidationError};

use super::common::timestamp;
use super::enums::{DeviceType, HealthStatus, ServiceState};
use crate::validation::{ResponseModel, rule, validate_version};

/// Result of one subsystem health check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "check_health_window"))]
pub struct SystemHealth {
    pub device_type: DeviceType,
    #[validate(length(min = 1))]
    pub subsystem: String,
    pub status: HealthStatus,
    pub status_code: u32,
    #[validate(length(min = 1))]
    pub status_message: String,
    /// Epoch seconds.
    pub last_check: i64,
    /// Epoch seconds.
    pub next_check: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn check_health_window(health: &SystemHealth) -> Result<(), ValidationError> {
    if health.next_check > health.last_check {
        Ok(())
    } else {
        Err(rule(
            "check_order",
            format!(
                "next_check ({}) must be after last_check ({})",
                health.next_check, health.last_check
            ),
        ))
    }
}

impl ResponseModel for SystemHealth {
    const NAME: &'static str = "SystemHealth";
}

impl SystemHealth {
    pub fn last_check_at(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        timestamp(Some(self.last_check))
    }

    pub fn next_check_at(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        timestamp(Some(self.next_check))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ProcessInfo {
    #[validate(range(min = 1))]
    pub pid: i64,
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(range(min = 0.0, max = 100.0))]
    pub cpu_usage: f64,
    #[validate(range(min = 0.0, max = 100.0))]
    pub mem_usage: f64,
    /// Bytes.
    pub mem_rss: u64,
    /// Bytes.
    pub mem_vsz: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1))]
    pub threads: Option<i64>,
    /// Seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uptime: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ResponseModel for ProcessInfo {
    const NAME: &'static str = "ProcessInfo";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ServiceStatus {
    #[validate(length(min = 1))]
    pub name: String,
    pub status: ServiceState,
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_start: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_stop: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restart_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1))]
    pub pid: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ResponseModel for ServiceStatus {
    const NAME: &'static str = "ServiceStatus";
}

/// Overall controller state from `stat/sysinfo`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct SystemStatus {
    pub device_type: DeviceType,
    #[validate(custom(function = "validate_version"))]
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_version"))]
    pub update_version: Option<String>,
    /// Seconds.
    pub uptime: u64,
    #[validate(length(min = 1), nested)]
    pub health: Vec<SystemHealth>,
    #[validate(nested)]
    pub processes: Vec<ProcessInfo>,
    #[validate(nested)]
    pub services: Vec<ServiceStatus>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alerts: Vec<String>,
    pub upgradable: bool,
    pub update_available: bool,
    /// Percent.
    #[validate(range(min = 0, max = 100))]
    pub storage_usage: i16,
    /// Bytes.
    pub storage_available: u64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ResponseModel for SystemStatus {
    const NAME: &'static str = "SystemStatus";
}

impl SystemStatus {
    /// Health checks that are not `ok`.
    pub fn failing_checks(&self) -> impl Iterator<Item = &SystemHealth> {
        self.health
            .iter()
            .filter(|h| h.status != HealthStatus::Ok)
    }
}
