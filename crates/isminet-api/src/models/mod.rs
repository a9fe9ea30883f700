// Validated records for controller responses.
//
// Every model keeps unknown fields in an `extra` map so a parsed record
// serializes back to what the controller sent (MACs lower-cased).

pub mod client;
pub mod common;
pub mod device;
pub mod enums;
pub mod network;
pub mod site;
pub mod system;
pub mod wireless;

pub use client::{Client, ClientDns, ClientGuest, ClientNetwork, ClientTracking, WifiStats};
pub use common::{NetworkMembership, SystemStats, TrafficStats, timestamp};
pub use device::{Device, DeviceNetwork, DeviceSecurity, DeviceSystem, DeviceWireless, PortStats};
pub use enums::{
    DeviceType, DhcpMode, Encryption, HealthStatus, IgmpMode, LedOverride, MacFilterPolicy,
    NetworkPurpose, PmfMode, PoeMode, RadioProto, RadioType, ServiceState, TxPowerMode,
    WlanSecurity, WpaMode,
};
pub use network::{DhcpConfiguration, NetworkConfiguration, VlanConfiguration};
pub use site::{Site, VersionInfo};
pub use system::{ProcessInfo, ServiceStatus, SystemHealth, SystemStatus};
pub use wireless::{NetworkProfile, RadioSettings, WlanConfiguration};
