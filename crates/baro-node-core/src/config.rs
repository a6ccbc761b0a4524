//! Compile-time node configuration
//!
//! There is no runtime configuration input: everything the node needs is fixed
//! here, and binaries override individual fields with struct-update syntax
//! (the firmware injects the Wi-Fi credentials from its build script).

use crate::syslog::{Facility, Severity, SyslogConfig};
use crate::timesync::SyncCadence;

pub const WIFI_SSID: &str = "WIFI_SSID";
pub const WIFI_PASSWORD: &str = "WIFI_PASSWD";

/// pool.ntp.org, UTC+01:00, resync every 15 minutes
pub const SYNC_CADENCE: SyncCadence = SyncCadence {
    server: "pool.ntp.org",
    utc_offset_hours: 1,
    utc_offset_minutes: 0,
    resync_interval_secs: 15 * 60,
    apply_immediately: true,
};

pub const SYSLOG: SyslogConfig = SyslogConfig {
    server: "192.168.1.215",
    port: 516,
    hostname: "D1-mini",
    app_name: "BME280",
    facility: Facility::Kern,
    min_severity: Severity::Debug,
};

pub const SAMPLING_INTERVAL_MS: u32 = 60_000;

/// Pause between sensor probes during bring-up
pub const SENSOR_RETRY_DELAY_MS: u32 = 1_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WifiConfig {
    pub ssid: &'static str,
    pub password: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeConfig {
    pub wifi: WifiConfig,
    pub cadence: SyncCadence,
    pub syslog: SyslogConfig,
    pub sampling_interval_ms: u32,
    pub sensor_retry_delay_ms: u32,
}

impl NodeConfig {
    pub const DEFAULT: Self = Self {
        wifi: WifiConfig {
            ssid: WIFI_SSID,
            password: WIFI_PASSWORD,
        },
        cadence: SYNC_CADENCE,
        syslog: SYSLOG,
        sampling_interval_ms: SAMPLING_INTERVAL_MS,
        sensor_retry_delay_ms: SENSOR_RETRY_DELAY_MS,
    };
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
