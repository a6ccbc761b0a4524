//! Hardware-independent core library for baro-node
//!
//! This crate contains the connectivity / time-sync coordination loop of the
//! baro-node sensor firmware: the callback-to-flag bridge, the connectivity
//! tracker, the time-sync coordinator, the sampling timer and the reporting
//! fan-out, together with the small codecs (SNTP, BSD syslog) the collaborators
//! share and, behind `sensor-bme280`, the BME280 sensor adapter.
//!
//! It is `#![no_std]` and allocation-free so it compiles on both embedded
//! targets (ESP32-S3) and desktop hosts (for the simulator and tests).

#![cfg_attr(not(test), no_std)]

#[cfg(feature = "sensor-bme280")]
pub mod bme280;
pub mod config;
pub mod connectivity;
pub mod events;
pub mod node;
pub mod reporting;
pub mod sampling;
pub mod sensor;
pub mod sntp;
pub mod syslog;
pub mod time;
pub mod timesync;

#[cfg(test)]
pub(crate) mod testing;

pub use config::NodeConfig;
pub use connectivity::{ConnectivityState, NetworkStack};
pub use events::EventBridge;
pub use node::Node;
pub use reporting::{ConsoleSink, LogSink};
pub use sampling::MonotonicClock;
pub use sensor::{EnvironmentSensor, SensorReading};
pub use timesync::{SyncOutcome, TimeSyncClient};
