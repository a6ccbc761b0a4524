//! Recording fakes for the node's collaborators.

use std::collections::VecDeque;

use core::net::Ipv4Addr;

use embedded_hal::delay::DelayNs;

use crate::connectivity::{AddressInfo, DisconnectInfo, LinkInfo, NetworkStack, Ssid};
use crate::events::EventBridge;
use crate::reporting::{ConsoleSink, LogSink};
use crate::sampling::MonotonicClock;
use crate::sensor::{EnvironmentSensor, SensorModel, SensorReading};
use crate::syslog::Severity;
use crate::timesync::{SyncOutcome, TimeSyncClient};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Refused;

/// Bridges are `'static` in production; tests leak one per node.
pub fn leak_bridge() -> &'static EventBridge {
    Box::leak(Box::new(EventBridge::new()))
}

fn ssid(name: &str) -> Ssid {
    Ssid::try_from(name).unwrap()
}

/// Network stack whose callbacks fire when a test says so.
#[derive(Default)]
pub struct FakeNetwork {
    pub bridge: Option<&'static EventBridge>,
    pub connected: bool,
    pub connects: Vec<(String, String)>,
    pub refuse_connect: bool,
    pub services: usize,
}

impl FakeNetwork {
    fn bridge(&self) -> &'static EventBridge {
        self.bridge.expect("network not subscribed")
    }

    pub fn link_up(&mut self, name: &str) {
        self.bridge().on_link_up(LinkInfo { ssid: ssid(name) });
    }

    pub fn got_ip(&mut self, ip: Ipv4Addr) {
        self.connected = true;
        self.bridge().on_address_acquired(AddressInfo::new(ip));
    }

    pub fn link_down(&mut self, name: &str, reason: u16) {
        self.connected = false;
        self.bridge().on_link_down(DisconnectInfo {
            ssid: ssid(name),
            reason,
        });
    }
}

impl NetworkStack for FakeNetwork {
    type Error = Refused;

    fn subscribe(&mut self, bridge: &'static EventBridge) {
        self.bridge = Some(bridge);
    }

    fn connect(&mut self, ssid: &str, password: &str) -> Result<(), Refused> {
        self.connects.push((ssid.to_string(), password.to_string()));
        if self.refuse_connect { Err(Refused) } else { Ok(()) }
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn service(&mut self) {
        self.services += 1;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Begin {
    pub server: String,
    pub utc_offset_hours: i8,
    pub apply_immediately: bool,
    pub utc_offset_minutes: i8,
}

/// Time-sync client that delivers queued outcomes on its next `service`.
#[derive(Default)]
pub struct FakeTimeSync {
    pub bridge: Option<&'static EventBridge>,
    pub begins: Vec<Begin>,
    pub intervals: Vec<u32>,
    pub refuse_begin: bool,
    pub pending: VecDeque<SyncOutcome>,
    pub services: usize,
}

impl FakeTimeSync {
    pub fn complete(&mut self, outcome: SyncOutcome) {
        self.pending.push_back(outcome);
    }
}

impl TimeSyncClient for FakeTimeSync {
    type Error = Refused;

    fn subscribe(&mut self, bridge: &'static EventBridge) {
        self.bridge = Some(bridge);
    }

    fn begin(
        &mut self,
        server: &str,
        utc_offset_hours: i8,
        apply_immediately: bool,
        utc_offset_minutes: i8,
    ) -> Result<(), Refused> {
        if self.refuse_begin {
            return Err(Refused);
        }
        self.begins.push(Begin {
            server: server.to_string(),
            utc_offset_hours,
            apply_immediately,
            utc_offset_minutes,
        });
        Ok(())
    }

    fn set_interval(&mut self, seconds: u32) -> Result<(), Refused> {
        self.intervals.push(seconds);
        Ok(())
    }

    fn service(&mut self) {
        self.services += 1;
        if let Some(bridge) = self.bridge {
            while let Some(outcome) = self.pending.pop_front() {
                bridge.on_sync_event(outcome);
            }
        }
    }
}

/// Sensor that fails `begin_failures` probes, then replays `readings`.
pub struct FakeSensor {
    pub begin_failures: usize,
    pub model: SensorModel,
    pub readings: Vec<SensorReading>,
    pub reads: usize,
}

impl Default for FakeSensor {
    fn default() -> Self {
        Self {
            begin_failures: 0,
            model: SensorModel::Bme280,
            readings: Vec::new(),
            reads: 0,
        }
    }
}

impl EnvironmentSensor for FakeSensor {
    type Error = Refused;

    fn begin(&mut self) -> Result<SensorModel, Refused> {
        if self.begin_failures > 0 {
            self.begin_failures -= 1;
            return Err(Refused);
        }
        Ok(self.model)
    }

    fn read(&mut self) -> SensorReading {
        let reading = self
            .readings
            .get(self.reads)
            .copied()
            .unwrap_or(SensorReading::new(21.3, Some(45.2), 1013.2));
        self.reads += 1;
        reading
    }
}

#[derive(Default)]
pub struct RecordingConsole {
    pub lines: Vec<String>,
}

impl ConsoleSink for RecordingConsole {
    fn write_line(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }
}

#[derive(Default)]
pub struct RecordingLog {
    pub sent: Vec<(Severity, String)>,
    pub attempts: usize,
    pub fail: bool,
}

impl LogSink for RecordingLog {
    type Error = Refused;

    fn send(&mut self, severity: Severity, message: &str) -> Result<(), Refused> {
        self.attempts += 1;
        if self.fail {
            return Err(Refused);
        }
        self.sent.push((severity, message.to_string()));
        Ok(())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ManualClock {
    now: u32,
}

impl ManualClock {
    pub const fn at(now: u32) -> Self {
        Self { now }
    }

    pub fn advance(&mut self, ms: u32) {
        self.now = self.now.wrapping_add(ms);
    }
}

impl MonotonicClock for ManualClock {
    fn now_ms(&self) -> u32 {
        self.now
    }
}

#[derive(Debug, Default)]
pub struct CountingDelay {
    pub total_ms: u32,
    pub total_ns: u64,
}

impl DelayNs for CountingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.total_ms += ms;
    }
}
