//! Main coordination loop
//!
//! A single, non-blocking pass drains the bridge and the sampling timer in a
//! fixed order:
//!
//! 1. connectivity events (oldest first), possibly (re)starting time sync
//! 2. the pending sync outcome, reported on the console
//! 3. the sampling timer, possibly reading the sensor and fanning out
//!
//! Between passes the loop yields to the collaborators' housekeeping, which is
//! where their callbacks fire. Nothing in a pass blocks and nothing is fatal.

use embedded_hal::delay::DelayNs;
use log::{debug, info, warn};

use crate::config::NodeConfig;
use crate::connectivity::{ConnectivityEvent, ConnectivityState, ConnectivityTracker, NetworkStack};
use crate::events::EventBridge;
use crate::reporting::{ConsoleSink, LogSink, Reporter};
use crate::sampling::{MonotonicClock, SamplingTimer};
use crate::sensor::EnvironmentSensor;
use crate::syslog::Severity;
use crate::timesync::{SyncReport, TimeSyncClient, TimeSyncCoordinator};

/// The external collaborators a [`Node`] drives.
pub struct Collaborators<N, T, S, C, L, K> {
    pub network: N,
    pub time_sync: T,
    pub sensor: S,
    pub console: C,
    pub remote_log: L,
    pub clock: K,
}

/// What one pass of the loop did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PassSummary {
    pub sync_started: bool,
    pub sync_report: Option<SyncReport>,
    pub sampled: bool,
}

pub struct Node<N, T, S, C, L, K> {
    config: NodeConfig,
    bridge: &'static EventBridge,
    network: N,
    time_sync: T,
    sensor: S,
    clock: K,
    reporter: Reporter<C, L>,
    connectivity: ConnectivityTracker,
    coordinator: TimeSyncCoordinator,
    sampling: SamplingTimer,
}

impl<N, T, S, C, L, K> Node<N, T, S, C, L, K>
where
    N: NetworkStack,
    T: TimeSyncClient,
    S: EnvironmentSensor,
    C: ConsoleSink,
    L: LogSink,
    K: MonotonicClock,
{
    pub fn new(
        config: NodeConfig,
        bridge: &'static EventBridge,
        parts: Collaborators<N, T, S, C, L, K>,
    ) -> Self {
        Self {
            config,
            bridge,
            network: parts.network,
            time_sync: parts.time_sync,
            sensor: parts.sensor,
            clock: parts.clock,
            reporter: Reporter::new(parts.console, parts.remote_log),
            connectivity: ConnectivityTracker::new(),
            coordinator: TimeSyncCoordinator::new(config.cadence),
            sampling: SamplingTimer::new(config.sampling_interval_ms),
        }
    }

    /// Fixed startup sequence. Retries the sensor probe until it answers,
    /// blocking on `delay` in between.
    pub fn setup<D: DelayNs>(&mut self, delay: &mut D) {
        self.start();
        while !self.probe_sensor() {
            delay.delay_ms(self.config.sensor_retry_delay_ms);
        }
    }

    /// First half of [`Node::setup`]: subscribe the collaborators, request the
    /// connection and announce the sensor bring-up.
    ///
    /// Async hosts call this and then [`Node::probe_sensor`] in a loop,
    /// awaiting the retry delay themselves so other tasks keep running.
    pub fn start(&mut self) {
        self.reporter.console_line("");

        self.network.subscribe(self.bridge);
        self.time_sync.subscribe(self.bridge);

        let wifi = self.config.wifi;
        if let Err(e) = self.network.connect(wifi.ssid, wifi.password) {
            warn!("connect request for {} refused: {:?}", wifi.ssid, e);
            self.reporter
                .console_fmt(format_args!("WiFi connect to {} failed", wifi.ssid));
        }

        self.reporter.console_line("Starting BME280");
    }

    /// One sensor probe. On success the node announces itself and arms the
    /// sampling timer; on failure the caller waits
    /// [`NodeConfig::sensor_retry_delay_ms`] and tries again.
    pub fn probe_sensor(&mut self) -> bool {
        let model = match self.sensor.begin() {
            Ok(model) => model,
            Err(e) => {
                debug!("sensor probe failed: {:?}", e);
                self.reporter.console_line("Could not find BME280 sensor");
                return false;
            }
        };
        self.reporter.console_line(model.detection_message());
        info!("sensor ready: {:?}", model);

        self.reporter.remote_log(Severity::Info, "Device setup");

        self.sampling.arm(self.clock.now_ms());
        true
    }

    /// Run one pass of the loop.
    pub fn poll_once(&mut self) -> PassSummary {
        let sync_started = self.drain_connectivity();
        let sync_report = self.drain_sync_outcome();
        let sampled = self.evaluate_sampling();

        PassSummary {
            sync_started,
            sync_report,
            sampled,
        }
    }

    /// Let the collaborators do their housekeeping. Callbacks fire from here.
    pub fn yield_to_idle(&mut self) {
        self.network.service();
        self.time_sync.service();
    }

    pub fn run(&mut self) -> ! {
        loop {
            self.poll_once();
            self.yield_to_idle();
        }
    }

    fn drain_connectivity(&mut self) -> bool {
        let mut edge = false;
        for event in self.bridge.take_connectivity() {
            self.print_connectivity(&event);
            edge |= self.connectivity.apply(&event);
        }

        // A pass that ends disconnected has nothing to sync against
        if !edge || self.connectivity.state() != ConnectivityState::AddressAcquired {
            return false;
        }

        match self.coordinator.start(&mut self.time_sync) {
            Ok(()) => {
                info!(
                    "time sync started against {} (resync every {} s)",
                    self.coordinator.cadence().server,
                    self.coordinator.cadence().resync_interval_secs
                );
                true
            }
            Err(e) => {
                warn!("time sync start failed: {:?}", e);
                false
            }
        }
    }

    fn print_connectivity(&mut self, event: &ConnectivityEvent) {
        match event {
            ConnectivityEvent::LinkUp(info) => {
                self.reporter
                    .console_fmt(format_args!("Connected to {}", info.ssid));
            }
            ConnectivityEvent::AddressAcquired(info) => {
                let connected = if self.network.is_connected() { "yes" } else { "no" };
                self.reporter
                    .console_fmt(format_args!("Connected: {connected}"));
                self.reporter.console_fmt(format_args!("Got IP: {}", info.ip));
            }
            ConnectivityEvent::LinkDown(info) => {
                self.reporter
                    .console_fmt(format_args!("Disconnected from SSID: {}", info.ssid));
                self.reporter
                    .console_fmt(format_args!("Reason: {}", info.reason));
            }
        }
    }

    fn drain_sync_outcome(&mut self) -> Option<SyncReport> {
        let outcome = self.bridge.take_sync_outcome()?;
        let report = self.coordinator.classify(outcome);
        if report.is_success() {
            info!("{}", report);
        } else {
            warn!("{}", report);
        }
        self.reporter.console_fmt(format_args!("{report}"));
        Some(report)
    }

    fn evaluate_sampling(&mut self) -> bool {
        if !self.sampling.poll(self.clock.now_ms()) {
            return false;
        }
        let reading = self.sensor.read();
        self.reporter.report(&reading);
        true
    }

    pub fn connectivity_state(&self) -> ConnectivityState {
        self.connectivity.state()
    }

    pub fn coordinator(&self) -> &TimeSyncCoordinator {
        &self.coordinator
    }

    pub fn sampling(&self) -> &SamplingTimer {
        &self.sampling
    }

    pub fn reporter(&self) -> &Reporter<C, L> {
        &self.reporter
    }

    pub fn network(&self) -> &N {
        &self.network
    }

    pub fn network_mut(&mut self) -> &mut N {
        &mut self.network
    }

    pub fn time_sync(&self) -> &T {
        &self.time_sync
    }

    pub fn time_sync_mut(&mut self) -> &mut T {
        &mut self.time_sync
    }

    pub fn clock_mut(&mut self) -> &mut K {
        &mut self.clock
    }
}
