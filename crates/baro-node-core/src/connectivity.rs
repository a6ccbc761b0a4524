//! Connectivity state tracking
//!
//! Derives a coarse connection state from the raw link events drained off the
//! [`EventBridge`] and decides when time synchronization has to be (re)started.
//! The decision is edge-triggered: only a transition *into*
//! [`ConnectivityState::AddressAcquired`] starts a sync.

use core::fmt::Debug;
use core::net::Ipv4Addr;

use crate::events::EventBridge;

/// SSID storage, sized for the 802.11 maximum of 32 octets.
pub type Ssid = heapless::String<32>;

/// Information carried by a link-up callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkInfo {
    pub ssid: Ssid,
}

/// Information carried by an address-acquired callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressInfo {
    pub ip: Ipv4Addr,
}

impl AddressInfo {
    pub const fn new(ip: Ipv4Addr) -> Self {
        Self { ip }
    }
}

/// Information carried by a link-down callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisconnectInfo {
    pub ssid: Ssid,
    /// Vendor reason code reported by the radio, 0 when unknown.
    pub reason: u16,
}

/// A drained connectivity callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectivityEvent {
    LinkUp(LinkInfo),
    AddressAcquired(AddressInfo),
    LinkDown(DisconnectInfo),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectivityState {
    #[default]
    Disconnected,
    /// Associated with an access point, no address yet
    LinkUp,
    AddressAcquired,
}

/// Network collaborator: the Wi-Fi (or Ethernet) stack.
///
/// Implementations deliver their callbacks by calling the `on_link_*` /
/// `on_address_acquired` entry points of the bridge passed to
/// [`NetworkStack::subscribe`]. Callbacks may only be dispatched from inside
/// calls the main loop makes into the stack (typically [`NetworkStack::service`]).
pub trait NetworkStack {
    type Error: Debug;

    /// Register the bridge that receives link callbacks.
    fn subscribe(&mut self, bridge: &'static EventBridge);

    /// Begin associating with `ssid`. Does not wait for the link.
    fn connect(&mut self, ssid: &str, password: &str) -> Result<(), Self::Error>;

    fn is_connected(&self) -> bool;

    /// Housekeeping hook run while the main loop yields.
    fn service(&mut self) {}
}

/// Edge detector over [`ConnectivityEvent`]s.
#[derive(Debug, Default)]
pub struct ConnectivityTracker {
    state: ConnectivityState,
}

impl ConnectivityTracker {
    pub const fn new() -> Self {
        Self {
            state: ConnectivityState::Disconnected,
        }
    }

    pub const fn state(&self) -> ConnectivityState {
        self.state
    }

    /// Apply one event and return `true` if it was an edge into
    /// [`ConnectivityState::AddressAcquired`].
    pub fn apply(&mut self, event: &ConnectivityEvent) -> bool {
        match event {
            ConnectivityEvent::LinkUp(_) => {
                // A link-up while already addressed is diagnostic only
                if self.state == ConnectivityState::Disconnected {
                    self.state = ConnectivityState::LinkUp;
                }
                false
            }
            ConnectivityEvent::AddressAcquired(_) => {
                let edge = self.state != ConnectivityState::AddressAcquired;
                self.state = ConnectivityState::AddressAcquired;
                edge
            }
            ConnectivityEvent::LinkDown(_) => {
                self.state = ConnectivityState::Disconnected;
                false
            }
        }
    }
}
