//! Callback-to-flag bridge
//!
//! Network and time-sync callbacks run in a restricted context: they must not
//! block, log, or call back into the stack. The only thing they do here is drop
//! a tagged value into a single-slot [`EventFlag`]. The main loop is the only
//! consumer and drains the flags once per pass.
//!
//! Flags are single-slot on purpose: a second event of the same kind arriving
//! before the loop drains the first replaces it, so repeated "address acquired"
//! events collapse into one.

use core::cell::Cell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use heapless::Vec;

use crate::connectivity::{AddressInfo, ConnectivityEvent, DisconnectInfo, LinkInfo};
use crate::timesync::SyncOutcome;

/// A value tagged with the bridge-wide arrival counter at the time it was raised.
#[derive(Debug, Clone, PartialEq)]
pub struct Stamped<T> {
    pub stamp: u32,
    pub value: T,
}

/// Single-slot, overwrite-on-raise event cell.
pub struct EventFlag<T> {
    slot: Mutex<CriticalSectionRawMutex, Cell<Option<Stamped<T>>>>,
}

impl<T> EventFlag<T> {
    pub const fn new() -> Self {
        Self {
            slot: Mutex::new(Cell::new(None)),
        }
    }

    /// Record `value`, replacing any value that has not been drained yet.
    pub fn raise(&self, stamp: u32, value: T) {
        self.slot.lock(|slot| slot.set(Some(Stamped { stamp, value })));
    }

    /// Take the pending value and clear the marker.
    pub fn take(&self) -> Option<Stamped<T>> {
        self.slot.lock(|slot| slot.take())
    }

    pub fn is_pending(&self) -> bool {
        self.slot.lock(|slot| {
            let pending = slot.take();
            let is_some = pending.is_some();
            slot.set(pending);
            is_some
        })
    }
}

impl<T> Default for EventFlag<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// The process-wide set of flags written by collaborator callbacks.
///
/// Collaborators receive a `&'static EventBridge` when they are subscribed and
/// call the `on_*` entry points from their callback context. Everything else is
/// read by [`crate::node::Node`].
pub struct EventBridge {
    arrivals: Mutex<CriticalSectionRawMutex, Cell<u32>>,
    link_up: EventFlag<LinkInfo>,
    address_acquired: EventFlag<AddressInfo>,
    link_down: EventFlag<DisconnectInfo>,
    sync_event: EventFlag<SyncOutcome>,
}

impl EventBridge {
    pub const fn new() -> Self {
        Self {
            arrivals: Mutex::new(Cell::new(0)),
            link_up: EventFlag::new(),
            address_acquired: EventFlag::new(),
            link_down: EventFlag::new(),
            sync_event: EventFlag::new(),
        }
    }

    fn next_stamp(&self) -> u32 {
        self.arrivals.lock(|arrivals| {
            let stamp = arrivals.get().wrapping_add(1);
            arrivals.set(stamp);
            stamp
        })
    }

    /// Station associated with an access point (no address yet).
    pub fn on_link_up(&self, info: LinkInfo) {
        self.link_up.raise(self.next_stamp(), info);
    }

    /// DHCP (or static configuration) produced an address.
    pub fn on_address_acquired(&self, info: AddressInfo) {
        self.address_acquired.raise(self.next_stamp(), info);
    }

    /// Station lost its association.
    pub fn on_link_down(&self, info: DisconnectInfo) {
        self.link_down.raise(self.next_stamp(), info);
    }

    /// The time-sync client finished an attempt.
    pub fn on_sync_event(&self, outcome: SyncOutcome) {
        self.sync_event.raise(self.next_stamp(), outcome);
    }

    /// Drain every pending connectivity event, oldest first.
    pub fn take_connectivity(&self) -> Vec<ConnectivityEvent, 3> {
        let mut pending: Vec<Stamped<ConnectivityEvent>, 3> = Vec::new();
        // At most one entry per flag, so the pushes below cannot overflow
        if let Some(event) = self.link_up.take() {
            let _ = pending.push(Stamped {
                stamp: event.stamp,
                value: ConnectivityEvent::LinkUp(event.value),
            });
        }
        if let Some(event) = self.address_acquired.take() {
            let _ = pending.push(Stamped {
                stamp: event.stamp,
                value: ConnectivityEvent::AddressAcquired(event.value),
            });
        }
        if let Some(event) = self.link_down.take() {
            let _ = pending.push(Stamped {
                stamp: event.stamp,
                value: ConnectivityEvent::LinkDown(event.value),
            });
        }

        // Age relative to the newest stamp stays correct across counter wrap.
        let newest = self.arrivals.lock(|arrivals| arrivals.get());
        pending.sort_unstable_by_key(|event| core::cmp::Reverse(newest.wrapping_sub(event.stamp)));

        pending.into_iter().map(|event| event.value).collect()
    }

    pub fn take_sync_outcome(&self) -> Option<SyncOutcome> {
        self.sync_event.take().map(|event| event.value)
    }

    pub fn has_pending_connectivity(&self) -> bool {
        self.link_up.is_pending() || self.address_acquired.is_pending() || self.link_down.is_pending()
    }

    pub fn has_pending_sync(&self) -> bool {
        self.sync_event.is_pending()
    }
}

impl Default for EventBridge {
    fn default() -> Self {
        Self::new()
    }
}
