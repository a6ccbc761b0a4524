//! Time-sync coordination
//!
//! The coordinator owns the [`SyncCadence`], starts the time-sync client when
//! the connectivity tracker reports a fresh address, and classifies each sync
//! outcome drained off the bridge into a user-visible [`SyncReport`]. It never
//! retries on its own: the client's periodic re-trigger is the only retry.

use core::fmt::{self, Debug};

use thiserror_no_std::Error;

use crate::events::EventBridge;
use crate::time::{LocalDateTime, Timestamp, UtcOffset};

/// How and when time synchronization is attempted. Fixed once the node starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncCadence {
    pub server: &'static str,
    pub utc_offset_hours: i8,
    pub utc_offset_minutes: i8,
    pub resync_interval_secs: u32,
    /// Issue the first request as soon as the client starts instead of
    /// waiting one resync interval.
    pub apply_immediately: bool,
}

impl SyncCadence {
    pub const fn offset(&self) -> UtcOffset {
        UtcOffset::new(self.utc_offset_hours, self.utc_offset_minutes)
    }
}

/// Why a sync attempt failed.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncFailure {
    #[error("NTP server not reachable")]
    NoResponse,
    #[error("Invalid NTP server address")]
    InvalidAddress,
}

/// What the time-sync client reports through [`EventBridge::on_sync_event`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    Success(Timestamp),
    Failure(SyncFailure),
}

/// Time-sync collaborator (an SNTP client).
///
/// `begin` must not block: the exchange completes later and its result is
/// delivered via the subscribed bridge, from inside [`TimeSyncClient::service`]
/// or another call the main loop makes.
pub trait TimeSyncClient {
    type Error: Debug;

    fn subscribe(&mut self, bridge: &'static EventBridge);

    fn begin(
        &mut self,
        server: &str,
        utc_offset_hours: i8,
        apply_immediately: bool,
        utc_offset_minutes: i8,
    ) -> Result<(), Self::Error>;

    /// Period of the client's own re-trigger.
    fn set_interval(&mut self, seconds: u32) -> Result<(), Self::Error>;

    /// Housekeeping hook run while the main loop yields.
    fn service(&mut self) {}
}

/// Classified result of one drained [`SyncOutcome`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncReport {
    Synced(LocalDateTime),
    Failed(SyncFailure),
}

impl SyncReport {
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Synced(_))
    }
}

impl fmt::Display for SyncReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Synced(local) => write!(f, "Got NTP time: {local}"),
            Self::Failed(reason) => write!(f, "Time Sync error: {reason}"),
        }
    }
}

pub struct TimeSyncCoordinator {
    cadence: SyncCadence,
    starts: u32,
    last_sync: Option<Timestamp>,
}

impl TimeSyncCoordinator {
    pub const fn new(cadence: SyncCadence) -> Self {
        Self {
            cadence,
            starts: 0,
            last_sync: None,
        }
    }

    pub const fn cadence(&self) -> &SyncCadence {
        &self.cadence
    }

    /// Number of times the client has been (re)started.
    pub const fn starts(&self) -> u32 {
        self.starts
    }

    /// Timestamp carried by the most recent successful outcome.
    pub const fn last_sync(&self) -> Option<Timestamp> {
        self.last_sync
    }

    /// Issue one sync attempt and arm the periodic re-trigger.
    pub fn start<T: TimeSyncClient>(&mut self, client: &mut T) -> Result<(), T::Error> {
        let cadence = self.cadence;
        client.begin(
            cadence.server,
            cadence.utc_offset_hours,
            cadence.apply_immediately,
            cadence.utc_offset_minutes,
        )?;
        client.set_interval(cadence.resync_interval_secs)?;
        self.starts = self.starts.wrapping_add(1);
        Ok(())
    }

    pub fn classify(&mut self, outcome: SyncOutcome) -> SyncReport {
        match outcome {
            SyncOutcome::Success(timestamp) => {
                self.last_sync = Some(timestamp);
                SyncReport::Synced(timestamp.to_local(self.cadence.offset()))
            }
            SyncOutcome::Failure(reason) => SyncReport::Failed(reason),
        }
    }
}
