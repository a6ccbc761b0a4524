//! SNTP client packet codec (RFC 4330)
//!
//! Shared by the simulator's UDP client and the firmware's embassy-net client.
//! Only the unicast client side is implemented: build a 48-byte mode-3 request
//! and validate the server's mode-4 reply.

use thiserror_no_std::Error;

use crate::time::{NTP_UNIX_OFFSET, Timestamp};
use crate::timesync::SyncFailure;

/// SNTP port (UDP 123)
pub const NTP_PORT: u16 = 123;

pub const NTP_PACKET_SIZE: usize = 48;

/// How long a client waits for a reply before reporting `NoResponse`.
pub const RESPONSE_TIMEOUT_MS: u32 = 5_000;

/// LI = 0, VN = 3, Mode = 3 (client)
const CLIENT_REQUEST_HEADER: u8 = 0x1B;

const MODE_SERVER: u8 = 4;
const MODE_BROADCAST: u8 = 5;

/// Stratum 16 and above means unsynchronized
const MAX_STRATUM: u8 = 15;

/// Seconds in one NTP era (2^32)
const NTP_ERA_SECS: u64 = 1 << 32;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SntpError {
    #[error("server name could not be resolved")]
    UnresolvedHost,
    #[error("network error")]
    Network,
    #[error("no reply before timeout")]
    Timeout,
    #[error("reply too short: {0} bytes")]
    Truncated(usize),
    #[error("unexpected association mode {0}")]
    InvalidMode(u8),
    #[error("kiss-o'-death reply")]
    KissOfDeath,
    #[error("server stratum {0} out of range")]
    InvalidStratum(u8),
    #[error("transmit timestamp out of range")]
    InvalidTimestamp,
}

impl From<SntpError> for SyncFailure {
    fn from(e: SntpError) -> Self {
        match e {
            SntpError::UnresolvedHost => SyncFailure::InvalidAddress,
            _ => SyncFailure::NoResponse,
        }
    }
}

/// Build a client request packet.
pub const fn request_packet() -> [u8; NTP_PACKET_SIZE] {
    let mut packet = [0u8; NTP_PACKET_SIZE];
    packet[0] = CLIENT_REQUEST_HEADER;
    packet
}

/// Validate a server reply and extract its transmit timestamp.
pub fn parse_response(reply: &[u8]) -> Result<Timestamp, SntpError> {
    if reply.len() < NTP_PACKET_SIZE {
        return Err(SntpError::Truncated(reply.len()));
    }

    let mode = reply[0] & 0x07;
    if mode != MODE_SERVER && mode != MODE_BROADCAST {
        return Err(SntpError::InvalidMode(mode));
    }

    match reply[1] {
        0 => return Err(SntpError::KissOfDeath),
        stratum if stratum > MAX_STRATUM => return Err(SntpError::InvalidStratum(stratum)),
        _ => {}
    }

    let secs = u32::from_be_bytes([reply[40], reply[41], reply[42], reply[43]]);
    let fraction = u32::from_be_bytes([reply[44], reply[45], reply[46], reply[47]]);
    if secs == 0 && fraction == 0 {
        return Err(SntpError::InvalidTimestamp);
    }

    // RFC 4330 §3: with the MSB clear the value belongs to era 1 (from 2036)
    let ntp_secs = if secs & 0x8000_0000 == 0 {
        secs as u64 + NTP_ERA_SECS
    } else {
        secs as u64
    };

    if ntp_secs < NTP_UNIX_OFFSET {
        return Err(SntpError::InvalidTimestamp);
    }
    Timestamp::from_ntp(ntp_secs, fraction).ok_or(SntpError::InvalidTimestamp)
}
