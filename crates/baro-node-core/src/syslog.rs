//! BSD syslog framing
//!
//! Frames follow the RFC 3164 layout without the timestamp field, which the
//! collector fills in on receipt:
//!
//! ```text
//! <PRI>HOSTNAME APP-NAME: MESSAGE
//! ```
//!
//! `PRI` is `facility * 8 + severity`. Transport is left to the sink (UDP on
//! both the simulator and the firmware).

use core::fmt::Write;

use thiserror_no_std::Error;

/// Longest frame a sink will emit
pub const MAX_FRAME_LEN: usize = 256;

pub type SyslogFrame = heapless::String<MAX_FRAME_LEN>;

/// Message severity, most severe first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum Severity {
    Emergency = 0,
    Alert = 1,
    Critical = 2,
    Error = 3,
    Warning = 4,
    Notice = 5,
    Info = 6,
    Debug = 7,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Facility {
    Kern = 0,
    User = 1,
    Daemon = 3,
    Local0 = 16,
    Local1 = 17,
    Local2 = 18,
    Local3 = 19,
    Local4 = 20,
    Local5 = 21,
    Local6 = 22,
    Local7 = 23,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyslogError {
    #[error("frame exceeds the syslog frame limit")]
    FrameTooLong,
    #[error("severity {0:?} is below the configured mask")]
    Masked(Severity),
}

pub const fn priority(facility: Facility, severity: Severity) -> u8 {
    ((facility as u8) << 3) | severity as u8
}

/// Where and as whom the node logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyslogConfig {
    pub server: &'static str,
    pub port: u16,
    pub hostname: &'static str,
    pub app_name: &'static str,
    pub facility: Facility,
    /// Least severe level still sent
    pub min_severity: Severity,
}

impl SyslogConfig {
    pub fn accepts(&self, severity: Severity) -> bool {
        severity <= self.min_severity
    }

    /// Build the datagram payload for one message.
    pub fn frame(&self, severity: Severity, message: &str) -> Result<SyslogFrame, SyslogError> {
        if !self.accepts(severity) {
            return Err(SyslogError::Masked(severity));
        }

        let mut frame = SyslogFrame::new();
        write!(
            frame,
            "<{}>{} {}: {}",
            priority(self.facility, severity),
            self.hostname,
            self.app_name,
            message
        )
        .map_err(|_| SyslogError::FrameTooLong)?;
        Ok(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SYSLOG;

    #[test]
    fn test_priority() {
        assert_eq!(priority(Facility::Kern, Severity::Info), 6);
        assert_eq!(priority(Facility::User, Severity::Error), 11);
        assert_eq!(priority(Facility::Local7, Severity::Debug), 191);
    }

    #[test]
    fn test_frame_layout() {
        let frame = SYSLOG.frame(Severity::Info, "Device setup").unwrap();
        assert_eq!(frame.as_str(), "<6>D1-mini BME280: Device setup");
    }

    #[test]
    fn test_mask_filters_less_severe_levels() {
        let config = SyslogConfig {
            min_severity: Severity::Warning,
            ..SYSLOG
        };
        assert!(config.frame(Severity::Error, "disk").is_ok());
        assert!(config.frame(Severity::Warning, "disk").is_ok());
        assert_eq!(
            config.frame(Severity::Info, "disk"),
            Err(SyslogError::Masked(Severity::Info))
        );
    }

    #[test]
    fn test_oversized_message_is_rejected() {
        let long = "x".repeat(MAX_FRAME_LEN);
        assert_eq!(
            SYSLOG.frame(Severity::Info, &long),
            Err(SyslogError::FrameTooLong)
        );
    }
}
