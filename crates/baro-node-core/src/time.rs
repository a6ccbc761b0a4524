//! Wall-clock timestamps and calendar conversion
//!
//! Uses Howard Hinnant's `civil_from_days` algorithm
//! (<http://howardhinnant.github.io/date_algorithms.html>), which is O(1) and
//! correct for every date of the proleptic Gregorian calendar, so no calendar
//! crate is pulled into the firmware image.

use core::fmt;

/// Seconds between the NTP era-0 epoch (1900-01-01) and the Unix epoch.
pub const NTP_UNIX_OFFSET: u64 = 2_208_988_800;

const SECONDS_PER_DAY: i64 = 86_400;

/// A UTC instant with microsecond resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp {
    pub unix_secs: u64,
    pub micros: u32,
}

impl Timestamp {
    pub const fn from_unix(unix_secs: u64) -> Self {
        Self {
            unix_secs,
            micros: 0,
        }
    }

    /// Convert NTP seconds-since-1900 plus a 32-bit binary fraction.
    ///
    /// Returns `None` for instants before the Unix epoch.
    pub fn from_ntp(ntp_secs: u64, fraction: u32) -> Option<Self> {
        let unix_secs = ntp_secs.checked_sub(NTP_UNIX_OFFSET)?;
        let micros = ((fraction as u64 * 1_000_000) >> 32) as u32;
        Some(Self { unix_secs, micros })
    }

    /// Broken-down local time at `offset` from UTC.
    pub fn to_local(self, offset: UtcOffset) -> LocalDateTime {
        let local = self.unix_secs as i64 + offset.as_secs();
        let days = local.div_euclid(SECONDS_PER_DAY);
        let secs_today = local.rem_euclid(SECONDS_PER_DAY);
        let (year, month, day) = civil_from_days(days);

        LocalDateTime {
            year,
            month,
            day,
            hour: (secs_today / 3600) as u8,
            minute: ((secs_today % 3600) / 60) as u8,
            second: (secs_today % 60) as u8,
        }
    }
}

/// Fixed offset from UTC, expressed the way the sync cadence is configured.
///
/// A non-zero minute part takes the sign of the hour part, so `(-3, 30)` is
/// UTC-03:30. With a zero hour part the minutes keep their own sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UtcOffset {
    pub hours: i8,
    pub minutes: i8,
}

impl UtcOffset {
    pub const UTC: Self = Self::new(0, 0);

    pub const fn new(hours: i8, minutes: i8) -> Self {
        Self { hours, minutes }
    }

    pub const fn as_secs(self) -> i64 {
        let hours = self.hours as i64 * 3600;
        let minutes = self.minutes as i64 * 60;
        if self.hours < 0 {
            hours - minutes.abs()
        } else if self.hours > 0 {
            hours + minutes.abs()
        } else {
            minutes
        }
    }
}

/// Calendar date and time of day. Displays as `HH:MM:SS DD/MM/YYYY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalDateTime {
    pub year: i32,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl fmt::Display for LocalDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02} {:02}/{:02}/{:04}",
            self.hour, self.minute, self.second, self.day, self.month, self.year
        )
    }
}

pub const fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Days since 1970-01-01 to (year, month, day).
fn civil_from_days(days_since_epoch: i64) -> (i32, u8, u8) {
    // Shift the epoch to 0000-03-01 so the leap day ends the year
    let z = days_since_epoch + 719_468;
    let era = (if z >= 0 { z } else { z - 146_096 }) / 146_097;
    let doe = (z - era * 146_097) as u32; // [0, 146096]
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365; // [0, 399]
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100); // [0, 365]
    let mp = (5 * doy + 2) / 153; // March = 0
    let day = (doy - (153 * mp + 2) / 5 + 1) as u8;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u8;
    let year = yoe as i64 + era * 400 + if month <= 2 { 1 } else { 0 };

    (year as i32, month, day)
}
