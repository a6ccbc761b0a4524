//! Reporting sink fan-out
//!
//! Each sample is formatted once per sink and handed to the local console and
//! the remote log. The console write always happens first and unconditionally.
//! The remote send is fire-and-forget: its error is swallowed here and never
//! reaches the scheduler.

use core::fmt::{self, Debug, Write};

use log::{debug, warn};

use crate::sensor::SensorReading;
use crate::syslog::Severity;

/// Wide enough for three fully expanded `f32` values plus labels
pub const LINE_CAPACITY: usize = 192;

pub type Line = heapless::String<LINE_CAPACITY>;

/// Local, line-buffered, always available text output.
pub trait ConsoleSink {
    fn write_line(&mut self, line: &str);
}

/// Remote log collaborator. Callers do not act on the result.
pub trait LogSink {
    type Error: Debug;

    fn send(&mut self, severity: Severity, message: &str) -> Result<(), Self::Error>;
}

/// Fixed-width, one decimal. Absent channels render as `n/a`.
struct Field {
    value: Option<f32>,
    width: usize,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            Some(value) => write!(f, "{:>width$.1}", value, width = self.width),
            None => write!(f, "{:>width$}", "n/a", width = self.width),
        }
    }
}

fn fields(reading: &SensorReading) -> (Field, Field, Field) {
    (
        Field {
            value: Some(reading.temperature_celsius),
            width: 4,
        },
        Field {
            value: reading.humidity_percent,
            width: 4,
        },
        Field {
            value: Some(reading.pressure_hpa),
            width: 5,
        },
    )
}

/// `Temperature: 21.3 °C\t\tHumidity: 45.2% RH\t\tPressure: 1013.2 hPa`
pub fn console_line(reading: &SensorReading) -> Line {
    let (temperature, humidity, pressure) = fields(reading);
    let mut line = Line::new();
    let _ = write!(
        line,
        "Temperature: {temperature} °C\t\tHumidity: {humidity}% RH\t\tPressure: {pressure} hPa"
    );
    line
}

/// `Temp 21.3, Humi 45.2, Pres 1013.2`
pub fn remote_line(reading: &SensorReading) -> Line {
    let (temperature, humidity, pressure) = fields(reading);
    let mut line = Line::new();
    let _ = write!(line, "Temp {temperature}, Humi {humidity}, Pres {pressure}");
    line
}

/// Owns both sinks and keeps their failures isolated.
pub struct Reporter<C, L> {
    console: C,
    remote: L,
}

impl<C: ConsoleSink, L: LogSink> Reporter<C, L> {
    pub const fn new(console: C, remote: L) -> Self {
        Self { console, remote }
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    pub fn remote(&self) -> &L {
        &self.remote
    }

    pub fn console_line(&mut self, line: &str) {
        self.console.write_line(line);
    }

    /// Format into a bounded line and write it to the console.
    pub fn console_fmt(&mut self, args: fmt::Arguments<'_>) {
        let mut line = Line::new();
        if line.write_fmt(args).is_err() {
            debug!("console line truncated at {} bytes", LINE_CAPACITY);
        }
        self.console.write_line(&line);
    }

    /// Send to the remote log, dropping any failure.
    pub fn remote_log(&mut self, severity: Severity, message: &str) {
        if let Err(e) = self.remote.send(severity, message) {
            debug!("remote log send dropped: {:?}", e);
        }
    }

    /// Fan one reading out to both sinks, console first.
    pub fn report(&mut self, reading: &SensorReading) {
        if !reading.is_valid() {
            warn!("sensor returned sentinel values, reporting them unchanged");
        }
        self.console.write_line(&console_line(reading));
        self.remote_log(Severity::Info, &remote_line(reading));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{RecordingConsole, RecordingLog};

    #[test]
    fn test_console_line_format() {
        let reading = SensorReading::new(21.3, Some(45.2), 1013.2);
        assert_eq!(
            console_line(&reading).as_str(),
            "Temperature: 21.3 °C\t\tHumidity: 45.2% RH\t\tPressure: 1013.2 hPa"
        );
    }

    #[test]
    fn test_fixed_width_padding() {
        let reading = SensorReading::new(5.04, Some(9.0), 980.0);
        assert_eq!(
            remote_line(&reading).as_str(),
            "Temp  5.0, Humi  9.0, Pres 980.0"
        );
    }

    #[test]
    fn test_missing_humidity() {
        let reading = SensorReading::new(-3.27, None, 1001.0);
        assert_eq!(
            remote_line(&reading).as_str(),
            "Temp -3.3, Humi  n/a, Pres 1001.0"
        );
    }

    #[test]
    fn test_console_written_even_when_remote_fails() {
        let mut reporter = Reporter::new(
            RecordingConsole::default(),
            RecordingLog {
                fail: true,
                ..Default::default()
            },
        );

        reporter.report(&SensorReading::new(21.3, Some(45.2), 1013.2));

        assert_eq!(reporter.console().lines.len(), 1);
        assert!(reporter.console().lines[0].starts_with("Temperature: 21.3"));
        assert_eq!(reporter.remote().attempts, 1);
        assert!(reporter.remote().sent.is_empty());
    }

    #[test]
    fn test_remote_gets_info_line() {
        let mut reporter = Reporter::new(RecordingConsole::default(), RecordingLog::default());
        reporter.report(&SensorReading::new(21.3, Some(45.2), 1013.2));
        assert_eq!(
            reporter.remote().sent,
            vec![(Severity::Info, "Temp 21.3, Humi 45.2, Pres 1013.2".to_string())]
        );
    }

    #[test]
    fn test_sentinel_reading_still_reported() {
        let mut reporter = Reporter::new(RecordingConsole::default(), RecordingLog::default());
        reporter.report(&SensorReading::FAILED);
        assert_eq!(
            reporter.console().lines,
            vec!["Temperature:  NaN °C\t\tHumidity:  NaN% RH\t\tPressure:   NaN hPa".to_string()]
        );
        assert_eq!(reporter.remote().sent.len(), 1);
    }
}
