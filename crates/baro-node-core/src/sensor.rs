//! Sensor collaborator contract
//!
//! The node samples a single Bosch BME280 (or its humidity-less BMP280 sibling).
//! A failed bus read is reported through sentinel values, not an error channel:
//! every field of [`SensorReading::FAILED`] is NaN.

use core::fmt::Debug;

/// Snapshot of one sensor read. Created per sampling tick and never retained.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorReading {
    pub temperature_celsius: f32,
    /// `None` on sensor variants without a humidity channel
    pub humidity_percent: Option<f32>,
    pub pressure_hpa: f32,
}

impl SensorReading {
    /// Sentinel produced when the peripheral read fails.
    pub const FAILED: Self = Self {
        temperature_celsius: f32::NAN,
        humidity_percent: Some(f32::NAN),
        pressure_hpa: f32::NAN,
    };

    pub const fn new(temperature_celsius: f32, humidity_percent: Option<f32>, pressure_hpa: f32) -> Self {
        Self {
            temperature_celsius,
            humidity_percent,
            pressure_hpa,
        }
    }

    /// `false` if any present channel carries the NaN sentinel.
    pub fn is_valid(&self) -> bool {
        !self.temperature_celsius.is_nan()
            && !self.pressure_hpa.is_nan()
            && !self.humidity_percent.is_some_and(f32::is_nan)
    }
}

/// Chip identified during sensor bring-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorModel {
    Bme280,
    Bmp280,
    Unknown,
}

impl SensorModel {
    /// Map the chip-id register (0xD0) of the Bosch family.
    pub const fn from_chip_id(id: u8) -> Self {
        match id {
            0x60 => Self::Bme280,
            0x56..=0x58 => Self::Bmp280,
            _ => Self::Unknown,
        }
    }

    pub const fn has_humidity(self) -> bool {
        matches!(self, Self::Bme280)
    }

    /// Console line printed once the sensor answers.
    pub const fn detection_message(self) -> &'static str {
        match self {
            Self::Bme280 => "Found BME280 sensor! Success.",
            Self::Bmp280 => "Found BMP280 sensor! No Humidity available.",
            Self::Unknown => "Found UNKNOWN sensor! Error!",
        }
    }
}

/// Environmental sensor collaborator.
pub trait EnvironmentSensor {
    type Error: Debug;

    /// Probe and configure the chip.
    fn begin(&mut self) -> Result<SensorModel, Self::Error>;

    /// Synchronous, bounded read. Returns [`SensorReading::FAILED`] (or NaN
    /// fields) when the bus transaction fails.
    fn read(&mut self) -> SensorReading;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_is_invalid() {
        assert!(!SensorReading::FAILED.is_valid());
        assert!(SensorReading::new(21.3, Some(45.2), 1013.2).is_valid());
        assert!(SensorReading::new(21.3, None, 1013.2).is_valid());
        assert!(!SensorReading::new(21.3, Some(f32::NAN), 1013.2).is_valid());
    }

    #[test]
    fn test_chip_ids() {
        assert_eq!(SensorModel::from_chip_id(0x60), SensorModel::Bme280);
        assert_eq!(SensorModel::from_chip_id(0x58), SensorModel::Bmp280);
        assert_eq!(SensorModel::from_chip_id(0x00), SensorModel::Unknown);
        assert!(SensorModel::Bme280.has_humidity());
        assert!(!SensorModel::Bmp280.has_humidity());
    }
}
