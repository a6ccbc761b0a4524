//! Bosch BME280 / BMP280 adapter over the `bme280` driver crate.
//!
//! The chip-id register is read once before the driver takes the bus, which is
//! how a humidity-less BMP280 is told apart. Each read runs one forced-mode
//! measurement through the driver.

use bme280::i2c::BME280;
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use log::{debug, error};
use thiserror_no_std::Error;

use crate::sensor::{EnvironmentSensor, SensorModel, SensorReading};

/// SDO tied low
pub const PRIMARY_ADDRESS: u8 = 0x76;

const REG_CHIP_ID: u8 = 0xD0;

#[derive(Error, Debug)]
pub enum Bme280Error<E> {
    #[error("I2C transfer failed: {0:?}")]
    Bus(E),
    #[error("unexpected chip id {0:#04x}")]
    UnsupportedChip(u8),
    #[error("BME280 driver error: {0:?}")]
    Driver(bme280::Error<E>),
    #[error("chip not detected yet")]
    NotDetected,
}

pub struct Bme280Sensor<I, D> {
    address: u8,
    delay: D,
    model: SensorModel,
    /// Held until the chip id checks out, then handed to the driver
    bus: Option<I>,
    sensor: Option<BME280<I>>,
    ready: bool,
}

impl<I: I2c, D: DelayNs> Bme280Sensor<I, D> {
    pub fn new(i2c: I, address: u8, delay: D) -> Self {
        Self {
            address,
            delay,
            model: SensorModel::Unknown,
            bus: Some(i2c),
            sensor: None,
            ready: false,
        }
    }

    pub const fn model(&self) -> SensorModel {
        self.model
    }

    fn detect(&mut self, mut bus: I) -> Result<(), Bme280Error<I::Error>> {
        let mut id = [0u8; 1];
        if let Err(e) = bus.write_read(self.address, &[REG_CHIP_ID], &mut id) {
            self.bus = Some(bus);
            return Err(Bme280Error::Bus(e));
        }

        let model = SensorModel::from_chip_id(id[0]);
        if model == SensorModel::Unknown {
            self.bus = Some(bus);
            return Err(Bme280Error::UnsupportedChip(id[0]));
        }

        self.model = model;
        self.sensor = Some(BME280::new(bus, self.address));
        Ok(())
    }
}

impl<I: I2c, D: DelayNs> EnvironmentSensor for Bme280Sensor<I, D> {
    type Error = Bme280Error<I::Error>;

    fn begin(&mut self) -> Result<SensorModel, Self::Error> {
        if let Some(bus) = self.bus.take() {
            self.detect(bus)?;
        }

        let sensor = self.sensor.as_mut().ok_or(Bme280Error::NotDetected)?;
        sensor.init(&mut self.delay).map_err(Bme280Error::Driver)?;
        self.ready = true;

        debug!("{:?} configured at {:#04x}", self.model, self.address);
        Ok(self.model)
    }

    fn read(&mut self) -> SensorReading {
        let Some(sensor) = self.sensor.as_mut().filter(|_| self.ready) else {
            error!("BME280 read before a successful begin");
            return SensorReading::FAILED;
        };

        match sensor.measure(&mut self.delay) {
            Ok(m) => SensorReading::new(
                m.temperature,
                self.model.has_humidity().then_some(m.humidity),
                m.pressure / 100.0,
            ),
            Err(e) => {
                error!("BME280 measurement failed: {:?}", e);
                SensorReading::FAILED
            }
        }
    }
}
