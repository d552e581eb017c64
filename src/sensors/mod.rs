//! Sensor subsystem: individual conversions and the aggregating [`SensorHub`].
//!
//! The hub owns the calibration state and per-quantity fallback values and
//! produces one [`SensorReading`] per cycle.

pub mod adc;
pub mod calibration;
pub mod climate;

use heapless::Vec;
use log::{debug, warn};

use crate::app::ports::{AdcPort, ClimatePort};
use crate::error::Result;
use crate::state::SensorReading;
use calibration::{Co2Calibration, MoistureCalibration};
use climate::{ClimateRead, ClimateReader};

/// Quantities the hub measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantity {
    Climate,
    SoilMoisture,
    Co2,
}

/// Result of one acquisition pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Acquisition {
    /// `None` until every quantity has produced at least one value.
    pub reading: Option<SensorReading>,
    /// Quantities that fell back to a stale value (or had none) this cycle.
    pub degraded: Vec<Quantity, 3>,
}

/// Aggregates every sensor and produces a unified reading.
pub struct SensorHub {
    climate: ClimateReader,
    soil_channel: u8,
    co2_channel: u8,
    moisture: MoistureCalibration,
    co2: Co2Calibration,
    last_soil: Option<f32>,
    last_co2: Option<u32>,
}

impl SensorHub {
    /// Build a hub.  The CO2 baseline must already be measured.
    pub fn new(
        soil_channel: u8,
        co2_channel: u8,
        moisture: MoistureCalibration,
        co2: Co2Calibration,
    ) -> Result<Self> {
        adc::check_channel(soil_channel)?;
        adc::check_channel(co2_channel)?;
        Ok(Self {
            climate: ClimateReader::new(),
            soil_channel,
            co2_channel,
            moisture,
            co2,
            last_soil: None,
            last_co2: None,
        })
    }

    /// Read every sensor.
    ///
    /// Individual read failures are logged and the previous good value is
    /// retained: a single flaky sensor must not abort the cycle.
    pub fn acquire(&mut self, hw: &mut (impl AdcPort + ClimatePort)) -> Acquisition {
        let mut degraded = Vec::new();

        let climate = self.climate.read(hw);
        if !matches!(climate, ClimateRead::Fresh(_)) {
            let _ = degraded.push(Quantity::Climate);
        }

        match hw.read_channel(self.soil_channel) {
            Ok(raw) => self.last_soil = Some(self.moisture.to_percent(raw)),
            Err(e) => {
                warn!("Soil moisture read failed: {}", e);
                let _ = degraded.push(Quantity::SoilMoisture);
            }
        }

        match hw.read_channel(self.co2_channel) {
            Ok(raw) => self.last_co2 = Some(self.co2.to_co2_ppm(raw)),
            Err(e) => {
                warn!("CO2 read failed: {}", e);
                let _ = degraded.push(Quantity::Co2);
            }
        }

        let reading = match (climate.sample(), self.last_soil, self.last_co2) {
            (Some(c), Some(soil_moisture), Some(co2)) => Some(SensorReading {
                temperature: c.temperature_c,
                humidity: c.humidity_pct,
                soil_moisture,
                co2,
            }),
            _ => None,
        };

        if let Some(r) = &reading {
            debug!(
                "Temp: {:.2}, Humi: {:.2}, Soil: {:.1}, CO2: {}",
                r.temperature, r.humidity, r.soil_moisture, r.co2
            );
        }

        Acquisition { reading, degraded }
    }
}
