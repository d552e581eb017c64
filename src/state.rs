//! Persisted farm state and the per-cycle sensor reading.
//!
//! `FarmConfig`, `DeviceState` and `SensorThresholds` live in the state
//! store (see [`StatePort`](crate::app::ports::StatePort)); the control
//! loop re-reads them every cycle because the external API may rewrite
//! them between cycles.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

// ---------------------------------------------------------------------------
// Farm configuration
// ---------------------------------------------------------------------------

/// Singleton farm row.  `auto` selects the mode; `duration_secs` bounds
/// a manual override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FarmConfig {
    pub farm_id: i64,
    pub auto: bool,
    #[serde(rename = "duration")]
    pub duration_secs: u32,
    #[serde(default)]
    pub plant: Option<String>,
}

impl Default for FarmConfig {
    fn default() -> Self {
        Self {
            farm_id: 34,
            auto: true,
            duration_secs: 0,
            plant: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Devices
// ---------------------------------------------------------------------------

/// The five actuators the controller drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    Led,
    Fan,
    Cooler,
    Water,
    Heater,
}

impl Device {
    /// Every device, in the order they are applied and reported.
    pub const ALL: [Device; 5] = [
        Device::Led,
        Device::Fan,
        Device::Cooler,
        Device::Water,
        Device::Heater,
    ];

    /// Wire name used in endpoint paths and payloads.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Led => "led",
            Self::Fan => "fan",
            Self::Cooler => "cooler",
            Self::Water => "water",
            Self::Heater => "heater",
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Device {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Device::ALL
            .into_iter()
            .find(|d| d.name() == s)
            .ok_or(Error::UnknownDevice)
    }
}

/// Last commanded state of every actuator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceState {
    pub led: bool,
    pub fan: bool,
    pub cooler: bool,
    pub water: bool,
    pub heater: bool,
}

impl DeviceState {
    /// Everything off: the safe state.
    pub const fn all_off() -> Self {
        Self {
            led: false,
            fan: false,
            cooler: false,
            water: false,
            heater: false,
        }
    }

    pub fn get(&self, device: Device) -> bool {
        match device {
            Device::Led => self.led,
            Device::Fan => self.fan,
            Device::Cooler => self.cooler,
            Device::Water => self.water,
            Device::Heater => self.heater,
        }
    }

    pub fn set(&mut self, device: Device, on: bool) {
        match device {
            Device::Led => self.led = on,
            Device::Fan => self.fan = on,
            Device::Cooler => self.cooler = on,
            Device::Water => self.water = on,
            Device::Heater => self.heater = on,
        }
    }
}

/// A single device write requested from outside the control loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceUpdate {
    pub device: Device,
    pub on: bool,
}

impl DeviceUpdate {
    /// Build an update from a wire device name and a 0/1 status.
    ///
    /// Unknown names are rejected rather than passed on to the store.
    pub fn parse(name: &str, status: u8) -> Result<Self, Error> {
        let device = name.parse::<Device>().inspect_err(|_| {
            log::warn!("Rejected update for unknown device '{}'", name);
        })?;
        Ok(Self {
            device,
            on: status != 0,
        })
    }
}

// ---------------------------------------------------------------------------
// Thresholds
// ---------------------------------------------------------------------------

/// Per-quantity operating band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorThresholds {
    pub tmin: f32,
    pub tmax: f32,
    pub hmin: f32,
    pub hmax: f32,
    pub smin: f32,
    pub smax: f32,
    pub cmin: f32,
    pub cmax: f32,
}

impl Default for SensorThresholds {
    fn default() -> Self {
        Self {
            tmin: 15.0,
            tmax: 20.0,
            hmin: 60.0,
            hmax: 70.0,
            smin: 800.0,
            smax: 1200.0,
            cmin: 65.0,
            cmax: 80.0,
        }
    }
}

/// `{optimal_min, optimal_max}` pair as sent by the farm provisioning API.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptimalRange {
    pub optimal_min: f32,
    pub optimal_max: f32,
}

/// Growing conditions for every monitored quantity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FarmConditions {
    pub temperature: OptimalRange,
    pub humidity: OptimalRange,
    pub soil_moisture: OptimalRange,
    pub co2: OptimalRange,
}

impl From<FarmConditions> for SensorThresholds {
    fn from(c: FarmConditions) -> Self {
        Self {
            tmin: c.temperature.optimal_min,
            tmax: c.temperature.optimal_max,
            hmin: c.humidity.optimal_min,
            hmax: c.humidity.optimal_max,
            smin: c.soil_moisture.optimal_min,
            smax: c.soil_moisture.optimal_max,
            cmin: c.co2.optimal_min,
            cmax: c.co2.optimal_max,
        }
    }
}

/// Farm provisioning record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FarmInit {
    pub farm_id: i64,
    pub farm_type: String,
    pub conditions: FarmConditions,
}

// ---------------------------------------------------------------------------
// Sensor reading
// ---------------------------------------------------------------------------

/// One calibrated reading per quantity, produced fresh each cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SensorReading {
    /// Air temperature (°C).
    pub temperature: f32,
    /// Relative humidity (%).
    pub humidity: f32,
    /// Soil moisture (%), 0 = dry, 100 = saturated.
    pub soil_moisture: f32,
    /// CO2 concentration (ppm).
    pub co2: u32,
}
