//! Controller configuration parameters.
//!
//! All tunable parameters for the greenhouse controller.  Loaded from a
//! JSON file at startup; any field missing from the file keeps its default.

use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::pins;

/// Core controller configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    // --- Remote service ---
    /// Base URL of the coordination service (no trailing slash).
    pub server_url: String,
    /// Upper bound for each HTTP request (milliseconds).
    pub request_timeout_ms: u64,

    // --- Timing ---
    /// Delay before each cycle (milliseconds).
    pub poll_interval_ms: u64,
    /// Delay after each cycle (milliseconds).
    pub settle_interval_ms: u64,
    /// Consecutive escalated cycle errors tolerated before exiting.
    pub max_consecutive_failures: u32,

    // --- Storage ---
    /// Path of the persisted farm state document.
    pub state_path: String,
    /// Farm id used when seeding a fresh state store.
    pub default_farm_id: i64,

    // --- Hardware ---
    pub pins: PinMap,
    pub soil_channel: u8,
    pub co2_channel: u8,

    // --- Calibration ---
    pub calibration: CalibrationConfig,

    // --- Lighting ---
    /// First hour (inclusive) the grow lights are on.
    pub light_on_hour: u8,
    /// First hour (exclusive) the grow lights are off again.
    pub light_off_hour: u8,
}

/// Output/input pin numbers (BCM).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct PinMap {
    pub led: u8,
    pub fan: u8,
    pub cooler: u8,
    pub water: u8,
    pub heater: u8,
    pub dht: u8,
}

impl Default for PinMap {
    fn default() -> Self {
        Self {
            led: pins::LED_GPIO,
            fan: pins::FAN_GPIO,
            cooler: pins::COOLER_GPIO,
            water: pins::WATER_GPIO,
            heater: pins::HEATER_GPIO,
            dht: pins::DHT_GPIO,
        }
    }
}

/// Analog front-end and sensor calibration constants.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationConfig {
    /// ADC reference voltage.
    pub vref: f32,
    /// Full-scale ADC code.
    pub adc_max: f32,
    /// Upper divider resistor (ohms).
    pub r1_ohms: f32,
    /// Lower divider resistor (ohms).
    pub r2_ohms: f32,
    /// CO2 curve intercept.
    pub cal_a: f32,
    /// CO2 curve slope.
    pub cal_b: f32,
    /// Soil probe code in dry air.
    pub soil_dry: u16,
    /// Soil probe code in water.
    pub soil_wet: u16,
    /// Settle time before baseline sampling (milliseconds).
    pub baseline_settle_ms: u32,
    /// Number of baseline samples.
    pub baseline_samples: u16,
    /// Spacing between baseline samples (milliseconds).
    pub baseline_interval_ms: u32,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            vref: 3.3,
            adc_max: 1023.0,
            r1_ohms: 23_500.0,
            r2_ohms: 10_000.0,
            cal_a: 1.703,
            cal_b: 0.2677,
            soil_dry: 1022,
            soil_wet: 356,
            baseline_settle_ms: 3000,
            baseline_samples: 30,
            baseline_interval_ms: 200,
        }
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:8080".into(),
            request_timeout_ms: 5000,

            poll_interval_ms: 5000,
            settle_interval_ms: 1000,
            max_consecutive_failures: 3,

            state_path: "farm.json".into(),
            default_farm_id: 34,

            pins: PinMap::default(),
            soil_channel: pins::SOIL_ADC_CHANNEL,
            co2_channel: pins::CO2_ADC_CHANNEL,

            calibration: CalibrationConfig::default(),

            light_on_hour: 6,
            light_off_hour: 22,
        }
    }
}

impl ControllerConfig {
    /// Load from `path`, falling back to defaults when the file is absent.
    pub fn load(path: &Path) -> Result<Self> {
        let cfg = match std::fs::read(path) {
            Ok(bytes) => {
                let cfg: Self = serde_json::from_slice(&bytes)
                    .map_err(|_| Error::Config("config file is not valid JSON"))?;
                info!("Config loaded from {}", path.display());
                cfg
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("No config at {}, using defaults", path.display());
                Self::default()
            }
            Err(_) => return Err(Error::Config("config file unreadable")),
        };
        validate_config(&cfg)?;
        Ok(cfg)
    }
}

/// Reject values that would make the control loop misbehave.
pub fn validate_config(cfg: &ControllerConfig) -> Result<()> {
    if !(cfg.server_url.starts_with("http://") || cfg.server_url.starts_with("https://")) {
        return Err(Error::Config("server_url must be an http(s) URL"));
    }
    if cfg.server_url.ends_with('/') {
        return Err(Error::Config("server_url must not end with '/'"));
    }
    if !(100..=60_000).contains(&cfg.request_timeout_ms) {
        return Err(Error::Config("request_timeout_ms must be 100–60000"));
    }
    if cfg.poll_interval_ms == 0 {
        return Err(Error::Config("poll_interval_ms must be > 0"));
    }
    if cfg.max_consecutive_failures == 0 {
        return Err(Error::Config("max_consecutive_failures must be > 0"));
    }
    if cfg.soil_channel > 7 || cfg.co2_channel > 7 {
        return Err(Error::Config("ADC channels must be 0–7"));
    }
    if cfg.light_on_hour > 23 || cfg.light_off_hour > 24 {
        return Err(Error::Config("lighting hours out of range"));
    }
    if cfg.light_on_hour >= cfg.light_off_hour {
        return Err(Error::Config("light_on_hour must be before light_off_hour"));
    }
    let c = &cfg.calibration;
    if c.soil_wet >= c.soil_dry {
        return Err(Error::Config("soil_wet must be below soil_dry"));
    }
    if c.r2_ohms <= 0.0 || c.adc_max <= 0.0 || c.vref <= 0.0 {
        return Err(Error::Config("divider, reference and full-scale must be positive"));
    }
    if c.cal_b == 0.0 {
        return Err(Error::Config("cal_b must be non-zero"));
    }
    if c.baseline_samples == 0 {
        return Err(Error::Config("baseline_samples must be > 0"));
    }
    Ok(())
}
