//! Mock adapters for integration tests.
//!
//! Records every output write and every remote post so tests can assert
//! on the full history without touching real GPIO or the network.

use std::cell::Cell;
use std::collections::HashMap;

use greenhouse::app::events::AppEvent;
use greenhouse::app::ports::{
    AdcPort, ClimatePort, ClimateSample, ClockPort, EventSink, OutputPort, TelemetryPort,
};
use greenhouse::app::service::ControlService;
use greenhouse::config::{ControllerConfig, PinMap};
use greenhouse::error::{DeliveryFailure, Error, HardwareFault, Result};
use greenhouse::pins;
use greenhouse::sensors::SensorHub;
use greenhouse::sensors::calibration::{Co2Calibration, Co2Constants, MoistureCalibration};
use greenhouse::state::Device;

/// ADC code the CO2 baseline is taken at.
pub const BASELINE_RAW: u16 = 300;

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    pub soil_raw: Option<u16>,
    pub co2_raw: Option<u16>,
    pub climate: Option<ClimateSample>,
    pub outputs: HashMap<u8, bool>,
    pub writes: usize,
    pins: PinMap,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            soil_raw: Some(689),
            co2_raw: Some(BASELINE_RAW),
            climate: Some(ClimateSample { temperature_c: 18.0, humidity_pct: 65.0 }),
            outputs: HashMap::new(),
            writes: 0,
            pins: PinMap::default(),
        }
    }

    pub fn set_temperature(&mut self, t: f32) {
        let humidity_pct = self.climate.map_or(65.0, |c| c.humidity_pct);
        self.climate = Some(ClimateSample { temperature_c: t, humidity_pct });
    }

    pub fn is_on(&self, device: Device) -> bool {
        let pin = match device {
            Device::Led => self.pins.led,
            Device::Fan => self.pins.fan,
            Device::Cooler => self.pins.cooler,
            Device::Water => self.pins.water,
            Device::Heater => self.pins.heater,
        };
        self.outputs.get(&pin).copied().unwrap_or(false)
    }
}

impl AdcPort for MockHardware {
    fn read_channel(&mut self, channel: u8) -> Result<u16> {
        let value = match channel {
            pins::SOIL_ADC_CHANNEL => self.soil_raw,
            pins::CO2_ADC_CHANNEL => self.co2_raw,
            0..=7 => Some(0),
            _ => return Err(Error::InvalidChannel(channel)),
        };
        value.ok_or(Error::Hardware(HardwareFault::AdcTransfer))
    }
}

impl ClimatePort for MockHardware {
    fn read_climate(&mut self) -> core::result::Result<ClimateSample, HardwareFault> {
        self.climate.ok_or(HardwareFault::ClimateRead)
    }
}

impl OutputPort for MockHardware {
    fn write_output(&mut self, pin: u8, on: bool) -> core::result::Result<(), HardwareFault> {
        self.writes += 1;
        self.outputs.insert(pin, on);
        Ok(())
    }
}

// ── MockTelemetry ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RemoteMode {
    Ok,
    Status(u16),
    Fail(DeliveryFailure),
}

pub struct MockTelemetry {
    pub mode: RemoteMode,
    pub posts: Vec<(String, serde_json::Value)>,
    pub attempts: usize,
}

#[allow(dead_code)]
impl MockTelemetry {
    pub fn new() -> Self {
        Self { mode: RemoteMode::Ok, posts: Vec::new(), attempts: 0 }
    }

    pub fn failing(mode: RemoteMode) -> Self {
        Self { mode, ..Self::new() }
    }

    pub fn device_posts(&self) -> Vec<&serde_json::Value> {
        self.posts
            .iter()
            .filter(|(p, _)| p.starts_with("/devices/"))
            .map(|(_, b)| b)
            .collect()
    }
}

impl TelemetryPort for MockTelemetry {
    fn post(&mut self, path: &str, body: &[u8]) -> core::result::Result<u16, DeliveryFailure> {
        self.attempts += 1;
        match self.mode {
            RemoteMode::Ok => {
                let json = serde_json::from_slice(body).expect("reporter sends JSON");
                self.posts.push((path.to_string(), json));
                Ok(200)
            }
            RemoteMode::Status(code) => Ok(code),
            RemoteMode::Fail(f) => Err(f),
        }
    }
}

// ── ManualClock ───────────────────────────────────────────────

pub struct ManualClock {
    now: Cell<f64>,
    hour: Cell<u8>,
}

#[allow(dead_code)]
impl ManualClock {
    pub fn new(hour: u8) -> Self {
        Self { now: Cell::new(0.0), hour: Cell::new(hour) }
    }

    pub fn advance(&self, secs: f64) {
        self.now.set(self.now.get() + secs);
    }

    pub fn set_hour(&self, hour: u8) {
        self.hour.set(hour);
    }
}

impl ClockPort for ManualClock {
    fn monotonic_secs(&self) -> f64 {
        self.now.get()
    }

    fn local_hour(&self) -> u8 {
        self.hour.get()
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── Builders ──────────────────────────────────────────────────

pub fn co2_calibration() -> Co2Calibration {
    let constants = Co2Constants::default();
    Co2Calibration::from_baseline(constants.emf_volts(BASELINE_RAW), constants)
        .expect("positive baseline")
}

pub fn service() -> ControlService {
    let config = ControllerConfig::default();
    let hub = SensorHub::new(
        config.soil_channel,
        config.co2_channel,
        MoistureCalibration::default(),
        co2_calibration(),
    )
    .expect("valid channels");
    ControlService::new(&config, hub)
}
