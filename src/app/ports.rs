//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ControlService (domain)
//! ```
//!
//! Driven adapters (ADC, climate sensor, relays, state store, remote
//! service, clock, event sinks) implement these traits.  The
//! [`ControlService`](super::service::ControlService) consumes them via
//! generics, so the domain core never touches hardware or sockets directly.

use crate::error::{DeliveryFailure, HardwareFault, Result, StorageError};
use crate::state::{Device, DeviceState, FarmConfig, SensorThresholds};

// ───────────────────────────────────────────────────────────────
// Sensor ports (driven adapters: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Analog-to-digital converter (MCP3008 on the Pi).
pub trait AdcPort {
    /// Sample one single-ended channel.  Returns a 10-bit code (0–1023).
    ///
    /// Fails with [`Error::InvalidChannel`](crate::error::Error::InvalidChannel)
    /// for channels outside `0..=7` and with a hardware fault when the
    /// transfer fails.
    fn read_channel(&mut self, channel: u8) -> Result<u16>;
}

/// A raw temperature/humidity sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClimateSample {
    pub temperature_c: f32,
    pub humidity_pct: f32,
}

/// Digital temperature/humidity sensor (DHT11 on the Pi).
pub trait ClimatePort {
    fn read_climate(&mut self) -> core::result::Result<ClimateSample, HardwareFault>;
}

// ───────────────────────────────────────────────────────────────
// Output port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Digital outputs driving the actuator relays.
pub trait OutputPort {
    fn write_output(&mut self, pin: u8, on: bool) -> core::result::Result<(), HardwareFault>;
}

// ───────────────────────────────────────────────────────────────
// State store port (driven adapter: domain ↔ persisted farm state)
// ───────────────────────────────────────────────────────────────

/// Key/value access to the singleton farm row, device row and threshold
/// row.
///
/// Every write MUST be atomic on its own; the control loop relies on a
/// failed write leaving the previously committed value in place.
pub trait StatePort {
    fn farm_config(&self) -> core::result::Result<FarmConfig, StorageError>;
    fn set_farm_config(&mut self, config: &FarmConfig) -> core::result::Result<(), StorageError>;
    fn set_auto(&mut self, auto: bool) -> core::result::Result<(), StorageError>;
    fn set_duration(&mut self, secs: u32) -> core::result::Result<(), StorageError>;

    fn device_state(&self) -> core::result::Result<DeviceState, StorageError>;
    fn set_device(&mut self, device: Device, on: bool) -> core::result::Result<(), StorageError>;

    fn thresholds(&self) -> core::result::Result<SensorThresholds, StorageError>;
    fn set_thresholds(
        &mut self,
        thresholds: &SensorThresholds,
    ) -> core::result::Result<(), StorageError>;
}

// ───────────────────────────────────────────────────────────────
// Telemetry port (driven adapter: domain → remote service)
// ───────────────────────────────────────────────────────────────

/// Posts JSON documents to the coordination service.
pub trait TelemetryPort {
    /// POST `body` to `path` (relative to the service base URL).
    ///
    /// Returns the HTTP status on any response, or a transport-level
    /// failure.  Interpreting the status is the caller's job.
    fn post(&mut self, path: &str, body: &[u8]) -> core::result::Result<u16, DeliveryFailure>;
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

pub trait ClockPort {
    /// Monotonic seconds since an arbitrary origin.
    fn monotonic_secs(&self) -> f64;

    /// Local wall-clock hour (0–23).
    fn local_hour(&self) -> u8;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
