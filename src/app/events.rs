//! Outbound application events.
//!
//! The [`ControlService`](super::service::ControlService) emits these
//! through the [`EventSink`](super::ports::EventSink) port.  Adapters on
//! the other side decide what to do with them.

use crate::control::Mode;
use crate::error::{DeliveryFailure, Error};
use crate::sensors::Quantity;
use crate::state::{Device, SensorReading};

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The service has started (carries the initial mode).
    Started(Mode),

    /// AUTO/MANUAL transition.
    ModeChanged { from: Mode, to: Mode },

    /// An actuator's commanded state was written.
    DeviceChanged { device: Device, on: bool },

    /// A quantity fell back to a stale value (or has none yet).
    SensorDegraded(Quantity),

    /// A report to the coordination service was dropped.
    DeliveryFailed(DeliveryFailure),

    /// Stored configuration was inconsistent and has been repaired.
    Recovered(Error),

    /// One control cycle finished.
    CycleCompleted(CycleReport),
}

/// Summary of one control cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleReport {
    /// Mode the cycle ran in.
    pub mode: Mode,
    /// Reading used this cycle, if every quantity had a value.
    pub reading: Option<SensorReading>,
    /// Number of ChangeSet entries produced (0 outside AUTO).
    pub changes: usize,
    /// Reports that could not be delivered.
    pub delivery_failures: usize,
    /// Output pins that failed to switch.
    pub output_faults: usize,
}
