//! Inbound commands to the application service.
//!
//! These are the override and configuration requests the local API
//! forwards into the [`ControlService`](super::service::ControlService).

use crate::state::{DeviceUpdate, FarmInit, SensorThresholds};

/// Commands that external adapters can send into the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    /// Switch one device by hand and hold MANUAL for `duration_secs`.
    ManualOverride {
        farm_id: i64,
        device: DeviceUpdate,
        duration_secs: u32,
    },

    /// Enable or disable AUTO mode.
    SetAuto(bool),

    /// Replace all eight thresholds.
    SetThresholds(SensorThresholds),

    /// Assign the farm id, plant and thresholds from a farm profile.
    InitFarm(FarmInit),
}

/// How the service handled a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The command did not apply to this farm.
    Rejected,
    /// The command was applied.  `changed` is false when the stored
    /// value already matched.
    Updated { changed: bool },
}
