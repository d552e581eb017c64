//! Best-effort reporting to the coordination service.
//!
//! Every post is attempted exactly once.  Failures are logged and counted
//! and never retried or propagated: the control loop must keep running
//! while the remote side is unreachable.

use log::{debug, warn};
use serde::Serialize;

use crate::app::ports::TelemetryPort;
use crate::control::ChangeSet;
use crate::error::DeliveryFailure;
use crate::state::{Device, SensorReading};

/// Body of `POST /sensors`.
#[derive(Debug, Serialize)]
pub struct TelemetryPayload {
    pub farm_id: i64,
    pub temperature: f32,
    pub humidity: f32,
    pub soil_moisture: f32,
    pub co2: u32,
}

/// Body of `POST /devices/{device}/status`.
#[derive(Debug, Serialize)]
pub struct ChangePayload<'a> {
    pub farm_id: i64,
    pub device: Device,
    pub status: u8,
    pub content: &'a str,
}

pub struct RemoteReporter {
    farm_id: i64,
}

impl RemoteReporter {
    pub fn new(farm_id: i64) -> Self {
        Self { farm_id }
    }

    pub fn farm_id(&self) -> i64 {
        self.farm_id
    }

    pub fn set_farm_id(&mut self, farm_id: i64) {
        self.farm_id = farm_id;
    }

    pub fn report_telemetry(
        &self,
        port: &mut impl TelemetryPort,
        reading: &SensorReading,
    ) -> Result<(), DeliveryFailure> {
        let payload = TelemetryPayload {
            farm_id: self.farm_id,
            temperature: reading.temperature,
            humidity: reading.humidity,
            soil_moisture: reading.soil_moisture,
            co2: reading.co2,
        };
        post_json(port, "/sensors", &payload)
            .inspect_err(|e| warn!("Telemetry not delivered: {}", e))
    }

    /// Post every change.  The set is consumed whatever the outcome.
    /// Returns the failures so the caller can surface them.
    pub fn report_changes(
        &self,
        port: &mut impl TelemetryPort,
        changes: ChangeSet,
    ) -> heapless::Vec<DeliveryFailure, 5> {
        let mut failures = heapless::Vec::new();
        for change in changes {
            let payload = ChangePayload {
                farm_id: self.farm_id,
                device: change.device,
                status: u8::from(change.on),
                content: change.note.as_str(),
            };
            let path = format!("/devices/{}/status", change.device);
            if let Err(e) = post_json(port, &path, &payload) {
                warn!("{} change not delivered: {}", change.device, e);
                let _ = failures.push(e);
            }
        }
        failures
    }
}

fn post_json(
    port: &mut impl TelemetryPort,
    path: &str,
    payload: &impl Serialize,
) -> Result<(), DeliveryFailure> {
    let body = serde_json::to_vec(payload).map_err(|_| DeliveryFailure::Encode)?;
    match port.post(path, &body)? {
        200 => {
            debug!("POST {} ok", path);
            Ok(())
        }
        status => Err(DeliveryFailure::Status(status)),
    }
}
