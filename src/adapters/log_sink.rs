//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the `log` facade (stderr via `env_logger` on the Pi).

use log::{debug, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`].
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(mode) => {
                info!("START | mode={}", mode);
            }
            AppEvent::ModeChanged { from, to } => {
                info!("MODE  | {} -> {}", from, to);
            }
            AppEvent::DeviceChanged { device, on } => {
                info!("DEV   | {} {}", device, if *on { "ON" } else { "OFF" });
            }
            AppEvent::SensorDegraded(q) => {
                warn!("SENS  | {:?} degraded", q);
            }
            AppEvent::DeliveryFailed(e) => {
                warn!("SEND  | {}", e);
            }
            AppEvent::Recovered(e) => {
                warn!("FIX   | {}", e);
            }
            AppEvent::CycleCompleted(r) => match &r.reading {
                Some(s) => debug!(
                    "CYCLE | {} | T={:.1}\u{00b0}C H={:.1}% soil={:.1}% CO2={}ppm | \
                     changes={} send_fail={} out_fault={}",
                    r.mode,
                    s.temperature,
                    s.humidity,
                    s.soil_moisture,
                    s.co2,
                    r.changes,
                    r.delivery_failures,
                    r.output_faults,
                ),
                None => debug!("CYCLE | {} | no reading", r.mode),
            },
        }
    }
}
