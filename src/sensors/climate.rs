//! DHT11 temperature/humidity acquisition with retry and stale fallback.
//!
//! The single-wire DHT protocol drops frames regularly (checksum errors,
//! missed edges).  Each cycle gets one immediate retry; if that also
//! fails the last good sample is reused for this cycle only.

use log::{debug, warn};

use crate::app::ports::{ClimatePort, ClimateSample};
use crate::sensors::calibration::round_dp;

/// Outcome of one climate read.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClimateRead {
    /// Read (possibly on the retry) this cycle.
    Fresh(ClimateSample),
    /// Both attempts failed; carrying the last good sample.
    Stale(ClimateSample),
    /// Both attempts failed and no sample has ever been read.
    Unavailable,
}

impl ClimateRead {
    pub fn sample(&self) -> Option<ClimateSample> {
        match *self {
            Self::Fresh(s) | Self::Stale(s) => Some(s),
            Self::Unavailable => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct ClimateReader {
    last: Option<ClimateSample>,
}

impl ClimateReader {
    pub fn new() -> Self {
        Self { last: None }
    }

    pub fn read(&mut self, port: &mut impl ClimatePort) -> ClimateRead {
        let attempt = port.read_climate().or_else(|e| {
            debug!("Climate read failed ({}), retrying", e);
            port.read_climate()
        });

        match attempt {
            Ok(raw) => {
                let sample = ClimateSample {
                    temperature_c: round_dp(raw.temperature_c, 2),
                    humidity_pct: round_dp(raw.humidity_pct, 2),
                };
                self.last = Some(sample);
                ClimateRead::Fresh(sample)
            }
            Err(e) => match self.last {
                Some(sample) => {
                    warn!("Climate read failed twice ({}), reusing last sample", e);
                    ClimateRead::Stale(sample)
                }
                None => {
                    warn!("Climate read failed twice ({}), no previous sample", e);
                    ClimateRead::Unavailable
                }
            },
        }
    }
}
