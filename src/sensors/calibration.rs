//! Raw ADC code → physical unit conversion.
//!
//! Two analog quantities are calibrated here:
//!
//! - **Soil moisture**: capacitive probe, linear between a dry-air code
//!   and a submerged code, reported as a percentage.
//! - **CO2**: MG-811 electrochemical cell behind a resistive divider.  The
//!   cell EMF drops as CO2 rises, so the reading is expressed as a ratio
//!   against the EMF measured once at startup (the baseline) and mapped
//!   through a log curve `ppm = 10^((A - ratio) / B)`.
//!
//! A [`Co2Calibration`] can only be built from a positive baseline, so
//! holding one is proof the baseline step ran.

use embedded_hal::delay::DelayNs;
use log::{error, info, warn};

use crate::app::ports::AdcPort;
use crate::config::CalibrationConfig;
use crate::error::{Error, Result};
use crate::sensors::adc;

/// Soil volume of a standard bed (mL).
pub const DEFAULT_SOIL_VOLUME_ML: f32 = 24_000.0;
/// Irrigation pump delivery rate (mL/s).
pub const DEFAULT_PUMP_FLOW_ML_PER_SEC: f32 = 33.3;

/// Round to `places` decimal places (half away from zero).
pub(crate) fn round_dp(value: f32, places: i32) -> f32 {
    let scale = 10f32.powi(places);
    (value * scale).round() / scale
}

// ---------------------------------------------------------------------------
// Soil moisture
// ---------------------------------------------------------------------------

/// Two-point soil probe calibration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoistureCalibration {
    dry: u16,
    wet: u16,
}

impl Default for MoistureCalibration {
    fn default() -> Self {
        Self { dry: 1022, wet: 356 }
    }
}

impl MoistureCalibration {
    /// `wet` must be strictly below `dry` (the probe reads lower when wet).
    pub fn new(dry: u16, wet: u16) -> Result<Self> {
        if wet >= dry {
            return Err(Error::Config("soil_wet must be below soil_dry"));
        }
        Ok(Self { dry, wet })
    }

    /// Map a raw code to 0–100 %, saturating outside the calibrated span.
    pub fn to_percent(&self, raw: u16) -> f32 {
        let clamped = raw.min(self.dry).max(self.wet);
        let span = f32::from(self.dry - self.wet);
        let percent = f32::from(self.dry - clamped) * 100.0 / span;
        round_dp(percent, 1)
    }
}

/// Pump run time (seconds) to raise moisture from `current` % to
/// `target` %, rounded to 2 decimals.  Zero when already at target.
///
/// Not used by the control cycle, which switches the pump on and off by
/// threshold.  Exposed for the local API, which knows the pot volume and
/// pump flow and quotes a run time alongside a manual watering request.
pub fn watering_time_secs(
    current: f32,
    target: f32,
    soil_volume_ml: f32,
    pump_flow_ml_per_sec: f32,
) -> f32 {
    if current >= target || pump_flow_ml_per_sec <= 0.0 {
        return 0.0;
    }
    let required_ml = soil_volume_ml * (target - current) / 100.0;
    round_dp(required_ml / pump_flow_ml_per_sec, 2)
}

// ---------------------------------------------------------------------------
// CO2
// ---------------------------------------------------------------------------

/// Divider and curve constants for the CO2 channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Co2Constants {
    pub vref: f32,
    pub adc_max: f32,
    pub r1_ohms: f32,
    pub r2_ohms: f32,
    pub cal_a: f32,
    pub cal_b: f32,
}

impl Default for Co2Constants {
    fn default() -> Self {
        Self::from(&CalibrationConfig::default())
    }
}

impl From<&CalibrationConfig> for Co2Constants {
    fn from(c: &CalibrationConfig) -> Self {
        Self {
            vref: c.vref,
            adc_max: c.adc_max,
            r1_ohms: c.r1_ohms,
            r2_ohms: c.r2_ohms,
            cal_a: c.cal_a,
            cal_b: c.cal_b,
        }
    }
}

impl Co2Constants {
    /// Cell EMF (volts) for a raw code, undoing the R1/R2 divider.
    pub fn emf_volts(&self, raw: u16) -> f32 {
        let v_out = f32::from(raw) * self.vref / self.adc_max;
        v_out * (self.r1_ohms + self.r2_ohms) / self.r2_ohms
    }
}

/// Timing of the one-shot baseline measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaselinePlan {
    pub settle_ms: u32,
    pub samples: u16,
    pub interval_ms: u32,
}

impl Default for BaselinePlan {
    fn default() -> Self {
        Self::from(&CalibrationConfig::default())
    }
}

impl From<&CalibrationConfig> for BaselinePlan {
    fn from(c: &CalibrationConfig) -> Self {
        Self {
            settle_ms: c.baseline_settle_ms,
            samples: c.baseline_samples,
            interval_ms: c.baseline_interval_ms,
        }
    }
}

/// CO2 conversion state: constants plus the startup EMF baseline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Co2Calibration {
    emf_baseline: f32,
    constants: Co2Constants,
}

impl Co2Calibration {
    /// Wrap a previously measured baseline.
    pub fn from_baseline(emf_baseline: f32, constants: Co2Constants) -> Result<Self> {
        if !emf_baseline.is_finite() || emf_baseline <= 0.0 {
            return Err(Error::CalibrationNotReady);
        }
        Ok(Self {
            emf_baseline,
            constants,
        })
    }

    /// Measure the EMF baseline: settle, then average `plan.samples`
    /// readings taken `plan.interval_ms` apart.
    ///
    /// Individual sample faults are skipped; the measurement only fails
    /// if no sample at all could be taken or the average is unusable.
    pub fn measure(
        adc_port: &mut impl AdcPort,
        delay: &mut impl DelayNs,
        channel: u8,
        plan: &BaselinePlan,
        constants: Co2Constants,
    ) -> Result<Self> {
        adc::check_channel(channel)?;

        info!("Measuring CO2 EMF baseline ({} ms settle)...", plan.settle_ms);
        delay.delay_ms(plan.settle_ms);

        let mut sum = 0.0f32;
        let mut good: u16 = 0;
        for i in 0..plan.samples {
            match adc_port.read_channel(channel) {
                Ok(raw) => {
                    sum += constants.emf_volts(raw);
                    good += 1;
                }
                Err(e @ Error::InvalidChannel(_)) => return Err(e),
                Err(e) => warn!("Baseline sample {} failed: {}", i, e),
            }
            delay.delay_ms(plan.interval_ms);
        }

        if good == 0 {
            error!("CO2 baseline: no usable samples");
            return Err(Error::CalibrationNotReady);
        }

        let baseline = sum / f32::from(good);
        info!(
            "CO2 EMF baseline: {:.3} V ({}/{} samples)",
            baseline, good, plan.samples
        );
        Self::from_baseline(baseline, constants)
    }

    pub fn emf_baseline(&self) -> f32 {
        self.emf_baseline
    }

    /// Convert a raw code to CO2 ppm.  Returns 0 when the EMF ratio is
    /// not positive (sensor inactive or disconnected).
    pub fn to_co2_ppm(&self, raw: u16) -> u32 {
        let ratio = self.constants.emf_volts(raw) / self.emf_baseline;
        if ratio <= 0.0 {
            return 0;
        }
        let ppm = 10f32.powf((self.constants.cal_a - ratio) / self.constants.cal_b);
        ppm.round() as u32
    }
}
