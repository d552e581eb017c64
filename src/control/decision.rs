//! Threshold-based actuation policy.
//!
//! Given one reading, the configured bands and the state every device was
//! left in, compute the next state and record which devices changed.
//! Runs in AUTO mode only, once per cycle.
//!
//! The comparisons below are kept literally as the growers configured
//! them, including bands that overlap (`smin`/`smax` and the fan
//! conditions are not mutually exclusive for every configuration).
//!
//! ```text
//!  light  : on_hour <= hour < off_hour                 (always reported)
//!  water  : soil > smin            → on
//!           else soil < smax       → off
//!  fan    : t > tmin | h > hmin | co2 > cmax → on
//!           else h < hmax | co2 < cmin      → off
//!  heater : t < tmin → on,  t > tmax → off,  else off
//!  cooler : t < tmin → off, t > tmax → on,   else off
//! ```

use crate::control::change_set::ChangeSet;
use crate::state::{Device, DeviceState, SensorReading, SensorThresholds};

/// Daily grow-light window `[on_hour, off_hour)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LightSchedule {
    pub on_hour: u8,
    pub off_hour: u8,
}

impl Default for LightSchedule {
    fn default() -> Self {
        Self {
            on_hour: 6,
            off_hour: 22,
        }
    }
}

impl LightSchedule {
    pub fn is_on(&self, hour: u8) -> bool {
        (self.on_hour..self.off_hour).contains(&hour)
    }
}

/// Output of one decision pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    /// Device state to persist and apply.
    pub next: DeviceState,
    /// Devices whose commanded state was written this cycle.
    pub changes: ChangeSet,
}

/// Compute the next device state.
pub fn decide(
    reading: &SensorReading,
    thresholds: &SensorThresholds,
    current: &DeviceState,
    hour: u8,
    schedule: LightSchedule,
) -> Decision {
    let mut next = *current;
    let mut changes = ChangeSet::new();
    let r = reading;
    let t = thresholds;

    // ── Lighting: rewritten and reported every cycle ─────────
    let light_on = schedule.is_on(hour);
    next.led = light_on;
    if light_on {
        changes.record(
            Device::Led,
            true,
            format_args!("lights on: {:02}:00-{:02}:00 window", schedule.on_hour, schedule.off_hour),
        );
    } else {
        changes.record(
            Device::Led,
            false,
            format_args!("lights off: outside {:02}:00-{:02}:00", schedule.on_hour, schedule.off_hour),
        );
    }

    // ── Irrigation ───────────────────────────────────────────
    if r.soil_moisture > t.smin {
        if !current.water {
            next.water = true;
            changes.record(
                Device::Water,
                true,
                format_args!("water on: soil {:.1} above {:.1}", r.soil_moisture, t.smin),
            );
        }
    } else if r.soil_moisture < t.smax && current.water {
        next.water = false;
        changes.record(
            Device::Water,
            false,
            format_args!("water off: soil {:.1} below {:.1}", r.soil_moisture, t.smax),
        );
    }

    // ── Ventilation ──────────────────────────────────────────
    let co2 = r.co2 as f32;
    if r.temperature > t.tmin || r.humidity > t.hmin || co2 > t.cmax {
        if !current.fan {
            next.fan = true;
            if r.temperature > t.tmin {
                changes.record(
                    Device::Fan,
                    true,
                    format_args!("fan on: temperature {:.1} above {:.1}", r.temperature, t.tmin),
                );
            } else if r.humidity > t.hmin {
                changes.record(
                    Device::Fan,
                    true,
                    format_args!("fan on: humidity {:.1} above {:.1}", r.humidity, t.hmin),
                );
            } else {
                changes.record(
                    Device::Fan,
                    true,
                    format_args!("fan on: co2 {} above {:.0}", r.co2, t.cmax),
                );
            }
        }
    } else if (r.humidity < t.hmax || co2 < t.cmin) && current.fan {
        next.fan = false;
        if r.humidity < t.hmax {
            changes.record(
                Device::Fan,
                false,
                format_args!("fan off: humidity {:.1} below {:.1}", r.humidity, t.hmax),
            );
        } else {
            changes.record(
                Device::Fan,
                false,
                format_args!("fan off: co2 {} below {:.0}", r.co2, t.cmin),
            );
        }
    }

    // ── Heating / cooling ────────────────────────────────────
    let (heater, cooler) = if r.temperature < t.tmin {
        (true, false)
    } else if r.temperature > t.tmax {
        (false, true)
    } else {
        (false, false)
    };

    if heater != current.heater {
        next.heater = heater;
        changes.record(
            Device::Heater,
            heater,
            format_args!(
                "heater {}: temperature {:.1} {}",
                on_off(heater),
                r.temperature,
                band_position(r.temperature, t),
            ),
        );
    }
    if cooler != current.cooler {
        next.cooler = cooler;
        changes.record(
            Device::Cooler,
            cooler,
            format_args!(
                "cooler {}: temperature {:.1} {}",
                on_off(cooler),
                r.temperature,
                band_position(r.temperature, t),
            ),
        );
    }

    Decision { next, changes }
}

fn on_off(on: bool) -> &'static str {
    if on { "on" } else { "off" }
}

fn band_position(temperature: f32, t: &SensorThresholds) -> heapless::String<24> {
    use core::fmt::Write;
    let mut s = heapless::String::new();
    let _ = if temperature < t.tmin {
        write!(s, "below {:.1}", t.tmin)
    } else if temperature > t.tmax {
        write!(s, "above {:.1}", t.tmax)
    } else {
        write!(s, "within {:.1}-{:.1}", t.tmin, t.tmax)
    };
    s
}
