//! Relay bank driver for the five greenhouse actuators.
//!
//! A dumb actuator: it writes the commanded [`DeviceState`] to the output
//! pins and remembers what it last applied.  It never reads sensors or
//! thresholds and never mutates the stored state.

use log::{debug, warn};

use crate::app::ports::OutputPort;
use crate::config::PinMap;
use crate::state::{Device, DeviceState};

pub struct DeviceActuator {
    pins: PinMap,
    applied: DeviceState,
}

impl DeviceActuator {
    pub fn new(pins: PinMap) -> Self {
        Self { pins, applied: DeviceState::all_off() }
    }

    pub fn pin(&self, device: Device) -> u8 {
        match device {
            Device::Led => self.pins.led,
            Device::Fan => self.pins.fan,
            Device::Cooler => self.pins.cooler,
            Device::Water => self.pins.water,
            Device::Heater => self.pins.heater,
        }
    }

    /// Drive every output to match `state`.
    ///
    /// Returns the number of pins that failed to switch.  A failure on one
    /// pin does not stop the others.
    pub fn apply(&mut self, out: &mut impl OutputPort, state: &DeviceState) -> usize {
        let mut faults = 0;
        for device in Device::ALL {
            let on = state.get(device);
            if let Err(e) = out.write_output(self.pin(device), on) {
                warn!("{} output (pin {}) failed: {}", device, self.pin(device), e);
                faults += 1;
            }
        }
        if self.applied != *state {
            debug!("Applied {:?}", state);
        }
        self.applied = *state;
        faults
    }

    /// Last state passed to [`apply`](Self::apply).  All-off before the
    /// first call, matching the level the pins are claimed at.
    pub fn current_state(&self) -> DeviceState {
        self.applied
    }

    /// Safe state: every output off.
    pub fn all_off(&mut self, out: &mut impl OutputPort) -> usize {
        self.apply(out, &DeviceState::all_off())
    }
}
