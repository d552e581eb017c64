//! Actuator driver and Raspberry Pi hardware initialisation.

pub mod actuator;
#[cfg(feature = "rpi")]
pub mod hw_init;

pub use actuator::DeviceActuator;
