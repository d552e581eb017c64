//! Application core: domain orchestration, no direct I/O.
//!
//! The [`service::ControlService`] runs the acquire → decide → actuate →
//! report cycle and handles override commands.  All interaction with
//! hardware, storage and the network happens through **port traits**
//! defined in [`ports`], keeping this layer fully testable without real
//! peripherals.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
