//! Greenhouse controller library.
//!
//! Exposes the control core and host-side adapters for the binary and for
//! integration testing.  Raspberry Pi hardware access is gated behind the
//! `rpi` feature (`drivers::hw_init`).

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod control;
pub mod drivers;
pub mod error;
pub mod pins;
pub mod report;
pub mod sensors;
pub mod state;
