//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements     | Connects to                  |
//! |------------|----------------|------------------------------|
//! | `http`     | TelemetryPort  | Coordination service (ureq)  |
//! | `log_sink` | EventSink      | `log` facade                 |
//! | `store`    | StatePort      | JSON state file / memory     |
//! | `time`     | ClockPort      | `Instant` + local wall clock |
//!
//! The hardware ports (ADC, climate sensor, relays) are implemented by
//! `drivers::hw_init::HardwareContext` behind the `rpi` feature.

pub mod http;
pub mod log_sink;
pub mod store;
pub mod time;
