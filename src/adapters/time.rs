//! System clock adapter.
//!
//! Monotonic seconds come from `std::time::Instant`; the local hour for
//! the lighting window comes from `chrono::Local`.

use std::time::Instant;

use chrono::{Local, Timelike};

use crate::app::ports::ClockPort;

pub struct SystemClock {
    start: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    pub fn new() -> Self {
        Self { start: Instant::now() }
    }
}

impl ClockPort for SystemClock {
    fn monotonic_secs(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }

    fn local_hour(&self) -> u8 {
        // hour() is always 0..=23
        Local::now().hour() as u8
    }
}
