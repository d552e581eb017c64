//! AUTO / MANUAL mode controller.
//!
//! ```text
//!            auto == false
//!   ┌──────┐ ───────────────► ┌────────────────┐
//!   │ Auto │                  │ Manual{since}  │──┐ elapsed < duration
//!   └──────┘ ◄─────────────── └────────────────┘◄─┘ (Hold)
//!        elapsed >= duration (Expired)
//!        or auto == true written externally
//! ```
//!
//! The controller never blocks: the outer cycle polls it once per period.
//! On `Expired` the caller persists `auto = true` and calls
//! [`ModeController::finish_manual`].

use log::info;

use crate::state::FarmConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Mode {
    Auto,
    /// Manual override entered at `since` (monotonic seconds).
    Manual { since: f64 },
}

impl Mode {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Auto => "AUTO",
            Self::Manual { .. } => "MANUAL",
        }
    }
}

impl core::fmt::Display for Mode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// What the cycle should do after a poll.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ModeStep {
    /// Run the decision engine.
    Auto,
    /// Manual override in force; re-apply stored state only.
    Hold { remaining_secs: f64 },
    /// Manual window elapsed; revert to AUTO.
    Expired,
}

#[derive(Debug, Clone)]
pub struct ModeController {
    mode: Mode,
}

impl ModeController {
    pub fn new(auto: bool, now: f64) -> Self {
        let mode = if auto { Mode::Auto } else { Mode::Manual { since: now } };
        Self { mode }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn poll(&mut self, farm: &FarmConfig, now: f64) -> ModeStep {
        match self.mode {
            Mode::Auto if farm.auto => ModeStep::Auto,
            Mode::Auto => {
                info!("Entering MANUAL mode for {}s", farm.duration_secs);
                self.mode = Mode::Manual { since: now };
                self.evaluate(now, now, farm.duration_secs)
            }
            Mode::Manual { .. } if farm.auto => {
                info!("AUTO re-enabled externally, leaving MANUAL mode");
                self.mode = Mode::Auto;
                ModeStep::Auto
            }
            Mode::Manual { since } => self.evaluate(since, now, farm.duration_secs),
        }
    }

    fn evaluate(&self, since: f64, now: f64, duration_secs: u32) -> ModeStep {
        let elapsed = now - since;
        let duration = f64::from(duration_secs);
        if elapsed >= duration {
            ModeStep::Expired
        } else {
            ModeStep::Hold { remaining_secs: duration - elapsed }
        }
    }

    /// Complete the transition after the caller has persisted `auto = true`.
    pub fn finish_manual(&mut self) {
        if matches!(self.mode, Mode::Manual { .. }) {
            info!("MANUAL window elapsed, returning to AUTO");
        }
        self.mode = Mode::Auto;
    }

    /// Restart the manual window, e.g. on a new override command.
    pub fn restart_manual(&mut self, now: f64) {
        self.mode = Mode::Manual { since: now };
    }
}
