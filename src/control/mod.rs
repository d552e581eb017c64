//! Automation control: mode state machine, threshold policy and the
//! per-cycle change record.

pub mod change_set;
pub mod decision;
pub mod mode;

pub use change_set::{Change, ChangeSet};
pub use decision::{Decision, LightSchedule, decide};
pub use mode::{Mode, ModeController, ModeStep};
