//! Per-cycle record of actuator changes.
//!
//! A `ChangeSet` is created by the decision engine and moved into the
//! reporter, so it cannot outlive the cycle that produced it.  It holds at
//! most one entry per device.

use core::fmt::Write;

use heapless::{String, Vec};

use crate::state::Device;

const DEVICE_COUNT: usize = Device::ALL.len();

/// Capacity of a change note.
pub const NOTE_CAPACITY: usize = 64;

pub type Note = String<NOTE_CAPACITY>;

/// One actuator whose commanded state was (re)written this cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct Change {
    pub device: Device,
    pub on: bool,
    pub note: Note,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeSet {
    entries: Vec<Change, DEVICE_COUNT>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Record a change, replacing an earlier entry for the same device.
    pub fn record(&mut self, device: Device, on: bool, note: core::fmt::Arguments<'_>) {
        let mut text = Note::new();
        // Text past the fixed capacity is dropped.
        let _ = text.write_fmt(note);

        let change = Change { device, on, note: text };
        if let Some(existing) = self.entries.iter_mut().find(|c| c.device == device) {
            *existing = change;
        } else {
            // One slot per device, so this cannot overflow.
            let _ = self.entries.push(change);
        }
    }

    pub fn contains(&self, device: Device) -> bool {
        self.entries.iter().any(|c| c.device == device)
    }

    pub fn get(&self, device: Device) -> Option<&Change> {
        self.entries.iter().find(|c| c.device == device)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Change> {
        self.entries.iter()
    }
}

impl IntoIterator for ChangeSet {
    type Item = Change;
    type IntoIter = <Vec<Change, DEVICE_COUNT> as IntoIterator>::IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
