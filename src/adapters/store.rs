//! Farm state store adapters.
//!
//! Implements [`StatePort`] over one JSON document holding the three rows
//! the controller shares with the local API:
//!
//! ```json
//! { "farm_info": {...}, "device_status": {...}, "sensor_opt": {...} }
//! ```
//!
//! - [`FileStore`] re-reads the file on every access, so writes made by
//!   other processes between cycles are observed.  Each write goes to a
//!   sibling temp file that is then renamed over the original.
//! - [`MemoryStore`] keeps the document in memory (host tests, dry runs).

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::app::ports::StatePort;
use crate::error::StorageError;
use crate::state::{Device, DeviceState, FarmConfig, SensorThresholds};

/// On-disk layout.  A missing row is `None`.
///
/// Rows stay as raw JSON until read, so a malformed row is `Corrupted` on
/// its own and never hides its healthy siblings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    farm_info: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    device_status: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sensor_opt: Option<Value>,
}

fn decode_row<T: DeserializeOwned>(row: Option<&Value>, name: &str) -> Result<T, StorageError> {
    let value = row.ok_or(StorageError::NotFound)?;
    T::deserialize(value).map_err(|e| {
        warn!("{} row is corrupted: {}", name, e);
        StorageError::Corrupted
    })
}

fn encode_row<T: Serialize>(value: &T) -> Result<Value, StorageError> {
    serde_json::to_value(value).map_err(|_| StorageError::IoError)
}

impl StateDocument {
    pub fn farm(&self) -> Result<FarmConfig, StorageError> {
        decode_row(self.farm_info.as_ref(), "farm_info")
    }

    pub fn devices(&self) -> Result<DeviceState, StorageError> {
        decode_row(self.device_status.as_ref(), "device_status")
    }

    pub fn thresholds(&self) -> Result<SensorThresholds, StorageError> {
        decode_row(self.sensor_opt.as_ref(), "sensor_opt")
    }

    fn put_farm(&mut self, farm: &FarmConfig) -> Result<(), StorageError> {
        self.farm_info = Some(encode_row(farm)?);
        Ok(())
    }

    fn update_farm(&mut self, f: impl FnOnce(&mut FarmConfig)) -> Result<(), StorageError> {
        let mut farm = self.farm()?;
        f(&mut farm);
        self.put_farm(&farm)
    }

    /// A missing or corrupted device row starts over from all-off.
    fn put_device(&mut self, device: Device, on: bool) -> Result<(), StorageError> {
        let mut state = match self.devices() {
            Ok(state) => state,
            Err(StorageError::NotFound | StorageError::Corrupted) => DeviceState::all_off(),
            Err(e) => return Err(e),
        };
        state.set(device, on);
        self.device_status = Some(encode_row(&state)?);
        Ok(())
    }

    fn put_thresholds(&mut self, thresholds: &SensorThresholds) -> Result<(), StorageError> {
        self.sensor_opt = Some(encode_row(thresholds)?);
        Ok(())
    }
}

// ───────────────────────────────────────────────────────────────
// FileStore
// ───────────────────────────────────────────────────────────────

pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        debug!("FileStore at {}", path.display());
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<StateDocument, StorageError> {
        match std::fs::read(&self.path) {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                warn!("{} is not a valid state document: {}", self.path.display(), e);
                StorageError::Corrupted
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(StateDocument::default()),
            Err(e) => {
                warn!("Reading {} failed: {}", self.path.display(), e);
                Err(StorageError::IoError)
            }
        }
    }

    /// Load for modification.  Only a document that is not a JSON object
    /// at all is replaced; healthy rows are carried over untouched.
    fn load_for_write(&self) -> Result<StateDocument, StorageError> {
        match self.load() {
            Err(StorageError::Corrupted) => Ok(StateDocument::default()),
            other => other,
        }
    }

    fn store(&self, doc: &StateDocument) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec_pretty(doc).map_err(|_| StorageError::IoError)?;
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        std::fs::write(&tmp, &bytes)
            .and_then(|()| std::fs::rename(&tmp, &self.path))
            .map_err(|e| {
                warn!("Writing {} failed: {}", self.path.display(), e);
                StorageError::IoError
            })
    }

    fn update(&mut self, f: impl FnOnce(&mut StateDocument) -> Result<(), StorageError>) -> Result<(), StorageError> {
        let mut doc = self.load_for_write()?;
        f(&mut doc)?;
        self.store(&doc)
    }
}

impl StatePort for FileStore {
    fn farm_config(&self) -> Result<FarmConfig, StorageError> {
        self.load()?.farm()
    }

    fn set_farm_config(&mut self, config: &FarmConfig) -> Result<(), StorageError> {
        self.update(|doc| doc.put_farm(config))
    }

    fn set_auto(&mut self, auto: bool) -> Result<(), StorageError> {
        self.update(|doc| doc.update_farm(|farm| farm.auto = auto))
    }

    fn set_duration(&mut self, secs: u32) -> Result<(), StorageError> {
        self.update(|doc| doc.update_farm(|farm| farm.duration_secs = secs))
    }

    fn device_state(&self) -> Result<DeviceState, StorageError> {
        self.load()?.devices()
    }

    fn set_device(&mut self, device: Device, on: bool) -> Result<(), StorageError> {
        self.update(|doc| doc.put_device(device, on))
    }

    fn thresholds(&self) -> Result<SensorThresholds, StorageError> {
        self.load()?.thresholds()
    }

    fn set_thresholds(&mut self, thresholds: &SensorThresholds) -> Result<(), StorageError> {
        self.update(|doc| doc.put_thresholds(thresholds))
    }
}

// ───────────────────────────────────────────────────────────────
// MemoryStore
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    doc: StateDocument,
}

impl MemoryStore {
    /// No rows at all (first boot).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Every row present: the given farm, all devices off, default thresholds.
    pub fn seeded(farm: FarmConfig) -> Self {
        let mut store = Self::default();
        store.doc.farm_info = serde_json::to_value(&farm).ok();
        store.doc.device_status = serde_json::to_value(DeviceState::all_off()).ok();
        store.doc.sensor_opt = serde_json::to_value(SensorThresholds::default()).ok();
        store
    }

    pub fn clear_thresholds(&mut self) {
        self.doc.sensor_opt = None;
    }
}

impl StatePort for MemoryStore {
    fn farm_config(&self) -> Result<FarmConfig, StorageError> {
        self.doc.farm()
    }

    fn set_farm_config(&mut self, config: &FarmConfig) -> Result<(), StorageError> {
        self.doc.put_farm(config)
    }

    fn set_auto(&mut self, auto: bool) -> Result<(), StorageError> {
        self.doc.update_farm(|farm| farm.auto = auto)
    }

    fn set_duration(&mut self, secs: u32) -> Result<(), StorageError> {
        self.doc.update_farm(|farm| farm.duration_secs = secs)
    }

    fn device_state(&self) -> Result<DeviceState, StorageError> {
        self.doc.devices()
    }

    fn set_device(&mut self, device: Device, on: bool) -> Result<(), StorageError> {
        self.doc.put_device(device, on)
    }

    fn thresholds(&self) -> Result<SensorThresholds, StorageError> {
        self.doc.thresholds()
    }

    fn set_thresholds(&mut self, thresholds: &SensorThresholds) -> Result<(), StorageError> {
        self.doc.put_thresholds(thresholds)
    }
}
