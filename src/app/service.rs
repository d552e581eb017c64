//! Control service: the hexagonal core.
//!
//! [`ControlService`] owns the sensor hub, mode controller, actuator and
//! reporter.  All I/O flows through port traits injected at call sites,
//! making the entire service testable with mock adapters.
//!
//! ```text
//!   AdcPort ─┐                                  ┌─▶ TelemetryPort
//! ClimatePort┼─▶ ┌──────────────────────────┐ ──┤
//!            │   │      ControlService      │   └─▶ EventSink
//! OutputPort ◀┘  │ Hub · Mode · Decide · Act│ ◀──▶ StatePort
//!                └──────────────────────────┘
//! ```
//!
//! One cycle: acquire → read stored rows → mode poll → decide and persist
//! (AUTO only) → apply → report.

use log::{debug, error, info, warn};

use crate::config::ControllerConfig;
use crate::control::{self, LightSchedule, Mode, ModeController, ModeStep};
use crate::drivers::DeviceActuator;
use crate::error::{Error, Result, StorageError};
use crate::report::RemoteReporter;
use crate::sensors::SensorHub;
use crate::state::{DeviceState, FarmConfig, SensorThresholds};

use super::commands::{AppCommand, CommandOutcome};
use super::events::{AppEvent, CycleReport};
use super::ports::{
    AdcPort, ClimatePort, ClockPort, EventSink, OutputPort, StatePort, TelemetryPort,
};

// ───────────────────────────────────────────────────────────────
// ControlService
// ───────────────────────────────────────────────────────────────

pub struct ControlService {
    hub: SensorHub,
    mode: ModeController,
    actuator: DeviceActuator,
    reporter: RemoteReporter,
    schedule: LightSchedule,
    default_farm_id: i64,
    cycle_count: u64,
}

impl ControlService {
    /// Construct the service.  The hub must already hold a measured CO2
    /// baseline.
    ///
    /// Does **not** touch the store; call [`start`](Self::start) next.
    pub fn new(config: &ControllerConfig, hub: SensorHub) -> Self {
        Self {
            hub,
            mode: ModeController::new(true, 0.0),
            actuator: DeviceActuator::new(config.pins),
            reporter: RemoteReporter::new(config.default_farm_id),
            schedule: LightSchedule {
                on_hour: config.light_on_hour,
                off_hour: config.light_off_hour,
            },
            default_farm_id: config.default_farm_id,
            cycle_count: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Seed or repair the store and read the initial mode.
    pub fn start(
        &mut self,
        store: &mut impl StatePort,
        clock: &impl ClockPort,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        self.ensure_seeded(store, sink)?;
        let farm = store.farm_config()?;
        self.reporter.set_farm_id(farm.farm_id);
        self.mode = ModeController::new(farm.auto, clock.monotonic_secs());
        sink.emit(&AppEvent::Started(self.mode.mode()));
        info!(
            "ControlService started for farm {} in {} mode",
            farm.farm_id,
            self.mode.mode()
        );
        Ok(())
    }

    /// Make sure every stored row exists and parses.
    ///
    /// A missing farm row means first boot: everything is seeded.  A
    /// missing or corrupted device or threshold row is a configuration
    /// inconsistency; it is logged and repaired with defaults.  I/O
    /// errors escalate.
    pub fn ensure_seeded(
        &mut self,
        store: &mut impl StatePort,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        match store.farm_config() {
            Ok(_) => {}
            Err(StorageError::NotFound) => {
                info!("No farm row, seeding defaults for farm {}", self.default_farm_id);
                store.set_farm_config(&FarmConfig {
                    farm_id: self.default_farm_id,
                    ..FarmConfig::default()
                })?;
                seed_devices(store)?;
                store.set_thresholds(&SensorThresholds::default())?;
                return Ok(());
            }
            Err(StorageError::Corrupted) => {
                self.recover(sink, "farm row corrupted");
                store.set_farm_config(&FarmConfig {
                    farm_id: self.default_farm_id,
                    ..FarmConfig::default()
                })?;
            }
            Err(e) => return Err(e.into()),
        }

        match store.device_state() {
            Ok(_) => {}
            Err(StorageError::NotFound | StorageError::Corrupted) => {
                self.recover(sink, "device row missing or corrupted");
                seed_devices(store)?;
            }
            Err(e) => return Err(e.into()),
        }

        match store.thresholds() {
            Ok(_) => {}
            Err(StorageError::NotFound | StorageError::Corrupted) => {
                self.recover(sink, "thresholds missing or corrupted");
                store.set_thresholds(&SensorThresholds::default())?;
            }
            Err(e) => return Err(e.into()),
        }
        Ok(())
    }

    fn recover(&self, sink: &mut impl EventSink, what: &'static str) {
        let err = Error::ConfigInconsistency(what);
        warn!("{}; reseeding defaults", err);
        sink.emit(&AppEvent::Recovered(err));
    }

    /// Drive every output off.  Returns the number of pins that failed.
    pub fn shutdown(&mut self, out: &mut impl OutputPort) -> usize {
        let faults = self.actuator.all_off(out);
        info!("ControlService shut down after {} cycles", self.cycle_count);
        faults
    }

    // ── Per-cycle orchestration ───────────────────────────────

    /// Run one control cycle.
    ///
    /// Sensor faults degrade and delivery faults are logged; only storage
    /// errors escalate.  The `hw` parameter satisfies every hardware port
    /// at once to avoid a double mutable borrow.
    pub fn run_cycle(
        &mut self,
        hw: &mut (impl AdcPort + ClimatePort + OutputPort),
        store: &mut impl StatePort,
        remote: &mut impl TelemetryPort,
        clock: &impl ClockPort,
        sink: &mut impl EventSink,
    ) -> Result<CycleReport> {
        self.cycle_count += 1;
        let now = clock.monotonic_secs();

        // 1. Sensors
        let acq = self.hub.acquire(hw);
        for q in &acq.degraded {
            sink.emit(&AppEvent::SensorDegraded(*q));
        }

        // 2. Stored rows
        let farm = store.farm_config().inspect_err(|e| error!("Farm row read failed: {}", e))?;
        self.reporter.set_farm_id(farm.farm_id);

        // 3. Mode
        let prev_mode = self.mode.mode();
        let step = self.mode.poll(&farm, now);
        if let ModeStep::Expired = step {
            store.set_auto(true)?;
            self.mode.finish_manual();
        }
        let mode = self.mode.mode();
        if mode.name() != prev_mode.name() {
            sink.emit(&AppEvent::ModeChanged { from: prev_mode, to: mode });
        }

        // 4. Decide (AUTO with a complete reading only)
        let mut pending = None;
        let state = match (step, acq.reading) {
            (ModeStep::Auto, Some(reading)) => {
                let thresholds = store.thresholds()?;
                let current = store.device_state()?;
                let decision = control::decide(
                    &reading,
                    &thresholds,
                    &current,
                    clock.local_hour(),
                    self.schedule,
                );
                for change in decision.changes.iter() {
                    store.set_device(change.device, change.on)?;
                    if current.get(change.device) != change.on {
                        sink.emit(&AppEvent::DeviceChanged {
                            device: change.device,
                            on: change.on,
                        });
                    }
                }
                let next = decision.next;
                pending = Some(decision.changes);
                next
            }
            (ModeStep::Hold { remaining_secs }, _) => {
                debug!("MANUAL, {:.0}s remaining", remaining_secs);
                store.device_state()?
            }
            (_, None) => {
                debug!("Incomplete reading, holding outputs");
                store.device_state()?
            }
            (ModeStep::Expired, Some(_)) => store.device_state()?,
        };

        // 5. Actuate
        let output_faults = self.actuator.apply(hw, &state);

        // 6. Report
        let mut delivery_failures = 0;
        if let Some(reading) = &acq.reading {
            if let Err(e) = self.reporter.report_telemetry(remote, reading) {
                delivery_failures += 1;
                sink.emit(&AppEvent::DeliveryFailed(e));
            }
        }
        let changes = pending.as_ref().map_or(0, |c| c.len());
        if let Some(set) = pending {
            for e in self.reporter.report_changes(remote, set) {
                delivery_failures += 1;
                sink.emit(&AppEvent::DeliveryFailed(e));
            }
        }

        let report = CycleReport {
            mode,
            reading: acq.reading,
            changes,
            delivery_failures,
            output_faults,
        };
        sink.emit(&AppEvent::CycleCompleted(report));
        Ok(report)
    }

    // ── Command handling ──────────────────────────────────────

    /// Apply an override or configuration request from the local API.
    pub fn handle_command(
        &mut self,
        cmd: AppCommand,
        store: &mut impl StatePort,
        clock: &impl ClockPort,
        sink: &mut impl EventSink,
    ) -> Result<CommandOutcome> {
        match cmd {
            AppCommand::ManualOverride { farm_id, device, duration_secs } => {
                let farm = store.farm_config()?;
                if farm.farm_id != farm_id {
                    warn!("Override for farm {} rejected (this is farm {})", farm_id, farm.farm_id);
                    return Ok(CommandOutcome::Rejected);
                }
                store.set_auto(false)?;
                store.set_duration(duration_secs)?;

                let current = store.device_state()?;
                let changed = current.get(device.device) != device.on;
                if changed {
                    store.set_device(device.device, device.on)?;
                    sink.emit(&AppEvent::DeviceChanged { device: device.device, on: device.on });
                }

                let prev = self.mode.mode();
                self.mode.restart_manual(clock.monotonic_secs());
                if prev.name() != self.mode.mode().name() {
                    sink.emit(&AppEvent::ModeChanged { from: prev, to: self.mode.mode() });
                }
                info!(
                    "Manual override: {} {} for {}s",
                    device.device,
                    if device.on { "on" } else { "off" },
                    duration_secs
                );
                Ok(CommandOutcome::Updated { changed })
            }
            AppCommand::SetAuto(auto) => {
                let farm = store.farm_config()?;
                let changed = farm.auto != auto;
                if changed {
                    store.set_auto(auto)?;
                    info!("AUTO {}", if auto { "enabled" } else { "disabled" });
                }
                Ok(CommandOutcome::Updated { changed })
            }
            AppCommand::SetThresholds(thresholds) => {
                let changed = store.thresholds().ok() != Some(thresholds);
                if changed {
                    store.set_thresholds(&thresholds)?;
                    info!("Thresholds updated: {:?}", thresholds);
                }
                Ok(CommandOutcome::Updated { changed })
            }
            AppCommand::InitFarm(init) => {
                let mut farm = match store.farm_config() {
                    Ok(f) => f,
                    Err(StorageError::NotFound | StorageError::Corrupted) => FarmConfig::default(),
                    Err(e) => return Err(e.into()),
                };
                farm.farm_id = init.farm_id;
                farm.plant = Some(init.farm_type);
                store.set_farm_config(&farm)?;
                store.set_thresholds(&SensorThresholds::from(init.conditions))?;
                self.reporter.set_farm_id(farm.farm_id);
                info!("Farm {} initialised for {:?}", farm.farm_id, farm.plant);
                Ok(CommandOutcome::Updated { changed: true })
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn mode(&self) -> Mode {
        self.mode.mode()
    }

    /// Control cycles executed since startup.
    pub fn cycle_count(&self) -> u64 {
        self.cycle_count
    }

    /// Last state driven onto the outputs.
    pub fn applied_state(&self) -> DeviceState {
        self.actuator.current_state()
    }
}

fn seed_devices(store: &mut impl StatePort) -> core::result::Result<(), StorageError> {
    let off = DeviceState::all_off();
    for device in crate::state::Device::ALL {
        store.set_device(device, off.get(device))?;
    }
    Ok(())
}
