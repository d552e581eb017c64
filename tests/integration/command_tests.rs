//! Integration tests for override and configuration commands.

use super::mock_hw::{ManualClock, MockHardware, MockTelemetry, RecordingSink, service};

use greenhouse::adapters::store::MemoryStore;
use greenhouse::app::commands::{AppCommand, CommandOutcome};
use greenhouse::app::ports::StatePort;
use greenhouse::control::Mode;
use greenhouse::error::Error;
use greenhouse::state::{
    Device, DeviceUpdate, FarmConditions, FarmConfig, FarmInit, OptimalRange, SensorThresholds,
};

fn override_cmd(farm_id: i64, name: &str, status: u8, duration_secs: u32) -> AppCommand {
    AppCommand::ManualOverride {
        farm_id,
        device: DeviceUpdate::parse(name, status).unwrap(),
        duration_secs,
    }
}

#[test]
fn manual_override_switches_device_and_mode() {
    let mut store = MemoryStore::seeded(FarmConfig::default());
    let clock = ManualClock::new(12);
    let mut sink = RecordingSink::new();
    let mut svc = service();
    svc.start(&mut store, &clock, &mut sink).unwrap();

    let out = svc
        .handle_command(override_cmd(34, "water", 1, 120), &mut store, &clock, &mut sink)
        .unwrap();
    assert_eq!(out, CommandOutcome::Updated { changed: true });

    let farm = store.farm_config().unwrap();
    assert!(!farm.auto);
    assert_eq!(farm.duration_secs, 120);
    assert!(store.device_state().unwrap().water);
    assert!(matches!(svc.mode(), Mode::Manual { .. }));

    // Same value again: accepted, nothing written.
    let out = svc
        .handle_command(override_cmd(34, "water", 1, 120), &mut store, &clock, &mut sink)
        .unwrap();
    assert_eq!(out, CommandOutcome::Updated { changed: false });
}

#[test]
fn override_restarts_manual_window() {
    let mut hw = MockHardware::new();
    let mut store = MemoryStore::seeded(FarmConfig::default());
    let mut remote = MockTelemetry::new();
    let clock = ManualClock::new(12);
    let mut sink = RecordingSink::new();
    let mut svc = service();
    svc.start(&mut store, &clock, &mut sink).unwrap();

    svc.handle_command(override_cmd(34, "fan", 0, 60), &mut store, &clock, &mut sink)
        .unwrap();
    clock.advance(50.0);
    svc.handle_command(override_cmd(34, "cooler", 1, 60), &mut store, &clock, &mut sink)
        .unwrap();
    clock.advance(50.0);

    // 100 s after the first override but only 50 s after the second.
    let r = svc.run_cycle(&mut hw, &mut store, &mut remote, &clock, &mut sink).unwrap();
    assert!(matches!(r.mode, Mode::Manual { .. }));
    assert!(hw.is_on(Device::Cooler));
    assert!(!hw.is_on(Device::Fan));
}

#[test]
fn override_for_other_farm_is_rejected() {
    let mut store = MemoryStore::seeded(FarmConfig::default());
    let clock = ManualClock::new(12);
    let mut sink = RecordingSink::new();
    let mut svc = service();
    svc.start(&mut store, &clock, &mut sink).unwrap();

    let out = svc
        .handle_command(override_cmd(7, "fan", 1, 60), &mut store, &clock, &mut sink)
        .unwrap();
    assert_eq!(out, CommandOutcome::Rejected);
    assert!(store.farm_config().unwrap().auto);
    assert!(!store.device_state().unwrap().fan);
}

#[test]
fn unknown_device_names_are_rejected() {
    assert_eq!(DeviceUpdate::parse("heat", 1), Err(Error::UnknownDevice));
    assert_eq!(DeviceUpdate::parse("", 0), Err(Error::UnknownDevice));
}

#[test]
fn new_thresholds_drive_next_decision() {
    let mut hw = MockHardware::new();
    hw.set_temperature(18.0);
    let mut store = MemoryStore::seeded(FarmConfig::default());
    let mut remote = MockTelemetry::new();
    let clock = ManualClock::new(12);
    let mut sink = RecordingSink::new();
    let mut svc = service();
    svc.start(&mut store, &clock, &mut sink).unwrap();

    let warm = SensorThresholds { tmin: 22.0, tmax: 26.0, ..SensorThresholds::default() };
    let out = svc
        .handle_command(AppCommand::SetThresholds(warm), &mut store, &clock, &mut sink)
        .unwrap();
    assert_eq!(out, CommandOutcome::Updated { changed: true });

    svc.run_cycle(&mut hw, &mut store, &mut remote, &clock, &mut sink).unwrap();
    assert!(hw.is_on(Device::Heater));
}

#[test]
fn set_auto_false_enters_manual_on_next_cycle() {
    let mut hw = MockHardware::new();
    let mut store = MemoryStore::seeded(FarmConfig { duration_secs: 300, ..FarmConfig::default() });
    let mut remote = MockTelemetry::new();
    let clock = ManualClock::new(12);
    let mut sink = RecordingSink::new();
    let mut svc = service();
    svc.start(&mut store, &clock, &mut sink).unwrap();

    let out = svc
        .handle_command(AppCommand::SetAuto(false), &mut store, &clock, &mut sink)
        .unwrap();
    assert_eq!(out, CommandOutcome::Updated { changed: true });
    let r = svc.run_cycle(&mut hw, &mut store, &mut remote, &clock, &mut sink).unwrap();
    assert!(matches!(r.mode, Mode::Manual { .. }));
}

#[test]
fn init_farm_sets_id_plant_and_thresholds() {
    let mut hw = MockHardware::new();
    let mut store = MemoryStore::seeded(FarmConfig::default());
    let mut remote = MockTelemetry::new();
    let clock = ManualClock::new(12);
    let mut sink = RecordingSink::new();
    let mut svc = service();
    svc.start(&mut store, &clock, &mut sink).unwrap();

    let range = |optimal_min, optimal_max| OptimalRange { optimal_min, optimal_max };
    let init = FarmInit {
        farm_id: 51,
        farm_type: "strawberry".into(),
        conditions: FarmConditions {
            temperature: range(17.0, 24.0),
            humidity: range(60.0, 80.0),
            soil_moisture: range(30.0, 60.0),
            co2: range(400.0, 1000.0),
        },
    };
    svc.handle_command(AppCommand::InitFarm(init), &mut store, &clock, &mut sink)
        .unwrap();

    let farm = store.farm_config().unwrap();
    assert_eq!(farm.farm_id, 51);
    assert_eq!(farm.plant.as_deref(), Some("strawberry"));
    let t = store.thresholds().unwrap();
    assert_eq!((t.tmin, t.tmax), (17.0, 24.0));
    assert_eq!((t.hmin, t.hmax), (60.0, 80.0));
    assert_eq!((t.smin, t.smax), (30.0, 60.0));
    assert_eq!((t.cmin, t.cmax), (400.0, 1000.0));

    svc.run_cycle(&mut hw, &mut store, &mut remote, &clock, &mut sink).unwrap();
    assert!(remote.posts.iter().all(|(_, b)| b["farm_id"] == 51));
}
