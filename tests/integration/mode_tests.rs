//! Integration tests for the AUTO/MANUAL state machine driven through
//! the full cycle.

use super::mock_hw::{ManualClock, MockHardware, MockTelemetry, RecordingSink, service};

use greenhouse::adapters::store::{FileStore, MemoryStore};
use greenhouse::app::events::AppEvent;
use greenhouse::app::ports::StatePort;
use greenhouse::control::Mode;
use greenhouse::state::{Device, FarmConfig, SensorThresholds};

fn manual_farm(duration_secs: u32) -> FarmConfig {
    FarmConfig { auto: false, duration_secs, ..FarmConfig::default() }
}

#[test]
fn manual_reverts_to_auto_after_duration() {
    let mut hw = MockHardware::new();
    let mut store = MemoryStore::seeded(FarmConfig::default());
    let mut remote = MockTelemetry::new();
    let clock = ManualClock::new(12);
    let mut sink = RecordingSink::new();
    let mut svc = service();
    svc.start(&mut store, &clock, &mut sink).unwrap();

    // External API switches to MANUAL for 30 s.
    store.set_auto(false).unwrap();
    store.set_duration(30).unwrap();

    let r = svc.run_cycle(&mut hw, &mut store, &mut remote, &clock, &mut sink).unwrap();
    assert!(matches!(r.mode, Mode::Manual { .. }));
    assert_eq!(r.changes, 0);
    assert!(sink.count(|e| matches!(e, AppEvent::ModeChanged { .. })) == 1);

    clock.advance(29.0);
    svc.run_cycle(&mut hw, &mut store, &mut remote, &clock, &mut sink).unwrap();
    assert!(!store.farm_config().unwrap().auto, "still inside window");

    clock.advance(1.0);
    let r = svc.run_cycle(&mut hw, &mut store, &mut remote, &clock, &mut sink).unwrap();
    assert_eq!(r.mode, Mode::Auto);
    assert_eq!(r.changes, 0, "expiry cycle does not decide");
    assert!(store.farm_config().unwrap().auto);

    let r = svc.run_cycle(&mut hw, &mut store, &mut remote, &clock, &mut sink).unwrap();
    assert_eq!(r.mode, Mode::Auto);
    assert!(r.changes > 0);
}

#[test]
fn manual_applies_stored_state_without_deciding() {
    let mut hw = MockHardware::new();
    hw.set_temperature(18.0);
    let mut store = MemoryStore::seeded(manual_farm(600));
    store.set_device(Device::Heater, true).unwrap();
    let mut remote = MockTelemetry::new();
    let clock = ManualClock::new(12);
    let mut sink = RecordingSink::new();
    let mut svc = service();
    svc.start(&mut store, &clock, &mut sink).unwrap();

    for _ in 0..3 {
        svc.run_cycle(&mut hw, &mut store, &mut remote, &clock, &mut sink).unwrap();
        clock.advance(6.0);
    }

    // AUTO would switch the heater off at 18 °C.
    assert!(hw.is_on(Device::Heater));
    assert!(!hw.is_on(Device::Led));
    assert!(remote.device_posts().is_empty());
}

#[test]
fn external_auto_ends_manual_immediately() {
    let mut hw = MockHardware::new();
    let mut store = MemoryStore::seeded(manual_farm(600));
    let mut remote = MockTelemetry::new();
    let clock = ManualClock::new(12);
    let mut sink = RecordingSink::new();
    let mut svc = service();
    svc.start(&mut store, &clock, &mut sink).unwrap();
    assert!(matches!(svc.mode(), Mode::Manual { .. }));

    svc.run_cycle(&mut hw, &mut store, &mut remote, &clock, &mut sink).unwrap();
    store.set_auto(true).unwrap();
    clock.advance(5.0);
    let r = svc.run_cycle(&mut hw, &mut store, &mut remote, &clock, &mut sink).unwrap();
    assert_eq!(r.mode, Mode::Auto);
    assert!(r.changes > 0);
}

#[test]
fn started_event_carries_initial_mode() {
    let mut store = MemoryStore::seeded(manual_farm(10));
    let clock = ManualClock::new(12);
    let mut sink = RecordingSink::new();
    let mut svc = service();
    svc.start(&mut store, &clock, &mut sink).unwrap();
    assert!(matches!(
        sink.events.first(),
        Some(AppEvent::Started(Mode::Manual { .. }))
    ));
}

#[test]
fn bad_threshold_row_does_not_cancel_manual_override() {
    let path = std::env::temp_dir().join(format!("greenhouse-start-{}.json", std::process::id()));
    std::fs::write(
        &path,
        r#"{
            "farm_info": {"farm_id": 51, "auto": false, "duration": 600, "plant": "strawberry"},
            "device_status": {"led": true, "fan": false, "cooler": true, "water": false, "heater": false},
            "sensor_opt": {"tmin": 15, "tmax": 20, "hmin": 60, "hmax": 70, "smin": 800, "smax": 1200, "cmin": 65}
        }"#,
    )
    .unwrap();
    let mut store = FileStore::new(&path);
    let mut hw = MockHardware::new();
    let mut remote = MockTelemetry::new();
    let clock = ManualClock::new(12);
    let mut sink = RecordingSink::new();
    let mut svc = service();
    svc.start(&mut store, &clock, &mut sink).unwrap();

    assert!(matches!(svc.mode(), Mode::Manual { .. }));
    assert_eq!(sink.count(|e| matches!(e, AppEvent::Recovered(_))), 1);
    let farm = store.farm_config().unwrap();
    assert_eq!((farm.farm_id, farm.auto, farm.duration_secs), (51, false, 600));
    assert_eq!(store.thresholds().unwrap(), SensorThresholds::default());

    svc.run_cycle(&mut hw, &mut store, &mut remote, &clock, &mut sink).unwrap();
    assert!(hw.is_on(Device::Led));
    assert!(hw.is_on(Device::Cooler));
    assert!(remote.posts.iter().all(|(_, b)| b["farm_id"] == 51));
    let _ = std::fs::remove_file(&path);
}
