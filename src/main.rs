//! Greenhouse controller: main entry point (Raspberry Pi).
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareContext    FileStore     HttpTelemetry   SystemClock  │
//! │  (Adc+Climate+Out)  (StatePort)   (Telemetry)     (ClockPort)  │
//! │  LogEventSink                                                  │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │            ControlService (domain logic)               │    │
//! │  │  SensorHub · ModeController · decide · Actuator        │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use log::{error, info, warn};
use simple_signal::Signal;

use greenhouse::adapters::http::HttpTelemetry;
use greenhouse::adapters::log_sink::LogEventSink;
use greenhouse::adapters::store::FileStore;
use greenhouse::adapters::time::SystemClock;
use greenhouse::app::service::ControlService;
use greenhouse::config::ControllerConfig;
use greenhouse::drivers::hw_init::HardwareContext;
use greenhouse::sensors::SensorHub;
use greenhouse::sensors::calibration::{
    BaselinePlan, Co2Calibration, Co2Constants, MoistureCalibration,
};

const CONFIG_ENV: &str = "GREENHOUSE_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "greenhouse.json";
const SLEEP_SLICE: Duration = Duration::from_millis(100);

fn main() -> Result<()> {
    // ── 1. Logging ────────────────────────────────────────────
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("Greenhouse controller v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Configuration ──────────────────────────────────────
    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var(CONFIG_ENV).ok())
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
    let config = ControllerConfig::load(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;

    // ── 3. Hardware ───────────────────────────────────────────
    let mut hw = HardwareContext::open(&config.pins).context("hardware init")?;

    // ── 4. Calibration ────────────────────────────────────────
    let constants = Co2Constants::from(&config.calibration);
    let co2 = Co2Calibration::measure(
        &mut hw,
        &mut rppal::hal::Delay::new(),
        config.co2_channel,
        &BaselinePlan::from(&config.calibration),
        constants,
    )
    .context("CO2 baseline")?;
    let moisture =
        MoistureCalibration::new(config.calibration.soil_dry, config.calibration.soil_wet)?;
    let hub = SensorHub::new(config.soil_channel, config.co2_channel, moisture, co2)?;

    // ── 5. Adapters + service ─────────────────────────────────
    let mut store = FileStore::new(&config.state_path);
    let mut remote = HttpTelemetry::new(&config.server_url, config.request_timeout_ms);
    let clock = SystemClock::new();
    let mut sink = LogEventSink::new();

    let mut service = ControlService::new(&config, hub);
    service
        .start(&mut store, &clock, &mut sink)
        .context("seeding farm state")?;

    // ── 6. Shutdown signal ────────────────────────────────────
    let running = Arc::new(AtomicBool::new(true));
    {
        let running = Arc::clone(&running);
        simple_signal::set_handler(&[Signal::Int, Signal::Term], move |signals| {
            info!("Caught {:?}, stopping after this cycle", signals);
            running.store(false, Ordering::SeqCst);
        });
    }

    info!("System ready. Entering control loop.");

    // ── 7. Control loop ───────────────────────────────────────
    let poll = Duration::from_millis(config.poll_interval_ms);
    let settle = Duration::from_millis(config.settle_interval_ms);
    let mut consecutive_failures: u32 = 0;
    let mut outcome = Ok(());

    while sleep_while_running(poll, &running) {
        match service.run_cycle(&mut hw, &mut store, &mut remote, &clock, &mut sink) {
            Ok(_) => consecutive_failures = 0,
            Err(e) => {
                consecutive_failures += 1;
                error!(
                    "Cycle failed ({}/{}): {}",
                    consecutive_failures, config.max_consecutive_failures, e
                );
                if consecutive_failures >= config.max_consecutive_failures {
                    outcome = Err(anyhow::Error::new(e).context("too many failed cycles"));
                    break;
                }
            }
        }
        if !sleep_while_running(settle, &running) {
            break;
        }
    }

    // ── 8. Shutdown ───────────────────────────────────────────
    let faults = service.shutdown(&mut hw);
    if faults > 0 {
        warn!("{} outputs could not be switched off", faults);
    }
    drop(hw);
    info!("Stopped.");
    outcome
}

/// Sleep for `total` in short slices.  Returns `false` as soon as a
/// shutdown has been requested.
fn sleep_while_running(total: Duration, running: &AtomicBool) -> bool {
    let deadline = Instant::now() + total;
    while running.load(Ordering::SeqCst) {
        let now = Instant::now();
        if now >= deadline {
            return true;
        }
        std::thread::sleep(SLEEP_SLICE.min(deadline - now));
    }
    false
}
