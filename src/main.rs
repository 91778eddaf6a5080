//! AirMon Firmware — Main Entry Point
//!
//! Boot sequence and the perpetual measurement loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  SensorSuite        LogEventSink    NvsAdapter   MonotonicClock│
//! │  (SensorPort)       (EventSink)     (Config+NVS) (uptime)      │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │           MonitorService (pure logic)                  │    │
//! │  │  Scheduler · GasPhase · BaselineSaver                  │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! There is no exit path: the loop runs until power-off.

use anyhow::{Context, Result};
use log::{info, warn};

use airmon::adapters::log_sink::LogEventSink;
use airmon::adapters::nvs::NvsAdapter;
use airmon::adapters::time::MonotonicClock;
use airmon::app::ports::ConfigPort;
use airmon::app::service::MonitorService;
use airmon::config::SystemConfig;
use airmon::drivers::ze15co::Ze15co;
use airmon::sensors::co::CoSensor;
use airmon::sensors::scd30::Scd30Sensor;
use airmon::sensors::sfa30::Sfa30Sensor;
use airmon::sensors::sgp41::Sgp41Sensor;
use airmon::sensors::sim;
use airmon::sensors::sps30::Sps30Sensor;
use airmon::sensors::veml6075::Veml6075Sensor;
use airmon::sensors::SensorSuite;

/// Outer-loop pacing. Every task period is a multiple of this, and the
/// scheduler tolerates jitter — a task fires on the first pass at or
/// after its due time.
const CONTROL_LOOP_SLEEP_MS: u64 = 100;

fn main() -> Result<()> {
    // ── 1. Platform bootstrap ─────────────────────────────────
    #[cfg(target_os = "espidf")]
    {
        esp_idf_svc::sys::link_patches();
        esp_idf_logger::init()?;
    }
    #[cfg(not(target_os = "espidf"))]
    env_logger::init();

    info!("AirMon v{} starting", env!("CARGO_PKG_VERSION"));

    // ── 2. Load config from NVS (or defaults) ─────────────────
    let mut nvs = match NvsAdapter::new() {
        Ok(n) => n,
        Err(e) => {
            warn!("NVS init failed ({e}), running with defaults and no persistence");
            // Continue without NVS — nothing will persist this session.
            // On next reboot, NVS should self-heal.
            NvsAdapter::default()
        }
    };
    let config = match nvs.load() {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!("NVS config load failed ({e}), using defaults");
            SystemConfig::default()
        }
    };

    let clock = MonotonicClock::new();

    // ── 3. Construct the sensor suite ─────────────────────────
    // The vendor bus drivers are external collaborators; the
    // simulation backends stand in at this boundary.
    let mut suite = SensorSuite::new(
        Scd30Sensor::new(sim::SimScd30::new(), config.scd30_temperature_offset),
        Sps30Sensor::new(sim::SimSps30::new(), config.sps30_auto_clean_days),
        Sfa30Sensor::new(sim::SimSfa30::new()),
        Sgp41Sensor::new(
            sim::SimSgp41::new(),
            sim::SimGasIndex::voc(),
            sim::SimGasIndex::nox(),
        ),
        Veml6075Sensor::new(sim::SimVeml6075::new()),
        CoSensor::new(Ze15co::new(sim::SimCoSerial::new())),
    );

    let mut sink = LogEventSink::new();

    // ── 4. Start the orchestration core ───────────────────────
    let mut service =
        MonitorService::new(&config).context("task set exceeds scheduler capacity")?;
    service.start(clock.uptime_ms(), &mut suite, &nvs, &mut sink);

    info!("System ready. Entering measurement loop.");

    // ── 5. Measurement loop ───────────────────────────────────
    loop {
        service.execute(clock.uptime_ms(), &mut suite, &mut nvs, &mut sink);
        std::thread::sleep(std::time::Duration::from_millis(CONTROL_LOOP_SLEEP_MS));
    }
}
