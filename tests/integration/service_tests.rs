//! End-to-end orchestration properties, driven through
//! `MonitorService` with mock adapters and a synthetic clock.

use airmon::adapters::baseline::{self, BaselineRecord};
use airmon::app::events::AppEvent;
use airmon::app::ports::StoragePort;
use airmon::app::service::MonitorService;
use airmon::config::SystemConfig;
use airmon::phase::GasPhase;

use crate::mock_hw::{MockNvs, MockSuite, RecordingSink, SuiteCall};

/// Short warm-up/save cadence so tests stay fast; everything else at
/// production defaults.
fn test_config() -> SystemConfig {
    SystemConfig {
        baseline_save_warmup_ms: 30_000,
        baseline_save_interval_ms: 10_000,
        baseline_max_age_ms: 10_000,
        ..SystemConfig::default()
    }
}

struct Harness {
    service: MonitorService,
    suite: MockSuite,
    nvs: MockNvs,
    sink: RecordingSink,
}

impl Harness {
    fn new(config: &SystemConfig) -> Self {
        Self {
            service: MonitorService::new(config).expect("task set must fit"),
            suite: MockSuite::new(),
            nvs: MockNvs::new(),
            sink: RecordingSink::new(),
        }
    }

    fn start(&mut self, now_ms: u64) {
        self.service
            .start(now_ms, &mut self.suite, &self.nvs, &mut self.sink);
    }

    /// Execute passes every `step_ms` from `from_ms` to `to_ms` inclusive.
    fn drive(&mut self, from_ms: u64, to_ms: u64, step_ms: u64) {
        let mut now = from_ms;
        while now <= to_ms {
            self.service
                .execute(now, &mut self.suite, &mut self.nvs, &mut self.sink);
            now += step_ms;
        }
    }
}

// ── Startup ───────────────────────────────────────────────────

#[test]
fn start_initialises_adapters_and_enters_conditioning() {
    let mut h = Harness::new(&test_config());
    h.start(0);

    assert!(h.suite.inited);
    assert_eq!(h.service.phase(), GasPhase::Conditioning);
    assert!(matches!(
        h.sink.events.as_slice(),
        [AppEvent::Started(GasPhase::Conditioning)]
    ));
}

// ── Conditioning → steady hand-over ──────────────────────────

#[test]
fn conditioning_runs_its_budget_then_hands_over() {
    let mut h = Harness::new(&test_config());
    h.start(0);

    // 10 iterations at 1 Hz: the first fires immediately at t=0, the
    // last at t=9000. The steady task must not run in that window.
    h.drive(0, 9_000, 1_000);
    assert_eq!(h.suite.count(SuiteCall::Condition), 10);
    assert_eq!(h.suite.count(SuiteCall::GasIndices), 0);
    assert_eq!(h.service.phase(), GasPhase::SteadyMeasuring);

    // From here on only the steady task runs.
    h.drive(10_000, 20_000, 1_000);
    assert_eq!(h.suite.count(SuiteCall::Condition), 10);
    assert_eq!(h.suite.count(SuiteCall::GasIndices), 11);
}

#[test]
fn handover_fires_exactly_once() {
    let mut h = Harness::new(&test_config());
    h.start(0);
    h.drive(0, 60_000, 1_000);

    assert_eq!(h.sink.phase_changes(), 1);
    assert!(h.sink.events.iter().any(|e| matches!(
        e,
        AppEvent::PhaseChanged {
            from: GasPhase::Conditioning,
            to: GasPhase::SteadyMeasuring,
        }
    )));
}

#[test]
fn steady_task_starts_only_after_the_transition() {
    let mut h = Harness::new(&test_config());
    h.start(0);
    h.drive(0, 20_000, 1_000);

    let first_steady = h
        .suite
        .calls
        .iter()
        .position(|c| *c == SuiteCall::GasIndices)
        .expect("steady task must eventually run");
    let last_conditioning = h
        .suite
        .calls
        .iter()
        .rposition(|c| *c == SuiteCall::Condition)
        .expect("conditioning must have run");
    assert!(last_conditioning < first_steady);
}

// ── Baseline restore ──────────────────────────────────────────

#[test]
fn fresh_baseline_is_restored_with_exact_values() {
    let config = SystemConfig::default(); // 10-minute staleness window
    let now = 3_600_000;
    let mut h = Harness::new(&config);
    baseline::save(
        &mut h.nvs,
        &BaselineRecord {
            state1: 31_500.0,
            state2: 146.0,
            saved_at_ms: now - 5 * 60 * 1000, // 5 minutes ago
        },
    )
    .unwrap();

    h.start(now);
    assert_eq!(h.suite.restored, Some((31_500.0, 146.0)));
    assert!(h
        .sink
        .events
        .iter()
        .any(|e| matches!(e, AppEvent::BaselineRestored { .. })));
}

#[test]
fn stale_baseline_cold_starts_the_algorithm() {
    let config = SystemConfig::default();
    let now = 3_600_000;
    let mut h = Harness::new(&config);
    baseline::save(
        &mut h.nvs,
        &BaselineRecord {
            state1: 31_500.0,
            state2: 146.0,
            saved_at_ms: now - 20 * 60 * 1000, // 20 minutes ago
        },
    )
    .unwrap();

    h.start(now);
    assert_eq!(h.suite.restored, None);
    assert!(!h
        .sink
        .events
        .iter()
        .any(|e| matches!(e, AppEvent::BaselineRestored { .. })));
}

#[test]
fn missing_baseline_cold_starts_the_algorithm() {
    let mut h = Harness::new(&SystemConfig::default());
    h.start(0);
    assert_eq!(h.suite.restored, None);
}

// ── Baseline save ─────────────────────────────────────────────

#[test]
fn saving_waits_for_the_warmup_delay() {
    let mut h = Harness::new(&test_config());
    h.start(0);

    h.drive(0, 29_000, 1_000);
    assert_eq!(h.sink.saves(), 0);
    assert!(!h.nvs.exists(baseline::NAMESPACE, baseline::KEY));

    h.drive(30_000, 50_000, 1_000);
    assert_eq!(h.sink.saves(), 3); // t = 30s, 40s, 50s
    assert!(h.nvs.exists(baseline::NAMESPACE, baseline::KEY));
}

#[test]
fn saved_record_carries_baseline_and_timestamp() {
    let mut h = Harness::new(&test_config());
    h.suite.baseline = (29_750.0, 133.0);
    h.start(0);
    h.drive(0, 30_000, 1_000);

    let record = baseline::load(&h.nvs).expect("a record must have been committed");
    assert_eq!(record.state1, 29_750.0);
    assert_eq!(record.state2, 133.0);
    assert_eq!(record.saved_at_ms, 30_000);
}

// ── Cadence and temporal skew ─────────────────────────────────

#[test]
fn adapters_run_on_independent_cadences() {
    let mut h = Harness::new(&test_config());
    h.start(0);
    h.drive(0, 5_000, 100);

    // 2 s period → t = 0, 2000, 4000; 1 s period → t = 0..=5000.
    assert_eq!(h.suite.count(SuiteCall::Co2TRh), 3);
    assert_eq!(h.suite.count(SuiteCall::Particulates), 6);
    assert_eq!(h.suite.count(SuiteCall::Co), 6);
}

#[test]
fn reading_skewed_fields_together_is_fine() {
    let mut h = Harness::new(&test_config());
    h.start(0);
    h.drive(0, 5_000, 100);

    // The snapshot mixes values written at different instants; reading
    // them together is expected, not an error.
    let m = h.service.measurements();
    assert_eq!(m.co2_ppm, 3.0);
    assert_eq!(m.pm.mc_2p5, 6.0);
    assert_eq!(m.co_ppm, 6.0);
}
