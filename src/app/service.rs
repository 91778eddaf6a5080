//! Orchestration service — the application core.
//!
//! [`MonitorService`] owns the scheduler, the gas phase machine, the
//! baseline-save gate and the shared measurement state.  All I/O flows
//! through port traits injected at call sites, making the entire
//! service testable with mock adapters.
//!
//! ```text
//!  SensorPort ──▶ ┌───────────────────────────────┐ ──▶ EventSink
//!                 │        MonitorService          │
//! StoragePort ◀──│  Scheduler · GasPhase · Saver  │
//!                 └───────────────────────────────┘
//! ```
//!
//! One `execute()` call runs one scheduling pass.  The service
//! implements the scheduler's [`TaskRunner`] with a split-borrow
//! dispatcher so each due task reaches exactly one adapter while the
//! shared state is borrowed once — the single-writer-per-field rule
//! holds structurally, not by convention.

use log::{info, warn};

use crate::adapters::baseline::{self, BaselineRecord};
use crate::config::SystemConfig;
use crate::measurement::Measurements;
use crate::phase::{BaselineSaver, GasPhase, GasPhaseMachine, PhaseCommand, PhaseEvent};
use crate::scheduler::{Budget, Scheduler, TaskId, TaskRunner, TaskSpec};

use super::events::{AppEvent, TelemetrySnapshot};
use super::ports::{EventSink, SensorPort, StoragePort};

// ───────────────────────────────────────────────────────────────
// Task registration
// ───────────────────────────────────────────────────────────────

/// Handles for every registered task, in registration (= execution)
/// order.
#[derive(Debug, Clone, Copy)]
struct TaskIds {
    scd30: TaskId,
    sps30: TaskId,
    sfa30: TaskId,
    /// Finite budget; disarmed until the phase machine starts it.
    conditioning: TaskId,
    /// Unbounded; disarmed until conditioning completes.
    gas_measure: TaskId,
    uv: TaskId,
    co: TaskId,
    baseline_save: TaskId,
    telemetry: TaskId,
}

fn register_tasks(scheduler: &mut Scheduler, config: &SystemConfig) -> Option<TaskIds> {
    let on = |label, period_ms| TaskSpec {
        label,
        period_ms,
        budget: Budget::Unbounded,
        enabled: true,
    };

    Some(TaskIds {
        scd30: scheduler.add(on("scd30", config.scd30_poll_ms))?,
        sps30: scheduler.add(on("sps30", config.sps30_poll_ms))?,
        sfa30: scheduler.add(on("sfa30", config.sfa30_poll_ms))?,
        conditioning: scheduler.add(TaskSpec {
            label: "sgp41-conditioning",
            period_ms: config.gas_sampling_ms,
            budget: Budget::Finite(config.conditioning_iterations),
            enabled: false,
        })?,
        gas_measure: scheduler.add(TaskSpec {
            label: "sgp41-measure",
            period_ms: config.gas_sampling_ms,
            budget: Budget::Unbounded,
            enabled: false,
        })?,
        uv: scheduler.add(on("veml6075", config.uv_poll_ms))?,
        co: scheduler.add(on("ze15co", config.co_poll_ms))?,
        baseline_save: scheduler.add(on("baseline-save", config.baseline_save_interval_ms))?,
        telemetry: scheduler.add(on(
            "telemetry",
            u64::from(config.telemetry_interval_secs) * 1000,
        ))?,
    })
}

// ───────────────────────────────────────────────────────────────
// MonitorService
// ───────────────────────────────────────────────────────────────

/// The orchestration core.
pub struct MonitorService {
    scheduler: Scheduler,
    tasks: TaskIds,
    phase: GasPhaseMachine,
    saver: BaselineSaver,
    data: Measurements,
    baseline_max_age_ms: u64,
}

impl MonitorService {
    /// Construct the service from configuration.
    ///
    /// Returns `None` only if the fixed task set exceeds the scheduler
    /// capacity, which a correct build cannot hit.
    pub fn new(config: &SystemConfig) -> Option<Self> {
        let mut scheduler = Scheduler::new();
        let tasks = register_tasks(&mut scheduler, config)?;

        Some(Self {
            scheduler,
            tasks,
            phase: GasPhaseMachine::new(),
            saver: BaselineSaver::new(config.baseline_save_warmup_ms),
            data: Measurements::new(),
            baseline_max_age_ms: config.baseline_max_age_ms,
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Boot sequence: initialise every adapter, restore the persisted
    /// VOC baseline if it is still trustworthy, and arm the
    /// conditioning phase.  Runs once, before the first `execute()`.
    pub fn start(
        &mut self,
        now_ms: u64,
        suite: &mut impl SensorPort,
        store: &impl StoragePort,
        sink: &mut impl EventSink,
    ) {
        suite.init_all();

        match baseline::load(store) {
            Some(record) if record.is_restorable(now_ms, self.baseline_max_age_ms) => {
                suite.restore_gas_baseline(record.state1, record.state2);
                sink.emit(&AppEvent::BaselineRestored {
                    state1: record.state1,
                    state2: record.state2,
                });
            }
            Some(record) => {
                info!(
                    "Persisted VOC baseline unusable (age {} ms), cold-starting algorithm",
                    now_ms.saturating_sub(record.saved_at_ms)
                );
            }
            None => info!("No persisted VOC baseline, cold-starting algorithm"),
        }

        if let Some(command) = self.phase.handle(PhaseEvent::Started) {
            self.apply_phase_command(command);
        }
        sink.emit(&AppEvent::Started(self.phase.phase()));
        info!("MonitorService started in {:?}", self.phase.phase());
    }

    /// The current gas sensor phase.
    pub fn phase(&self) -> GasPhase {
        self.phase.phase()
    }

    /// Read-only view of the shared measurement state, for consumers
    /// on their own cadence (display, tests).
    pub fn measurements(&self) -> &Measurements {
        &self.data
    }

    // ── Per-pass orchestration ────────────────────────────────

    /// Run one scheduling pass: every due task's adapter runs to
    /// completion, in registration order, then any phase transition
    /// produced during the pass is applied to the scheduler.
    pub fn execute(
        &mut self,
        now_ms: u64,
        suite: &mut impl SensorPort,
        store: &mut impl StoragePort,
        sink: &mut impl EventSink,
    ) {
        let mut dispatch = Dispatch {
            tasks: self.tasks,
            now_ms,
            data: &mut self.data,
            phase: &mut self.phase,
            saver: &mut self.saver,
            suite,
            store,
            sink: &mut *sink,
            transition: None,
        };
        self.scheduler.execute(now_ms, &mut dispatch);

        if let Some((from, to, command)) = dispatch.transition {
            self.apply_phase_command(command);
            sink.emit(&AppEvent::PhaseChanged { from, to });
        }
    }

    // ── Internal ──────────────────────────────────────────────

    fn apply_phase_command(&mut self, command: PhaseCommand) {
        match command {
            PhaseCommand::EnableConditioning => {
                self.scheduler.set_enabled(self.tasks.conditioning, true);
            }
            PhaseCommand::EnableMeasurement => {
                // The conditioning budget has already disabled its
                // task; stating it keeps the tasks mutually exclusive
                // even if the command ever arrives another way.
                self.scheduler.set_enabled(self.tasks.conditioning, false);
                self.scheduler.set_enabled(self.tasks.gas_measure, true);
            }
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Task dispatch
// ───────────────────────────────────────────────────────────────

/// Split-borrow dispatcher: maps due task ids onto adapter calls while
/// `MonitorService::execute` holds the scheduler itself.
struct Dispatch<'a, SP, ST, EK>
where
    SP: SensorPort,
    ST: StoragePort,
    EK: EventSink,
{
    tasks: TaskIds,
    now_ms: u64,
    data: &'a mut Measurements,
    phase: &'a mut GasPhaseMachine,
    saver: &'a mut BaselineSaver,
    suite: &'a mut SP,
    store: &'a mut ST,
    sink: &'a mut EK,
    /// Phase transition raised during this pass, applied after it.
    transition: Option<(GasPhase, GasPhase, PhaseCommand)>,
}

impl<SP, ST, EK> Dispatch<'_, SP, ST, EK>
where
    SP: SensorPort,
    ST: StoragePort,
    EK: EventSink,
{
    fn save_baseline(&mut self) {
        if !self.saver.should_save(self.now_ms) {
            return;
        }
        let (state1, state2) = self.suite.gas_baseline();
        let record = BaselineRecord {
            state1,
            state2,
            saved_at_ms: self.now_ms,
        };
        match baseline::save(self.store, &record) {
            Ok(()) => self.sink.emit(&AppEvent::BaselineSaved { at_ms: self.now_ms }),
            Err(e) => warn!("VOC baseline save failed: {e}"),
        }
    }
}

impl<SP, ST, EK> TaskRunner for Dispatch<'_, SP, ST, EK>
where
    SP: SensorPort,
    ST: StoragePort,
    EK: EventSink,
{
    fn run(&mut self, id: TaskId) {
        let t = self.tasks;
        if id == t.scd30 {
            self.suite.measure_co2_t_rh(self.data);
        } else if id == t.sps30 {
            self.suite.measure_particulates(self.data);
        } else if id == t.sfa30 {
            self.suite.measure_hcho(self.data);
        } else if id == t.conditioning {
            self.suite.condition_gas_index(self.data);
        } else if id == t.gas_measure {
            self.suite.measure_gas_indices(self.data);
        } else if id == t.uv {
            self.suite.measure_uv(self.data);
        } else if id == t.co {
            self.suite.measure_co(self.data);
        } else if id == t.baseline_save {
            self.save_baseline();
        } else if id == t.telemetry {
            self.sink.emit(&AppEvent::Telemetry(TelemetrySnapshot {
                phase: self.phase.phase(),
                data: *self.data,
            }));
        }
    }

    fn on_budget_exhausted(&mut self, id: TaskId) {
        if id != self.tasks.conditioning {
            return;
        }
        let from = self.phase.phase();
        if let Some(command) = self.phase.handle(PhaseEvent::ConditioningBudgetExhausted) {
            self.transition = Some((from, self.phase.phase(), command));
        }
    }
}
