//! SGP41 warm-up/measurement phases and baseline save gating.
//!
//! The gas-index sensor must run a short heater conditioning phase
//! before steady measurement may begin, and its two conditioning and
//! measurement tasks are mutually exclusive for the lifetime of the
//! process.  The transition lives here as an explicit table-driven
//! state machine instead of being wired through task callbacks, so
//! the one-shot hand-over is testable without a scheduler:
//!
//! ```text
//!  COLD_START ──[Started]──▶ CONDITIONING ──[budget exhausted]──▶ STEADY_MEASURING
//! ```
//!
//! The machine answers each event with an optional [`PhaseCommand`];
//! the orchestration service applies commands to the scheduler.  Any
//! event with no row in the table is ignored, which makes the
//! conditioning→steady transition idempotent.
//!
//! Orthogonal to the phases, [`BaselineSaver`] gates periodic
//! persistence of the VOC algorithm baseline: saving is pointless
//! until the algorithm has learned something, so the saver arms only
//! once a fixed warm-up delay since boot has elapsed.

use log::info;

/// SGP41 lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GasPhase {
    /// Before the service has started.
    ColdStart,
    /// Heater conditioning, fixed iteration budget.
    Conditioning,
    /// Unbounded steady measurement.
    SteadyMeasuring,
}

/// Events the phase machine reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseEvent {
    /// The service has started.
    Started,
    /// The conditioning task spent its last iteration.
    ConditioningBudgetExhausted,
}

/// Scheduler-facing commands produced by transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseCommand {
    /// Arm the conditioning task.
    EnableConditioning,
    /// Arm the steady measurement task (the conditioning task has
    /// already disabled itself by exhausting its budget).
    EnableMeasurement,
}

/// Transition table. A `None` row means the event is ignored in that
/// phase.
fn transition(phase: GasPhase, event: PhaseEvent) -> Option<(GasPhase, PhaseCommand)> {
    use GasPhase::*;
    use PhaseEvent::*;
    match (phase, event) {
        (ColdStart, Started) => Some((Conditioning, PhaseCommand::EnableConditioning)),
        (Conditioning, ConditioningBudgetExhausted) => {
            Some((SteadyMeasuring, PhaseCommand::EnableMeasurement))
        }
        _ => None,
    }
}

/// The phase state machine.
pub struct GasPhaseMachine {
    phase: GasPhase,
}

impl GasPhaseMachine {
    pub fn new() -> Self {
        Self {
            phase: GasPhase::ColdStart,
        }
    }

    pub fn phase(&self) -> GasPhase {
        self.phase
    }

    /// Feed an event through the transition table. Returns the command
    /// the caller must apply to the scheduler, if the event caused a
    /// transition.
    pub fn handle(&mut self, event: PhaseEvent) -> Option<PhaseCommand> {
        let (next, command) = transition(self.phase, event)?;
        info!("Gas phase: {:?} -> {:?}", self.phase, next);
        self.phase = next;
        Some(command)
    }
}

// ───────────────────────────────────────────────────────────────
// Baseline save gating
// ───────────────────────────────────────────────────────────────

/// Gates the periodic baseline save task on a boot warm-up delay.
///
/// The save task itself fires on the scheduler's fixed period; this
/// sub-machine only answers "is saving armed yet".  Two states:
/// `Waiting` until the warm-up delay since boot has elapsed, `Armed`
/// forever after.
pub struct BaselineSaver {
    warmup_ms: u64,
    armed: bool,
}

impl BaselineSaver {
    pub fn new(warmup_ms: u64) -> Self {
        Self {
            warmup_ms,
            armed: false,
        }
    }

    /// Whether a save firing at `now_ms` should go ahead.
    pub fn should_save(&mut self, now_ms: u64) -> bool {
        if !self.armed && now_ms >= self.warmup_ms {
            info!("Baseline saver armed ({} ms since boot)", now_ms);
            self.armed = true;
        }
        self.armed
    }
}
