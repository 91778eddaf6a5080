//! Cooperative task scheduler.
//!
//! Runs every measurement task from a single control loop — one
//! `execute()` pass per loop iteration, no preemption, every callback
//! runs to completion before the next is considered.  The scheduler
//! notifies a [`TaskRunner`] when a task is due; the orchestration
//! service implements the runner and dispatches to the right sensor
//! adapter.  This keeps the scheduler free of any knowledge about
//! sensors, shared state, or phases, and independently testable.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                    Control loop                          │
//! │                        │                                 │
//! │                        ▼  once per iteration             │
//! │              Scheduler::execute(now_ms)                  │
//! │                        │                                 │
//! │      for each slot, in registration order:               │
//! │        due?  ──▶  runner.run(id)                         │
//! │        budget hit zero? ──▶ disable slot,                │
//! │                             runner.on_budget_exhausted() │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! The scheduler has no concept of callback failure: callbacks handle
//! and log their own errors and return.

use log::info;

/// Maximum number of registered tasks (stack-allocated slots).
pub const MAX_TASKS: usize = 12;

/// Handle to a registered task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskId(usize);

/// Iteration budget: how many times a task runs before it disables itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Budget {
    /// Run `n` times, then disable and fire the completion callback.
    Finite(u32),
    /// Run forever (until explicitly disabled).
    Unbounded,
}

/// A task registration.
#[derive(Debug, Clone, Copy)]
pub struct TaskSpec {
    /// Human-readable label used in log lines.
    pub label: &'static str,
    /// Duration between runs, in milliseconds.
    pub period_ms: u64,
    /// Iteration budget.
    pub budget: Budget,
    /// Whether the task starts armed. A disarmed task waits for
    /// [`Scheduler::set_enabled`].
    pub enabled: bool,
}

/// Receives due-task and budget-exhausted notifications during a pass.
pub trait TaskRunner {
    /// Called when `id` is due. Runs to completion before the scheduler
    /// considers the next slot.
    fn run(&mut self, id: TaskId);

    /// Called synchronously, in the same pass, when a finite task's
    /// last iteration has just run.  The task is already disabled.
    fn on_budget_exhausted(&mut self, _id: TaskId) {}
}

/// Internal bookkeeping for a registered task.
#[derive(Debug, Clone, Copy)]
struct TaskEntry {
    spec: TaskSpec,
    /// Remaining iterations for `Budget::Finite`.
    remaining: Option<u32>,
    /// Timestamp of the last run; `None` until the first run, which
    /// makes a freshly armed task due immediately.
    last_run_ms: Option<u64>,
}

/// The scheduler engine.
pub struct Scheduler {
    slots: [Option<TaskEntry>; MAX_TASKS],
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            slots: [None; MAX_TASKS],
        }
    }

    /// Register a task. Returns its handle, or `None` if all slots are
    /// taken. Slot order is registration order and fixed for the
    /// lifetime of the process.
    pub fn add(&mut self, spec: TaskSpec) -> Option<TaskId> {
        for (i, slot) in self.slots.iter_mut().enumerate() {
            if slot.is_none() {
                info!(
                    "Scheduler: added '{}' at slot {} (period {} ms)",
                    spec.label, i, spec.period_ms
                );
                let remaining = match spec.budget {
                    Budget::Finite(n) => Some(n),
                    Budget::Unbounded => None,
                };
                *slot = Some(TaskEntry {
                    spec,
                    remaining,
                    last_run_ms: None,
                });
                return Some(TaskId(i));
            }
        }
        None // All slots full.
    }

    /// Arm or disarm a task. Takes effect before its next scheduled
    /// run; never interrupts a run in progress (runs are atomic by
    /// construction).
    pub fn set_enabled(&mut self, id: TaskId, enabled: bool) {
        if let Some(entry) = self.slots[id.0].as_mut() {
            if entry.spec.enabled != enabled {
                info!(
                    "Scheduler: '{}' {}",
                    entry.spec.label,
                    if enabled { "enabled" } else { "disabled" }
                );
            }
            entry.spec.enabled = enabled;
        }
    }

    pub fn is_enabled(&self, id: TaskId) -> bool {
        self.slots[id.0].is_some_and(|e| e.spec.enabled)
    }

    /// Run one scheduling pass.
    ///
    /// Slots are evaluated in registration order; a task is due when
    /// the elapsed time since its last run reaches its period (a task
    /// that has never run is due immediately).  Each due task's
    /// `runner.run()` completes before the next slot is considered.
    /// A finite task that has just spent its last iteration is
    /// disabled and `runner.on_budget_exhausted()` fires before the
    /// pass moves on.
    pub fn execute(&mut self, now_ms: u64, runner: &mut dyn TaskRunner) {
        for (i, slot) in self.slots.iter_mut().enumerate() {
            let entry = match slot {
                Some(e) if e.spec.enabled => e,
                _ => continue,
            };

            let due = match entry.last_run_ms {
                None => true,
                Some(last) => now_ms.saturating_sub(last) >= entry.spec.period_ms,
            };
            if !due {
                continue;
            }

            entry.last_run_ms = Some(now_ms);
            runner.run(TaskId(i));

            if let Some(remaining) = entry.remaining.as_mut() {
                *remaining = remaining.saturating_sub(1);
                if *remaining == 0 {
                    entry.spec.enabled = false;
                    info!("Scheduler: '{}' budget exhausted", entry.spec.label);
                    runner.on_budget_exhausted(TaskId(i));
                }
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    /// Test runner that records every notification.
    struct RecordingRunner {
        runs: Vec<TaskId>,
        exhausted: Vec<TaskId>,
    }

    impl RecordingRunner {
        fn new() -> Self {
            Self {
                runs: Vec::new(),
                exhausted: Vec::new(),
            }
        }

        fn run_count(&self, id: TaskId) -> usize {
            self.runs.iter().filter(|r| **r == id).count()
        }
    }

    impl TaskRunner for RecordingRunner {
        fn run(&mut self, id: TaskId) {
            self.runs.push(id);
        }

        fn on_budget_exhausted(&mut self, id: TaskId) {
            self.exhausted.push(id);
        }
    }

    fn unbounded(label: &'static str, period_ms: u64) -> TaskSpec {
        TaskSpec {
            label,
            period_ms,
            budget: Budget::Unbounded,
            enabled: true,
        }
    }

    #[test]
    fn first_run_is_immediate() {
        let mut sched = Scheduler::new();
        let mut runner = RecordingRunner::new();
        let id = sched.add(unbounded("t", 1000)).unwrap();

        sched.execute(0, &mut runner);
        assert_eq!(runner.runs, vec![id]);
    }

    #[test]
    fn runs_at_period_not_before() {
        let mut sched = Scheduler::new();
        let mut runner = RecordingRunner::new();
        let id = sched.add(unbounded("t", 1000)).unwrap();

        sched.execute(0, &mut runner);
        sched.execute(999, &mut runner);
        assert_eq!(runner.run_count(id), 1);

        sched.execute(1000, &mut runner);
        assert_eq!(runner.run_count(id), 2);
    }

    #[test]
    fn tasks_run_in_registration_order() {
        let mut sched = Scheduler::new();
        let mut runner = RecordingRunner::new();
        let a = sched.add(unbounded("a", 100)).unwrap();
        let b = sched.add(unbounded("b", 100)).unwrap();
        let c = sched.add(unbounded("c", 100)).unwrap();

        sched.execute(0, &mut runner);
        assert_eq!(runner.runs, vec![a, b, c]);
    }

    #[test]
    fn independent_cadences() {
        let mut sched = Scheduler::new();
        let mut runner = RecordingRunner::new();
        let fast = sched.add(unbounded("fast", 100)).unwrap();
        let slow = sched.add(unbounded("slow", 1000)).unwrap();

        for now in (0..=1000).step_by(100) {
            sched.execute(now, &mut runner);
        }
        assert_eq!(runner.run_count(fast), 11);
        assert_eq!(runner.run_count(slow), 2);
    }

    #[test]
    fn finite_budget_disables_exactly_once() {
        let mut sched = Scheduler::new();
        let mut runner = RecordingRunner::new();
        let id = sched
            .add(TaskSpec {
                label: "finite",
                period_ms: 100,
                budget: Budget::Finite(3),
                enabled: true,
            })
            .unwrap();

        for now in (0..2000).step_by(100) {
            sched.execute(now, &mut runner);
        }
        assert_eq!(runner.run_count(id), 3);
        assert_eq!(runner.exhausted, vec![id]);
        assert!(!sched.is_enabled(id));
    }

    #[test]
    fn exhausted_hook_fires_in_same_pass_as_last_run() {
        struct InPassCheck {
            runs: u32,
            exhausted_after_runs: Option<u32>,
        }
        impl TaskRunner for InPassCheck {
            fn run(&mut self, _id: TaskId) {
                self.runs += 1;
            }
            fn on_budget_exhausted(&mut self, _id: TaskId) {
                self.exhausted_after_runs = Some(self.runs);
            }
        }

        let mut sched = Scheduler::new();
        let mut runner = InPassCheck {
            runs: 0,
            exhausted_after_runs: None,
        };
        sched.add(TaskSpec {
            label: "oneshot",
            period_ms: 100,
            budget: Budget::Finite(1),
            enabled: true,
        });

        sched.execute(0, &mut runner);
        assert_eq!(runner.exhausted_after_runs, Some(1));
    }

    #[test]
    fn disarmed_task_waits_for_enable() {
        let mut sched = Scheduler::new();
        let mut runner = RecordingRunner::new();
        let id = sched
            .add(TaskSpec {
                label: "later",
                period_ms: 100,
                budget: Budget::Unbounded,
                enabled: false,
            })
            .unwrap();

        sched.execute(0, &mut runner);
        sched.execute(100, &mut runner);
        assert!(runner.runs.is_empty());

        sched.set_enabled(id, true);
        sched.execute(200, &mut runner);
        assert_eq!(runner.runs, vec![id]);
    }

    #[test]
    fn add_fails_when_full() {
        let mut sched = Scheduler::new();
        for _ in 0..MAX_TASKS {
            assert!(sched.add(unbounded("fill", 100)).is_some());
        }
        assert!(sched.add(unbounded("overflow", 100)).is_none());
    }
}
