//! Outbound application events.
//!
//! The [`MonitorService`](super::service::MonitorService) emits these
//! through the [`EventSink`](super::ports::EventSink) port.  Adapters
//! on the other side decide what to do with them — log to serial,
//! hand to a display, publish upstream.

use crate::measurement::Measurements;
use crate::phase::GasPhase;

/// Structured events emitted by the orchestration core.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// The service has started (carries the initial gas phase).
    Started(GasPhase),

    /// The gas sensor moved between lifecycle phases.
    PhaseChanged { from: GasPhase, to: GasPhase },

    /// A persisted VOC baseline was accepted at startup.
    BaselineRestored { state1: f32, state2: f32 },

    /// The VOC baseline was committed to storage.
    BaselineSaved { at_ms: u64 },

    /// Periodic snapshot of the shared measurement state.
    Telemetry(TelemetrySnapshot),
}

/// A point-in-time copy of the shared state, suitable for logging or
/// transmission.  Fields owned by adapters with different periods may
/// stem from different sample instants — consumers must tolerate that
/// skew.
#[derive(Debug, Clone)]
pub struct TelemetrySnapshot {
    pub phase: GasPhase,
    pub data: Measurements,
}
