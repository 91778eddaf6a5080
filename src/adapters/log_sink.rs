//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events
//! to the logger (UART / USB-CDC in production, stderr on host).
//! The display subsystem consumes the same events through its own
//! sink implementation.

use log::info;

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Telemetry(t) => {
                let d = &t.data;
                info!(
                    "TELEM | phase={:?} | CO2={:.0}ppm T={:.1}\u{00b0}C RH={:.1}% | \
                     PM2.5={:.1}ug/m3 | HCHO={:.1}ppb | VOC={} NOx={} | \
                     UVI={:.1} | CO={:.1}ppm",
                    t.phase,
                    d.co2_ppm,
                    d.temperature_c,
                    d.humidity_rh,
                    d.pm.mc_2p5,
                    d.hcho_ppb,
                    d.voc_index,
                    d.nox_index,
                    d.uv_index,
                    d.co_ppm,
                );
            }
            AppEvent::PhaseChanged { from, to } => {
                info!("PHASE | {:?} -> {:?}", from, to);
            }
            AppEvent::BaselineRestored { state1, state2 } => {
                info!("BASELINE | restored state1={state1} state2={state2}");
            }
            AppEvent::BaselineSaved { at_ms } => {
                info!("BASELINE | saved at {at_ms} ms");
            }
            AppEvent::Started(phase) => {
                info!("START | initial_phase={:?}", phase);
            }
        }
    }
}
