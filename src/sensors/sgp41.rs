//! SGP41 VOC/NOx adapter.
//!
//! Owns the `voc_index` and `nox_index` fields of the shared state.
//! Fail-stale: a failed raw-signal read leaves both indices unchanged
//! (the raw transaction cannot tell "no sample" from a glitch).
//!
//! The raw MOx signals are turned into indices by two gas-index
//! algorithm instances consumed behind [`GasIndexAlgorithm`] — their
//! internals are a vendor black box; this crate only persists and
//! restores the VOC instance's two baseline values.
//!
//! Raw-signal reads take humidity/temperature compensation ticks.
//! These are recomputed every tick from the current shared state —
//! the compensation must track the room, not the conditions at first
//! power-on.  When the T/RH fields hold the fail-loud NaN sentinel,
//! the sensor's documented default ticks (50 %RH / 25 °C) are used
//! for that tick.

use log::{info, warn};

use crate::error::SensorResult;
use crate::measurement::Measurements;
use crate::sensors::SensorTask;

/// Compensation ticks for 50 %RH, used when humidity is unavailable.
const DEFAULT_RH_TICKS: u16 = 0x8000;
/// Compensation ticks for 25 °C, used when temperature is unavailable.
const DEFAULT_T_TICKS: u16 = 0x6666;

/// The self-test word the sensor returns when all checks pass.
const SELF_TEST_OK: u16 = 0xD400;

/// Vendor driver entry points this adapter consumes (external).
pub trait Sgp41Bus {
    /// Runs the on-chip self-test and returns the raw result word.
    fn execute_self_test(&mut self) -> SensorResult<u16>;
    /// One heater conditioning pulse. Returns the raw VOC signal,
    /// which is not index-worthy during conditioning.
    fn execute_conditioning(&mut self, rh_ticks: u16, t_ticks: u16) -> SensorResult<u16>;
    /// Returns `(sraw_voc, sraw_nox)`.
    fn measure_raw_signals(&mut self, rh_ticks: u16, t_ticks: u16) -> SensorResult<(u16, u16)>;
}

/// Gas index algorithm consumed as a black box (external).
///
/// `states` / `set_states` expose the two opaque baseline values the
/// VOC instance needs to resume calibration across reboots.
pub trait GasIndexAlgorithm {
    fn process(&mut self, sraw: u16) -> i32;
    fn states(&self) -> (f32, f32);
    fn set_states(&mut self, state1: f32, state2: f32);
}

/// Convert the shared-state humidity/temperature into SGP41
/// compensation ticks, falling back to the sensor defaults when either
/// input is the NaN sentinel.
pub fn compensation_ticks(humidity_rh: f32, temperature_c: f32) -> (u16, u16) {
    if !humidity_rh.is_finite() || !temperature_c.is_finite() {
        return (DEFAULT_RH_TICKS, DEFAULT_T_TICKS);
    }
    let rh = (humidity_rh.clamp(0.0, 100.0) / 100.0 * 65535.0) as u16;
    let t = ((temperature_c.clamp(-45.0, 130.0) + 45.0) / 175.0 * 65535.0) as u16;
    (rh, t)
}

pub struct Sgp41Sensor<B, V, N>
where
    B: Sgp41Bus,
    V: GasIndexAlgorithm,
    N: GasIndexAlgorithm,
{
    bus: B,
    voc: V,
    nox: N,
}

impl<B, V, N> Sgp41Sensor<B, V, N>
where
    B: Sgp41Bus,
    V: GasIndexAlgorithm,
    N: GasIndexAlgorithm,
{
    pub fn new(bus: B, voc: V, nox: N) -> Self {
        Self { bus, voc, nox }
    }

    /// One conditioning pulse. Scheduled for a strictly bounded number
    /// of ticks before steady measurement takes over.
    pub fn condition(&mut self, data: &Measurements) {
        let (rh_ticks, t_ticks) = compensation_ticks(data.humidity_rh, data.temperature_c);
        if let Err(e) = self.bus.execute_conditioning(rh_ticks, t_ticks) {
            warn!("SGP41 conditioning error: {e}");
        }
    }

    /// The VOC algorithm's current baseline pair, for persistence.
    pub fn baseline(&self) -> (f32, f32) {
        self.voc.states()
    }

    /// Resume the VOC algorithm from a persisted baseline pair.
    pub fn restore_baseline(&mut self, state1: f32, state2: f32) {
        self.voc.set_states(state1, state2);
        info!("SGP41 VOC baseline restored: state1={state1} state2={state2}");
    }
}

impl<B, V, N> SensorTask for Sgp41Sensor<B, V, N>
where
    B: Sgp41Bus,
    V: GasIndexAlgorithm,
    N: GasIndexAlgorithm,
{
    fn init(&mut self) {
        match self.bus.execute_self_test() {
            Ok(SELF_TEST_OK) => info!("SGP41 self-test passed"),
            Ok(word) => warn!("SGP41 self-test failed with result: 0x{word:04X}"),
            Err(e) => warn!("SGP41 error trying to execute self-test: {e}"),
        }
    }

    fn measure(&mut self, data: &mut Measurements) {
        let (rh_ticks, t_ticks) = compensation_ticks(data.humidity_rh, data.temperature_c);
        match self.bus.measure_raw_signals(rh_ticks, t_ticks) {
            Ok((sraw_voc, sraw_nox)) => {
                data.voc_index = self.voc.process(sraw_voc);
                data.nox_index = self.nox.process(sraw_nox);
            }
            Err(e) => warn!("SGP41 reading measurement data error: {e}"),
        }
    }
}
