//! Sensor subsystem — one task adapter per sensing subsystem, and the
//! aggregating [`SensorSuite`].
//!
//! Every adapter exposes the same `{init, measure}` capability pair
//! ([`SensorTask`]) and owns the fail-loud/fail-stale policy for its
//! fields (ownership table in [`crate::measurement`]).  `init()` never
//! aborts startup — failures are logged and the default field values
//! stay in place.  `measure()` never blocks: "no new data yet" is a
//! normal, frequent outcome, retried implicitly on the next scheduled
//! tick.
//!
//! The low-level bus protocols live behind per-sensor traits
//! (`Scd30Bus`, `Sps30Bus`, …) — they are vendor territory, consumed
//! but not implemented here.  [`sim`] provides host-side stand-ins.

pub mod co;
pub mod scd30;
pub mod sfa30;
pub mod sgp41;
pub mod sim;
pub mod sps30;
pub mod veml6075;

use crate::app::ports::SensorPort;
use crate::drivers::ze15co::CoSerialBus;
use crate::measurement::Measurements;

use co::CoSensor;
use scd30::{Scd30Bus, Scd30Sensor};
use sfa30::{Sfa30Bus, Sfa30Sensor};
use sgp41::{GasIndexAlgorithm, Sgp41Bus, Sgp41Sensor};
use sps30::{Sps30Bus, Sps30Sensor};
use veml6075::{Veml6075Bus, Veml6075Sensor};

/// The capability pair every sensor adapter exposes.
pub trait SensorTask {
    /// One-time setup. Must not block and must not abort startup:
    /// failures are logged and default field values remain.
    fn init(&mut self);

    /// One tick's worth of non-blocking work. Writes into `data` only
    /// when new values (or an error sentinel, per policy) apply.
    fn measure(&mut self, data: &mut Measurements);
}

/// Aggregates all sensor adapters and exposes them to the
/// orchestration service through [`SensorPort`].
///
/// Pass in pre-built adapters (built in `main` where the buses are
/// established).
pub struct SensorSuite<C, P, F, G, V, N, U, Z>
where
    C: Scd30Bus,
    P: Sps30Bus,
    F: Sfa30Bus,
    G: Sgp41Bus,
    V: GasIndexAlgorithm,
    N: GasIndexAlgorithm,
    U: Veml6075Bus,
    Z: CoSerialBus,
{
    scd30: Scd30Sensor<C>,
    sps30: Sps30Sensor<P>,
    sfa30: Sfa30Sensor<F>,
    sgp41: Sgp41Sensor<G, V, N>,
    veml6075: Veml6075Sensor<U>,
    co: CoSensor<Z>,
}

impl<C, P, F, G, V, N, U, Z> SensorSuite<C, P, F, G, V, N, U, Z>
where
    C: Scd30Bus,
    P: Sps30Bus,
    F: Sfa30Bus,
    G: Sgp41Bus,
    V: GasIndexAlgorithm,
    N: GasIndexAlgorithm,
    U: Veml6075Bus,
    Z: CoSerialBus,
{
    pub fn new(
        scd30: Scd30Sensor<C>,
        sps30: Sps30Sensor<P>,
        sfa30: Sfa30Sensor<F>,
        sgp41: Sgp41Sensor<G, V, N>,
        veml6075: Veml6075Sensor<U>,
        co: CoSensor<Z>,
    ) -> Self {
        Self {
            scd30,
            sps30,
            sfa30,
            sgp41,
            veml6075,
            co,
        }
    }
}

impl<C, P, F, G, V, N, U, Z> SensorPort for SensorSuite<C, P, F, G, V, N, U, Z>
where
    C: Scd30Bus,
    P: Sps30Bus,
    F: Sfa30Bus,
    G: Sgp41Bus,
    V: GasIndexAlgorithm,
    N: GasIndexAlgorithm,
    U: Veml6075Bus,
    Z: CoSerialBus,
{
    fn init_all(&mut self) {
        let tasks: [&mut dyn SensorTask; 6] = [
            &mut self.scd30,
            &mut self.sps30,
            &mut self.sfa30,
            &mut self.sgp41,
            &mut self.veml6075,
            &mut self.co,
        ];
        for task in tasks {
            task.init();
        }
    }

    fn measure_co2_t_rh(&mut self, data: &mut Measurements) {
        self.scd30.measure(data);
    }

    fn measure_particulates(&mut self, data: &mut Measurements) {
        self.sps30.measure(data);
    }

    fn measure_hcho(&mut self, data: &mut Measurements) {
        self.sfa30.measure(data);
    }

    fn condition_gas_index(&mut self, data: &Measurements) {
        self.sgp41.condition(data);
    }

    fn measure_gas_indices(&mut self, data: &mut Measurements) {
        self.sgp41.measure(data);
    }

    fn measure_uv(&mut self, data: &mut Measurements) {
        self.veml6075.measure(data);
    }

    fn measure_co(&mut self, data: &mut Measurements) {
        self.co.measure(data);
    }

    fn gas_baseline(&self) -> (f32, f32) {
        self.sgp41.baseline()
    }

    fn restore_gas_baseline(&mut self, state1: f32, state2: f32) {
        self.sgp41.restore_baseline(state1, state2);
    }
}
