//! VEML6075 UV adapter.
//!
//! Owns the `uv_index`, `uva` and `uvb` fields of the shared state.
//! The vendor driver reports values without an error channel, and the
//! bus occasionally glitches; each value is therefore gated on a
//! plausibility window and the previous value is kept when a reading
//! falls outside it.

use log::warn;

use crate::error::SensorResult;
use crate::measurement::Measurements;
use crate::sensors::SensorTask;

/// Raw UVA/UVB counts outside this window are bus glitches.
const RAW_PLAUSIBLE: core::ops::Range<i32> = -100..10_000;
/// UV index values outside this window are bus glitches.
const INDEX_PLAUSIBLE: core::ops::Range<f32> = -1.0..20.0;

/// One raw reading from the sensor.
#[derive(Debug, Clone, Copy)]
pub struct UvReading {
    pub uva: i32,
    pub uvb: i32,
    pub index: f32,
}

/// Vendor driver entry points this adapter consumes (external).
pub trait Veml6075Bus {
    /// Applies the 400 ms integration time and high-dynamic mode.
    fn configure(&mut self) -> SensorResult<()>;
    fn read(&mut self) -> UvReading;
}

pub struct Veml6075Sensor<B: Veml6075Bus> {
    bus: B,
}

impl<B: Veml6075Bus> Veml6075Sensor<B> {
    pub fn new(bus: B) -> Self {
        Self { bus }
    }
}

impl<B: Veml6075Bus> SensorTask for Veml6075Sensor<B> {
    fn init(&mut self) {
        if let Err(e) = self.bus.configure() {
            warn!("VEML6075 configuration error: {e}");
        }
    }

    fn measure(&mut self, data: &mut Measurements) {
        let reading = self.bus.read();

        if RAW_PLAUSIBLE.contains(&reading.uva) {
            data.uva = reading.uva;
        }
        if RAW_PLAUSIBLE.contains(&reading.uvb) {
            data.uvb = reading.uvb;
        }
        if INDEX_PLAUSIBLE.contains(&reading.index) {
            data.uv_index = reading.index;
        }
    }
}
