//! SFA30 formaldehyde adapter.
//!
//! Owns the `hcho_ppb` field of the shared state.  Fail-loud: a failed
//! read overwrites the field with the NaN sentinel.  The sensor also
//! reports its own humidity and temperature; those are discarded here
//! because the SCD30 owns the T/RH fields (single writer per field).

use log::{info, warn};

use crate::error::SensorResult;
use crate::measurement::Measurements;
use crate::sensors::SensorTask;

/// The SFA30 reports HCHO in increments of 0.2 ppb.
const HCHO_RAW_PER_PPB: f32 = 5.0;

/// Vendor driver entry points this adapter consumes (external).
pub trait Sfa30Bus {
    fn start_continuous_measurement(&mut self) -> SensorResult<()>;
    /// Returns `(hcho_raw, humidity_raw, temperature_raw)`.
    fn read_measured_values(&mut self) -> SensorResult<(i16, i16, i16)>;
}

pub struct Sfa30Sensor<B: Sfa30Bus> {
    bus: B,
}

impl<B: Sfa30Bus> Sfa30Sensor<B> {
    pub fn new(bus: B) -> Self {
        Self { bus }
    }
}

impl<B: Sfa30Bus> SensorTask for Sfa30Sensor<B> {
    fn init(&mut self) {
        match self.bus.start_continuous_measurement() {
            Ok(()) => info!("SFA30 continuous measurement started"),
            Err(e) => warn!("SFA30 error trying to start measurements: {e}"),
        }
    }

    fn measure(&mut self, data: &mut Measurements) {
        match self.bus.read_measured_values() {
            Ok((hcho_raw, _humidity_raw, _temperature_raw)) => {
                data.hcho_ppb = f32::from(hcho_raw) / HCHO_RAW_PER_PPB;
            }
            Err(e) => {
                warn!("SFA30 reading measurement data error: {e}");
                data.hcho_ppb = f32::NAN;
            }
        }
    }
}
