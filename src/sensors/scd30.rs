//! SCD30 CO2/temperature/humidity adapter.
//!
//! Owns the `co2_ppm`, `temperature_c` and `humidity_rh` fields of the
//! shared state.  Fail-loud: a failed read overwrites all three fields
//! with the NaN sentinel.  A failed readiness check only means "no new
//! data this tick" and leaves the fields alone.

use log::{info, warn};

use crate::error::SensorResult;
use crate::measurement::Measurements;
use crate::sensors::SensorTask;

/// Vendor driver entry points this adapter consumes (external).
pub trait Scd30Bus {
    /// Offset in centi-degrees, subtracted by the sensor from its own
    /// self-heating-skewed reading.
    fn set_temperature_offset(&mut self, offset_centi_c: u16) -> SensorResult<()>;
    /// `ambient_pressure_mbar` of 0 disables pressure compensation.
    fn start_periodic_measurement(&mut self, ambient_pressure_mbar: u16) -> SensorResult<()>;
    fn data_ready(&mut self) -> SensorResult<bool>;
    /// Returns `(co2_ppm, temperature_c, humidity_rh)`.
    fn read_measurement(&mut self) -> SensorResult<(f32, f32, f32)>;
}

pub struct Scd30Sensor<B: Scd30Bus> {
    bus: B,
    temperature_offset: u16,
}

impl<B: Scd30Bus> Scd30Sensor<B> {
    pub fn new(bus: B, temperature_offset: u16) -> Self {
        Self {
            bus,
            temperature_offset,
        }
    }
}

impl<B: Scd30Bus> SensorTask for Scd30Sensor<B> {
    fn init(&mut self) {
        if let Err(e) = self.bus.set_temperature_offset(self.temperature_offset) {
            warn!("SCD30 error trying to set temperature offset: {e}");
        }
        match self.bus.start_periodic_measurement(0) {
            Ok(()) => info!("SCD30 periodic measurement started"),
            Err(e) => warn!("SCD30 error trying to start measurements: {e}"),
        }
    }

    fn measure(&mut self, data: &mut Measurements) {
        let ready = match self.bus.data_ready() {
            Ok(r) => r,
            Err(e) => {
                warn!("SCD30 data readiness check error: {e}");
                return;
            }
        };
        if !ready {
            return;
        }

        match self.bus.read_measurement() {
            Ok((co2, temperature, humidity)) => {
                data.co2_ppm = co2;
                data.temperature_c = temperature;
                data.humidity_rh = humidity;
            }
            Err(e) => {
                warn!("SCD30 reading measurement data error: {e}");
                data.co2_ppm = f32::NAN;
                data.temperature_c = f32::NAN;
                data.humidity_rh = f32::NAN;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SensorError;

    struct FakeBus {
        ready: SensorResult<bool>,
        reading: SensorResult<(f32, f32, f32)>,
    }

    impl Scd30Bus for FakeBus {
        fn set_temperature_offset(&mut self, _offset: u16) -> SensorResult<()> {
            Ok(())
        }
        fn start_periodic_measurement(&mut self, _pressure: u16) -> SensorResult<()> {
            Ok(())
        }
        fn data_ready(&mut self) -> SensorResult<bool> {
            self.ready
        }
        fn read_measurement(&mut self) -> SensorResult<(f32, f32, f32)> {
            self.reading
        }
    }

    #[test]
    fn writes_all_three_fields_when_ready() {
        let mut sensor = Scd30Sensor::new(
            FakeBus {
                ready: Ok(true),
                reading: Ok((612.0, 21.4, 48.0)),
            },
            200,
        );
        let mut data = Measurements::new();
        sensor.measure(&mut data);
        assert_eq!(data.co2_ppm, 612.0);
        assert_eq!(data.temperature_c, 21.4);
        assert_eq!(data.humidity_rh, 48.0);
    }

    #[test]
    fn not_ready_leaves_state_untouched() {
        let mut sensor = Scd30Sensor::new(
            FakeBus {
                ready: Ok(false),
                reading: Ok((612.0, 21.4, 48.0)),
            },
            200,
        );
        let mut data = Measurements::new();
        data.co2_ppm = 500.0;
        sensor.measure(&mut data);
        assert_eq!(data.co2_ppm, 500.0);
    }

    #[test]
    fn read_error_is_fail_loud() {
        let mut sensor = Scd30Sensor::new(
            FakeBus {
                ready: Ok(true),
                reading: Err(SensorError::Bus(-1)),
            },
            200,
        );
        let mut data = Measurements::new();
        data.co2_ppm = 500.0;
        data.temperature_c = 20.0;
        data.humidity_rh = 40.0;
        sensor.measure(&mut data);
        assert!(data.co2_ppm.is_nan());
        assert!(data.temperature_c.is_nan());
        assert!(data.humidity_rh.is_nan());
    }

    #[test]
    fn readiness_error_keeps_previous_values() {
        let mut sensor = Scd30Sensor::new(
            FakeBus {
                ready: Err(SensorError::Bus(-1)),
                reading: Ok((612.0, 21.4, 48.0)),
            },
            200,
        );
        let mut data = Measurements::new();
        data.co2_ppm = 500.0;
        sensor.measure(&mut data);
        assert_eq!(data.co2_ppm, 500.0);
    }
}
