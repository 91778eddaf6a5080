//! ZE15-CO carbon monoxide adapter.
//!
//! Owns the `co_ppm` field of the shared state.  Fail-loud: any
//! outcome of the poll other than a decoded value overwrites the field
//! with the NaN sentinel — including `NotAvailable`, which the
//! protocol cannot distinguish from a dead sensor within a single
//! poll.  The wire protocol itself lives in
//! [`crate::drivers::ze15co`].

use log::{debug, warn};

use crate::drivers::ze15co::{CoSerialBus, Ze15co, Ze15coError};
use crate::measurement::Measurements;
use crate::sensors::SensorTask;

pub struct CoSensor<B: CoSerialBus> {
    driver: Ze15co<B>,
}

impl<B: CoSerialBus> CoSensor<B> {
    pub fn new(driver: Ze15co<B>) -> Self {
        Self { driver }
    }
}

impl<B: CoSerialBus> SensorTask for CoSensor<B> {
    fn init(&mut self) {
        // The UART channel is opened by the platform bootstrap; the
        // sensor itself needs no setup in Q&A mode.
        debug!("ZE15CO: ready");
    }

    fn measure(&mut self, data: &mut Measurements) {
        match self.driver.read_co() {
            Ok(ppm) => data.co_ppm = ppm,
            Err(e) => {
                data.co_ppm = f32::NAN;
                match e {
                    Ze15coError::SensorFailure => warn!("ZE15CO: sensor failure!"),
                    Ze15coError::ChecksumMismatch => warn!("ZE15CO: checksum mismatch"),
                    Ze15coError::WriteError => warn!("ZE15CO: write error"),
                    // The sensor answers on its own schedule; this is
                    // the normal outcome of most polls.
                    Ze15coError::NotAvailable => debug!("ZE15CO: not available"),
                }
            }
        }
    }
}
