//! SPS30 particulate matter adapter.
//!
//! Owns the `pm` record of the shared state.  Fail-stale: the SPS30
//! transaction cannot distinguish "no new frame yet" from a transient
//! error, so errors leave the previous values in place.
//!
//! The vendor init sequence (probe, fan auto-clean interval, start
//! measurement) must not block startup, so a failed probe is retried
//! on later measure ticks instead of in a busy loop.

use log::{info, warn};

use crate::error::SensorResult;
use crate::measurement::{Measurements, ParticulateMatter};
use crate::sensors::SensorTask;

/// Vendor driver entry points this adapter consumes (external).
pub trait Sps30Bus {
    fn probe(&mut self) -> SensorResult<()>;
    fn set_fan_auto_cleaning_interval_days(&mut self, days: u8) -> SensorResult<()>;
    fn start_measurement(&mut self) -> SensorResult<()>;
    fn data_ready(&mut self) -> SensorResult<bool>;
    fn read_measurement(&mut self) -> SensorResult<ParticulateMatter>;
}

pub struct Sps30Sensor<B: Sps30Bus> {
    bus: B,
    auto_clean_days: u8,
    started: bool,
}

impl<B: Sps30Bus> Sps30Sensor<B> {
    pub fn new(bus: B, auto_clean_days: u8) -> Self {
        Self {
            bus,
            auto_clean_days,
            started: false,
        }
    }

    fn try_start(&mut self) {
        if let Err(e) = self.bus.probe() {
            warn!("SPS30 probing failed: {e}");
            return;
        }
        if let Err(e) = self
            .bus
            .set_fan_auto_cleaning_interval_days(self.auto_clean_days)
        {
            warn!("SPS30 error setting the auto-clean interval: {e}");
        }
        match self.bus.start_measurement() {
            Ok(()) => {
                info!("SPS30 measurement started");
                self.started = true;
            }
            Err(e) => warn!("SPS30 error starting measurements: {e}"),
        }
    }
}

impl<B: Sps30Bus> SensorTask for Sps30Sensor<B> {
    fn init(&mut self) {
        self.try_start();
    }

    fn measure(&mut self, data: &mut Measurements) {
        if !self.started {
            // Probe again on the schedule instead of blocking init.
            self.try_start();
            if !self.started {
                return;
            }
        }

        let ready = match self.bus.data_ready() {
            Ok(r) => r,
            Err(e) => {
                warn!("SPS30 data readiness check error: {e}");
                return;
            }
        };
        if !ready {
            return;
        }

        match self.bus.read_measurement() {
            Ok(pm) => data.pm = pm,
            Err(e) => warn!("SPS30 reading measurement data error: {e}"),
        }
    }
}
