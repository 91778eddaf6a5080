//! Simulation backends for every sensor bus.
//!
//! The vendor bus drivers are external collaborators; these stand-ins
//! implement the same traits with synthetic but plausible data so the
//! full orchestration stack runs on a host target.  The gas-index
//! stand-in is NOT the vendor algorithm — it only mimics the shape of
//! its interface (index output, two-value baseline).

use heapless::Deque;

use crate::drivers::ze15co::{checksum, CoSerialBus, FRAME_LEN};
use crate::error::SensorResult;
use crate::measurement::ParticulateMatter;
use crate::sensors::scd30::Scd30Bus;
use crate::sensors::sfa30::Sfa30Bus;
use crate::sensors::sgp41::{GasIndexAlgorithm, Sgp41Bus};
use crate::sensors::sps30::Sps30Bus;
use crate::sensors::veml6075::{UvReading, Veml6075Bus};

// ── SCD30 ─────────────────────────────────────────────────────

pub struct SimScd30 {
    tick: u32,
}

impl SimScd30 {
    pub fn new() -> Self {
        Self { tick: 0 }
    }
}

impl Scd30Bus for SimScd30 {
    fn set_temperature_offset(&mut self, _offset_centi_c: u16) -> SensorResult<()> {
        Ok(())
    }

    fn start_periodic_measurement(&mut self, _ambient_pressure_mbar: u16) -> SensorResult<()> {
        Ok(())
    }

    fn data_ready(&mut self) -> SensorResult<bool> {
        Ok(true)
    }

    fn read_measurement(&mut self) -> SensorResult<(f32, f32, f32)> {
        self.tick = self.tick.wrapping_add(1);
        let drift = (self.tick % 30) as f32;
        Ok((620.0 + drift * 4.0, 21.0 + drift * 0.05, 45.0 + drift * 0.2))
    }
}

// ── SPS30 ─────────────────────────────────────────────────────

pub struct SimSps30 {
    tick: u32,
}

impl SimSps30 {
    pub fn new() -> Self {
        Self { tick: 0 }
    }
}

impl Sps30Bus for SimSps30 {
    fn probe(&mut self) -> SensorResult<()> {
        Ok(())
    }

    fn set_fan_auto_cleaning_interval_days(&mut self, _days: u8) -> SensorResult<()> {
        Ok(())
    }

    fn start_measurement(&mut self) -> SensorResult<()> {
        Ok(())
    }

    fn data_ready(&mut self) -> SensorResult<bool> {
        // New frame roughly every other poll.
        self.tick = self.tick.wrapping_add(1);
        Ok(self.tick % 2 == 0)
    }

    fn read_measurement(&mut self) -> SensorResult<ParticulateMatter> {
        let wobble = (self.tick % 12) as f32 * 0.3;
        Ok(ParticulateMatter {
            mc_1p0: 2.1 + wobble,
            mc_2p5: 3.6 + wobble,
            mc_4p0: 4.0 + wobble,
            mc_10p0: 4.2 + wobble,
            nc_0p5: 11.0 + wobble,
            nc_1p0: 13.5 + wobble,
            nc_2p5: 13.9 + wobble,
            nc_4p0: 14.0 + wobble,
            nc_10p0: 14.1 + wobble,
            typical_particle_size: 430.0,
        })
    }
}

// ── SFA30 ─────────────────────────────────────────────────────

pub struct SimSfa30 {
    tick: u32,
}

impl SimSfa30 {
    pub fn new() -> Self {
        Self { tick: 0 }
    }
}

impl Sfa30Bus for SimSfa30 {
    fn start_continuous_measurement(&mut self) -> SensorResult<()> {
        Ok(())
    }

    fn read_measured_values(&mut self) -> SensorResult<(i16, i16, i16)> {
        self.tick = self.tick.wrapping_add(1);
        let hcho_raw = 60 + (self.tick % 40) as i16;
        Ok((hcho_raw, 2400, 1080))
    }
}

// ── SGP41 ─────────────────────────────────────────────────────

pub struct SimSgp41 {
    tick: u32,
}

impl SimSgp41 {
    pub fn new() -> Self {
        Self { tick: 0 }
    }
}

impl Sgp41Bus for SimSgp41 {
    fn execute_self_test(&mut self) -> SensorResult<u16> {
        Ok(0xD400)
    }

    fn execute_conditioning(&mut self, _rh_ticks: u16, _t_ticks: u16) -> SensorResult<u16> {
        Ok(0)
    }

    fn measure_raw_signals(&mut self, _rh_ticks: u16, _t_ticks: u16) -> SensorResult<(u16, u16)> {
        self.tick = self.tick.wrapping_add(1);
        let sway = (self.tick % 100) as u16;
        Ok((27_500 + sway * 3, 16_800 + sway))
    }
}

/// Gas-index stand-in: a slow running mean plus a fixed spread, enough
/// to exercise baseline save/restore end to end.
pub struct SimGasIndex {
    offset: i32,
    mean: f32,
    std: f32,
}

impl SimGasIndex {
    pub fn voc() -> Self {
        Self {
            offset: 100,
            mean: 0.0,
            std: 50.0,
        }
    }

    pub fn nox() -> Self {
        Self {
            offset: 1,
            mean: 0.0,
            std: 50.0,
        }
    }
}

impl GasIndexAlgorithm for SimGasIndex {
    fn process(&mut self, sraw: u16) -> i32 {
        let sraw = f32::from(sraw);
        if self.mean == 0.0 {
            self.mean = sraw;
        }
        self.mean += (sraw - self.mean) * 0.01;
        let index = self.offset as f32 + (sraw - self.mean) / 10.0;
        index.clamp(1.0, 500.0) as i32
    }

    fn states(&self) -> (f32, f32) {
        (self.mean, self.std)
    }

    fn set_states(&mut self, state1: f32, state2: f32) {
        self.mean = state1;
        self.std = state2;
    }
}

// ── VEML6075 ──────────────────────────────────────────────────

pub struct SimVeml6075 {
    tick: u32,
}

impl SimVeml6075 {
    pub fn new() -> Self {
        Self { tick: 0 }
    }
}

impl Veml6075Bus for SimVeml6075 {
    fn configure(&mut self) -> SensorResult<()> {
        Ok(())
    }

    fn read(&mut self) -> UvReading {
        self.tick = self.tick.wrapping_add(1);
        UvReading {
            uva: 180 + (self.tick % 50) as i32,
            uvb: 90 + (self.tick % 25) as i32,
            index: 1.5 + (self.tick % 10) as f32 * 0.1,
        }
    }
}

// ── ZE15-CO ───────────────────────────────────────────────────

/// Models the sensor end of the UART: a bounded RX FIFO that gets a
/// valid response frame queued for every read command received.
pub struct SimCoSerial {
    rx: Deque<u8, 64>,
    tick: u32,
}

impl SimCoSerial {
    pub fn new() -> Self {
        Self {
            rx: Deque::new(),
            tick: 0,
        }
    }

    fn queue_response(&mut self) {
        self.tick = self.tick.wrapping_add(1);
        let raw = 20 + (self.tick % 15) as u16; // 2.0–3.4 ppm
        let mut frame = [0u8; FRAME_LEN];
        frame[0] = 0xFF;
        frame[2] = (raw >> 8) as u8 & 0x1F;
        frame[3] = (raw & 0xFF) as u8;
        frame[8] = checksum(&frame);
        for byte in frame {
            // FIFO overflow drops the newest bytes, like the hardware.
            let _ = self.rx.push_back(byte);
        }
    }
}

impl CoSerialBus for SimCoSerial {
    fn write(&mut self, bytes: &[u8]) -> usize {
        self.queue_response();
        bytes.len()
    }

    fn flush(&mut self) {}

    fn available(&self) -> usize {
        self.rx.len()
    }

    fn read(&mut self, buf: &mut [u8]) -> usize {
        let mut n = 0;
        while n < buf.len() {
            match self.rx.pop_front() {
                Some(b) => {
                    buf[n] = b;
                    n += 1;
                }
                None => break,
            }
        }
        n
    }
}
