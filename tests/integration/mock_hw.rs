//! Mock adapters for integration tests.
//!
//! Records every sensor-port call so tests can assert on dispatch
//! order and counts without real buses.

use airmon::app::events::AppEvent;
use airmon::app::ports::{EventSink, SensorPort, StorageError, StoragePort};
use airmon::measurement::Measurements;
use std::collections::HashMap;

// ── Sensor-port call record ───────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuiteCall {
    Co2TRh,
    Particulates,
    Hcho,
    Condition,
    GasIndices,
    Uv,
    Co,
}

// ── MockSuite ─────────────────────────────────────────────────

/// Sensor suite stand-in. Each measure call writes a recognisable,
/// monotonically increasing value into the field(s) it owns so tests
/// can observe temporal skew between adapters.
pub struct MockSuite {
    pub calls: Vec<SuiteCall>,
    pub inited: bool,
    pub baseline: (f32, f32),
    pub restored: Option<(f32, f32)>,
}

impl MockSuite {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            inited: false,
            baseline: (31_000.0, 140.0),
            restored: None,
        }
    }

    pub fn count(&self, call: SuiteCall) -> usize {
        self.calls.iter().filter(|c| **c == call).count()
    }
}

impl Default for MockSuite {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorPort for MockSuite {
    fn init_all(&mut self) {
        self.inited = true;
    }

    fn measure_co2_t_rh(&mut self, data: &mut Measurements) {
        self.calls.push(SuiteCall::Co2TRh);
        data.co2_ppm = self.count(SuiteCall::Co2TRh) as f32;
    }

    fn measure_particulates(&mut self, data: &mut Measurements) {
        self.calls.push(SuiteCall::Particulates);
        data.pm.mc_2p5 = self.count(SuiteCall::Particulates) as f32;
    }

    fn measure_hcho(&mut self, data: &mut Measurements) {
        self.calls.push(SuiteCall::Hcho);
        data.hcho_ppb = self.count(SuiteCall::Hcho) as f32;
    }

    fn condition_gas_index(&mut self, _data: &Measurements) {
        self.calls.push(SuiteCall::Condition);
    }

    fn measure_gas_indices(&mut self, data: &mut Measurements) {
        self.calls.push(SuiteCall::GasIndices);
        data.voc_index = self.count(SuiteCall::GasIndices) as i32;
    }

    fn measure_uv(&mut self, data: &mut Measurements) {
        self.calls.push(SuiteCall::Uv);
        data.uv_index = self.count(SuiteCall::Uv) as f32;
    }

    fn measure_co(&mut self, data: &mut Measurements) {
        self.calls.push(SuiteCall::Co);
        data.co_ppm = self.count(SuiteCall::Co) as f32;
    }

    fn gas_baseline(&self) -> (f32, f32) {
        self.baseline
    }

    fn restore_gas_baseline(&mut self, state1: f32, state2: f32) {
        self.restored = Some((state1, state2));
    }
}

// ── MockNvs ───────────────────────────────────────────────────

pub struct MockNvs {
    store: HashMap<String, Vec<u8>>,
}

impl MockNvs {
    pub fn new() -> Self {
        Self {
            store: HashMap::new(),
        }
    }
}

impl Default for MockNvs {
    fn default() -> Self {
        Self::new()
    }
}

impl StoragePort for MockNvs {
    fn read(&self, namespace: &str, key: &str, buf: &mut [u8]) -> Result<usize, StorageError> {
        let k = format!("{}::{}", namespace, key);
        match self.store.get(&k) {
            Some(v) => {
                let n = v.len().min(buf.len());
                buf[..n].copy_from_slice(&v[..n]);
                Ok(n)
            }
            None => Err(StorageError::NotFound),
        }
    }

    fn write(&mut self, namespace: &str, key: &str, data: &[u8]) -> Result<(), StorageError> {
        let k = format!("{}::{}", namespace, key);
        self.store.insert(k, data.to_vec());
        Ok(())
    }

    fn delete(&mut self, namespace: &str, key: &str) -> Result<(), StorageError> {
        self.store.remove(&format!("{}::{}", namespace, key));
        Ok(())
    }

    fn exists(&self, namespace: &str, key: &str) -> bool {
        self.store.contains_key(&format!("{}::{}", namespace, key))
    }
}

// ── Recording event sink ──────────────────────────────────────

pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn phase_changes(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, AppEvent::PhaseChanged { .. }))
            .count()
    }

    pub fn saves(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, AppEvent::BaselineSaved { .. }))
            .count()
    }
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
