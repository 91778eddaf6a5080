//! Persisted VOC algorithm baseline.
//!
//! The two opaque baseline values and their save timestamp are only
//! meaningful together, so they are committed as ONE postcard-encoded
//! record under a single NVS key — the per-key atomicity of the
//! storage engine then rules out a torn half-old/half-new baseline
//! after a crash mid-save.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::app::ports::{StorageError, StoragePort};

/// NVS namespace for everything this crate persists (≤15 chars).
pub const NAMESPACE: &str = "airmon";
/// Key holding the encoded [`BaselineRecord`] (≤15 chars).
pub const KEY: &str = "voc_baseline";

/// Upper bound on the encoded record size.
const MAX_RECORD_LEN: usize = 32;

/// The VOC algorithm's baseline pair plus its save timestamp
/// (milliseconds since boot at save time).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BaselineRecord {
    pub state1: f32,
    pub state2: f32,
    pub saved_at_ms: u64,
}

impl BaselineRecord {
    /// Whether this record may seed the algorithm at startup.
    ///
    /// A baseline is only trustworthy if the device was powered off
    /// briefly — `max_age_ms` equals the save period, so anything
    /// older implies ambient drift has invalidated the state.  A zero
    /// or non-finite value in either slot marks the pair unusable.
    pub fn is_restorable(&self, now_ms: u64, max_age_ms: u64) -> bool {
        let usable = |v: f32| v.is_finite() && v != 0.0;
        now_ms.saturating_sub(self.saved_at_ms) < max_age_ms
            && usable(self.state1)
            && usable(self.state2)
    }
}

/// Read the persisted record, if any. A missing or corrupt record is
/// reported as absent — restore falls back to the cold baseline.
pub fn load(store: &impl StoragePort) -> Option<BaselineRecord> {
    let mut buf = [0u8; MAX_RECORD_LEN];
    let n = store.read(NAMESPACE, KEY, &mut buf).ok()?;
    match postcard::from_bytes(&buf[..n]) {
        Ok(record) => Some(record),
        Err(_) => {
            warn!("Persisted VOC baseline is corrupt, ignoring");
            None
        }
    }
}

/// Commit a record. Best-effort: the caller logs failures and retries
/// on the next save interval.
pub fn save(store: &mut impl StoragePort, record: &BaselineRecord) -> Result<(), StorageError> {
    let bytes = postcard::to_allocvec(record).map_err(|_| StorageError::IoError)?;
    store.write(NAMESPACE, KEY, &bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct MemStore {
        map: HashMap<String, Vec<u8>>,
    }

    impl MemStore {
        fn new() -> Self {
            Self {
                map: HashMap::new(),
            }
        }
    }

    impl StoragePort for MemStore {
        fn read(&self, ns: &str, key: &str, buf: &mut [u8]) -> Result<usize, StorageError> {
            match self.map.get(&format!("{ns}::{key}")) {
                Some(v) => {
                    let n = v.len().min(buf.len());
                    buf[..n].copy_from_slice(&v[..n]);
                    Ok(n)
                }
                None => Err(StorageError::NotFound),
            }
        }
        fn write(&mut self, ns: &str, key: &str, data: &[u8]) -> Result<(), StorageError> {
            self.map.insert(format!("{ns}::{key}"), data.to_vec());
            Ok(())
        }
        fn delete(&mut self, ns: &str, key: &str) -> Result<(), StorageError> {
            self.map.remove(&format!("{ns}::{key}"));
            Ok(())
        }
        fn exists(&self, ns: &str, key: &str) -> bool {
            self.map.contains_key(&format!("{ns}::{key}"))
        }
    }

    const TEN_MINUTES: u64 = 10 * 60 * 1000;

    fn record(saved_at_ms: u64) -> BaselineRecord {
        BaselineRecord {
            state1: 31_500.0,
            state2: 146.0,
            saved_at_ms,
        }
    }

    #[test]
    fn round_trips_through_storage() {
        let mut store = MemStore::new();
        save(&mut store, &record(1234)).unwrap();
        assert_eq!(load(&store), Some(record(1234)));
    }

    #[test]
    fn missing_record_loads_as_none() {
        assert_eq!(load(&MemStore::new()), None);
    }

    #[test]
    fn corrupt_record_loads_as_none() {
        let mut store = MemStore::new();
        store.write(NAMESPACE, KEY, &[0xFF; 32]).unwrap();
        assert_eq!(load(&store), None);
    }

    #[test]
    fn fresh_record_is_restorable() {
        let now = TEN_MINUTES * 3;
        let rec = record(now - 5 * 60 * 1000); // saved 5 minutes ago
        assert!(rec.is_restorable(now, TEN_MINUTES));
    }

    #[test]
    fn stale_record_is_not_restorable() {
        let now = TEN_MINUTES * 3;
        let rec = record(now - 20 * 60 * 1000); // saved 20 minutes ago
        assert!(!rec.is_restorable(now, TEN_MINUTES));
    }

    #[test]
    fn age_equal_to_window_is_stale() {
        let now = TEN_MINUTES * 2;
        let rec = record(now - TEN_MINUTES);
        assert!(!rec.is_restorable(now, TEN_MINUTES));
    }

    #[test]
    fn zero_or_nan_values_are_not_restorable() {
        let now = 1000;
        for (s1, s2) in [
            (0.0, 146.0),
            (31_500.0, 0.0),
            (f32::NAN, 146.0),
            (31_500.0, f32::INFINITY),
        ] {
            let rec = BaselineRecord {
                state1: s1,
                state2: s2,
                saved_at_ms: now,
            };
            assert!(
                !rec.is_restorable(now, TEN_MINUTES),
                "({s1}, {s2}) must be rejected"
            );
        }
    }
}
