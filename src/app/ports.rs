//! Port traits — the boundary between the orchestration core and the
//! outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ MonitorService (domain)
//! ```
//!
//! Driven adapters (the sensor suite, storage, event sinks) implement
//! these traits.  The [`MonitorService`](super::service::MonitorService)
//! consumes them via generics, so the domain core never touches
//! hardware directly.

use crate::config::SystemConfig;
use crate::measurement::Measurements;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// The sensing operations the scheduler dispatches to.
///
/// Each `measure_*` call is one tick of one adapter: non-blocking,
/// run-to-completion, writing into `data` per that adapter's failure
/// policy.  `condition_gas_index` is the SGP41's warm-up pulse —
/// mutually exclusive with `measure_gas_indices` by phase.
pub trait SensorPort {
    /// One-time setup of every adapter, in registration order.
    fn init_all(&mut self);

    fn measure_co2_t_rh(&mut self, data: &mut Measurements);
    fn measure_particulates(&mut self, data: &mut Measurements);
    fn measure_hcho(&mut self, data: &mut Measurements);
    fn condition_gas_index(&mut self, data: &Measurements);
    fn measure_gas_indices(&mut self, data: &mut Measurements);
    fn measure_uv(&mut self, data: &mut Measurements);
    fn measure_co(&mut self, data: &mut Measurements);

    /// The VOC algorithm's current baseline pair.
    fn gas_baseline(&self) -> (f32, f32);

    /// Resume the VOC algorithm from a persisted baseline pair.
    fn restore_gas_baseline(&mut self, state1: f32, state2: f32);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go (serial log,
/// display, network).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists system configuration.
///
/// Implementations MUST validate config values before persisting:
/// invalid ranges are rejected with [`ConfigError::ValidationFailed`],
/// not silently clamped.
pub trait ConfigPort {
    /// Load configuration from persistent storage.
    /// Returns [`SystemConfig::default()`] if no stored config exists.
    fn load(&self) -> Result<SystemConfig, ConfigError>;

    /// Validate and persist configuration.
    fn save(&self, config: &SystemConfig) -> Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Storage port (driven adapter: domain ↔ NVS / flash)
// ───────────────────────────────────────────────────────────────

/// Persistent key-value storage.
///
/// Keys and namespaces are limited to 15 characters by the NVS
/// engine.  Write operations MUST be atomic per key — no partial
/// blobs on power loss (the ESP-IDF NVS API guarantees this natively;
/// the in-memory simulation achieves it trivially).
pub trait StoragePort {
    /// Read a value.  Returns the number of bytes written to `buf`.
    fn read(&self, namespace: &str, key: &str, buf: &mut [u8]) -> Result<usize, StorageError>;

    /// Write a value atomically.
    fn write(&mut self, namespace: &str, key: &str, data: &[u8]) -> Result<(), StorageError>;

    /// Delete a key.  Returns `Ok(())` even if the key didn't exist.
    fn delete(&mut self, namespace: &str, key: &str) -> Result<(), StorageError>;

    /// Check whether a key exists without reading it.
    fn exists(&self, namespace: &str, key: &str) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations.
#[derive(Debug)]
pub enum ConfigError {
    /// No config found in storage (first boot).
    NotFound,
    /// Stored config failed integrity / deserialization check.
    Corrupted,
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// Generic I/O error from the storage backend.
    IoError,
}

/// Errors from [`StoragePort`] operations.
#[derive(Debug)]
pub enum StorageError {
    /// Requested key does not exist.
    NotFound,
    /// Storage partition is full.
    Full,
    /// Generic I/O error.
    IoError,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "config not found"),
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl core::fmt::Display for StorageError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "key not found"),
            Self::Full => write!(f, "storage full"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}
