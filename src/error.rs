//! Unified sensor-facing error types.
//!
//! Every bus trait in [`crate::sensors`] reports failures through
//! [`SensorError`] so the adapters' fail-loud/fail-stale handling stays
//! uniform. All variants are `Copy` so they can be logged and dropped
//! without allocation. The CO protocol driver keeps its own closed
//! error set in [`crate::drivers::ze15co`] — it is self-contained and
//! its errors never leave the adapter that owns it.

use core::fmt;

/// A sensor bus transaction failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// The vendor driver reported an error code for an I2C transaction.
    Bus(i16),
    /// The sensor's power-on self-test reported a failure word.
    SelfTest(u16),
    /// The sensor did not answer its probe.
    NotDetected,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bus(code) => write!(f, "bus error {code}"),
            Self::SelfTest(word) => write!(f, "self-test failed with 0x{word:04X}"),
            Self::NotDetected => write!(f, "sensor not detected"),
        }
    }
}

/// Crate-wide `Result` alias for bus operations.
pub type SensorResult<T> = core::result::Result<T, SensorError>;
