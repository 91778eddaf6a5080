//! System configuration parameters
//!
//! All tunable parameters for the AirMon monitor: per-sensor poll
//! periods, the SGP41 conditioning budget, and the VOC baseline
//! save/restore cadence. Values can be overridden via NVS.

use serde::{Deserialize, Serialize};

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Poll periods ---
    /// SCD30 (CO2/T/RH) poll period (milliseconds)
    pub scd30_poll_ms: u64,
    /// SPS30 (particulates) poll period (milliseconds)
    pub sps30_poll_ms: u64,
    /// SFA30 (formaldehyde) poll period (milliseconds)
    pub sfa30_poll_ms: u64,
    /// SGP41 sampling period, shared by conditioning and measurement
    /// (milliseconds). The gas index algorithm is tuned for 1 Hz.
    pub gas_sampling_ms: u64,
    /// VEML6075 (UV) poll period (milliseconds)
    pub uv_poll_ms: u64,
    /// ZE15-CO poll period (milliseconds)
    pub co_poll_ms: u64,

    // --- SGP41 conditioning ---
    /// Number of conditioning ticks before steady measurement starts.
    /// Longer conditioning overheats the sensing element.
    pub conditioning_iterations: u32,

    // --- VOC baseline persistence ---
    /// Delay after boot before baseline saving is armed (milliseconds)
    pub baseline_save_warmup_ms: u64,
    /// Baseline save period once armed (milliseconds)
    pub baseline_save_interval_ms: u64,
    /// Maximum age at which a persisted baseline is still restored
    /// (milliseconds). Matches the save period: a gap longer than one
    /// save interval implies the device was off long enough for
    /// ambient drift to invalidate the state.
    pub baseline_max_age_ms: u64,

    // --- Sensor init constants ---
    /// SCD30 temperature offset in centi-degrees, empirically determined
    pub scd30_temperature_offset: u16,
    /// SPS30 fan auto-clean interval (days)
    pub sps30_auto_clean_days: u8,

    // --- Telemetry ---
    /// Telemetry report interval (seconds)
    pub telemetry_interval_secs: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            scd30_poll_ms: 2_000,
            sps30_poll_ms: 1_000,
            sfa30_poll_ms: 2_000,
            gas_sampling_ms: 1_000,
            uv_poll_ms: 1_000,
            co_poll_ms: 1_000,

            conditioning_iterations: 10,

            baseline_save_warmup_ms: 3 * 60 * 60 * 1000,
            baseline_save_interval_ms: 10 * 60 * 1000,
            baseline_max_age_ms: 10 * 60 * 1000,

            scd30_temperature_offset: 200,
            sps30_auto_clean_days: 4,

            telemetry_interval_secs: 60,
        }
    }
}
