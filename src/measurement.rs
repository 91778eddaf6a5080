//! Shared measurement state.
//!
//! One [`Measurements`] record holds the latest value for every
//! quantity the monitor reads. It is allocated once at startup and
//! mutated in place by the sensor adapters; consumers (display,
//! telemetry) read it on their own cadence, so values in a single
//! snapshot may come from different sample instants.
//!
//! ## Field ownership
//!
//! Exactly one adapter writes each field:
//!
//! | Field(s)                              | Owning adapter | On read error |
//! |---------------------------------------|----------------|---------------|
//! | `co2_ppm`, `temperature_c`, `humidity_rh` | SCD30      | NaN sentinel  |
//! | `pm` (all channels)                   | SPS30          | kept as-is    |
//! | `hcho_ppb`                            | SFA30          | NaN sentinel  |
//! | `voc_index`, `nox_index`              | SGP41          | kept as-is    |
//! | `uv_index`, `uva`, `uvb`              | VEML6075       | kept as-is (plausibility-gated) |
//! | `co_ppm`                              | ZE15-CO        | NaN sentinel  |
//!
//! The NaN sentinel distinguishes "errored" from "previous valid
//! reading" for sensors whose transactions report errors reliably;
//! the fail-stale fields belong to sensors whose transactions cannot
//! tell "no new data yet" from a transient fault.

/// Particulate mass and number concentrations as reported by the SPS30.
///
/// Mass concentrations in µg/m³, number concentrations in #/cm³,
/// typical particle size in nm.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ParticulateMatter {
    pub mc_1p0: f32,
    pub mc_2p5: f32,
    pub mc_4p0: f32,
    pub mc_10p0: f32,
    pub nc_0p5: f32,
    pub nc_1p0: f32,
    pub nc_2p5: f32,
    pub nc_4p0: f32,
    pub nc_10p0: f32,
    pub typical_particle_size: f32,
}

/// Latest reading of every measured quantity.
#[derive(Debug, Clone, Copy, Default)]
pub struct Measurements {
    /// CO2 concentration in ppm.
    pub co2_ppm: f32,
    /// Air temperature in °C.
    pub temperature_c: f32,
    /// Relative humidity in %.
    pub humidity_rh: f32,
    /// Particulate channels.
    pub pm: ParticulateMatter,
    /// Formaldehyde concentration in ppb.
    pub hcho_ppb: f32,
    /// Sensirion VOC gas index (1..=500, 0 until first valid sample).
    pub voc_index: i32,
    /// Sensirion NOx gas index (1..=500, 0 until first valid sample).
    pub nox_index: i32,
    /// UV index.
    pub uv_index: f32,
    /// Raw UVA channel.
    pub uva: i32,
    /// Raw UVB channel.
    pub uvb: i32,
    /// Carbon monoxide concentration in ppm.
    pub co_ppm: f32,
}

impl Measurements {
    /// Zero-valued state, as allocated at boot.
    pub fn new() -> Self {
        Self::default()
    }
}
