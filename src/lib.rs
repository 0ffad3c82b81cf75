//! # qclas - Laser Absorption Spectra Synthesis
//!
//! `qclas` simulates the spectra measured by tunable-diode and quantum-cascade
//! laser absorption instruments. It is a forward simulator: given gases, a
//! wavenumber grid and (for WMS) the laser driver settings, it produces the
//! signal the instrument would record.
//!
//! ## Key Features
//!
//! - **Direct absorption (DAS)**: absorption coefficient, absorbance or
//!   transmission per gas via Beer-Lambert, with optional Fabry-Perot etalons.
//!
//! - **Theoretical WMS**: nth-harmonic Fourier coefficients of the transmission
//!   under ideal cosine modulation, integrated with Romberg quadrature.
//!
//! - **Simulated WMS**: time-domain model of the laser ramp, modulation and
//!   optical power, demodulated by a 4th-order Butterworth lock-in.
//!
//! - **Pluggable line shapes**: line-by-line physics lives behind the
//!   [`lineshape::LineShapeAdapter`] trait; [`lineshape::TabulatedAdapter`]
//!   serves coefficients pre-computed by an external evaluator.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use qclas::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut adapter = TabulatedAdapter::new();
//! adapter.load_csv("NH3", "nh3_voigt.csv")?;
//! let engine = DasEngine::new(adapter);
//!
//! let gas = GasParameters::builder("NH3")
//!     .pressure_hpa(990.0)
//!     .temperature_k(293.15)
//!     .path_length_cm(2.0)
//!     .mixing_ratio(300e-9)
//!     .build()?;
//! let grid = SpectralGrid::linspace(1103.0, 1105.0, 1000)?;
//!
//! let spectra = engine.compute_das(&[gas], &grid, LineProfile::Voigt, SpectrumKind::Absorbance)?;
//! write_csv_file("nh3.csv", &spectra)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`units`]: mixing ratio and molar density conversions
//! - [`spectrum`]: grids, gas parameters and result types
//! - [`lineshape`]: the line-shape adapter boundary
//! - [`das`]: direct absorption engine
//! - [`dsp`]: interpolation, Romberg quadrature, Butterworth lock-in
//! - [`wms`]: theoretical and simulated wavelength modulation
//! - [`etalon`]: Fabry-Perot interference coefficients
//! - [`metrics`]: peak-to-trough height
//! - [`export`]: CSV output

// Documentation lints - enforce complete documentation for publication
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]
// Allow some patterns common in scientific code
#![allow(clippy::too_many_arguments)]

pub mod das;
pub mod dsp;
pub mod error;
pub mod etalon;
pub mod export;
pub mod lineshape;
pub mod metrics;
pub mod spectrum;
pub mod units;
pub mod wms;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::das::{DasEngine, DasOptions};
    pub use crate::dsp::{filter_harmonic, HarmonicDemodulator};
    pub use crate::error::{ErrorKind, SynthesisError};
    pub use crate::etalon::{generate_etalon_coeffs, EtalonCoeffs, EtalonParams};
    pub use crate::export::{write_csv, write_csv_file, ExportError, SpectralRecord};
    pub use crate::lineshape::{
        Environment, LineProfile, LineShapeAdapter, LineShapeError, LineTable, TabulatedAdapter,
    };
    pub use crate::metrics::peak_trough_height;
    pub use crate::spectrum::{
        total_das, total_wms, ConcentrationKind, GasParameters, SpectralGrid, Spectrum,
        SpectrumKind, WmsResult,
    };
    pub use crate::wms::{read_laser_config, LaserSpec, WmsEngine, WmsMethod, WmsSettings};
}

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
