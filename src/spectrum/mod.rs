//! # Spectral value types
//!
//! Plain data produced and consumed by the engines:
//!
//! - [`SpectralGrid`]: strictly increasing wavenumber axis (cm^-1)
//! - [`GasParameters`]: one absorbing species and its thermodynamic state
//! - [`Spectrum`]: DAS output (coefficient, absorbance or transmission)
//! - [`WmsResult`]: demodulated nf harmonic signal
//!
//! All of them are created per computation and never mutated by the engines.
//! Batch totals are computed by [`total_das`] and [`total_wms`].

mod aggregate;
mod grid;
mod types;


pub use aggregate::{total_das, total_wms};
pub use grid::SpectralGrid;
pub(crate) use grid::linspace;
pub use types::{
    ConcentrationKind, GasParameters, GasParametersBuilder, Spectrum, SpectrumKind, WmsResult,
};
