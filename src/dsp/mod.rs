//! Numerical primitives shared by the DAS and WMS engines.
//!
//! - [`interp`]: clamped piecewise-linear interpolation
//! - [`romberg`]: Romberg quadrature over `2^k + 1` equally spaced samples
//! - [`IirFilter`]: Butterworth low-pass biquad cascades
//! - [`HarmonicDemodulator`]: software lock-in for the nth harmonic

mod demod;
mod iir;
mod interp;
mod romberg;

pub use demod::{filter_harmonic, HarmonicDemodulator, LOWPASS_ORDER};
pub use iir::{Biquad, IirFilter};
pub use interp::{count_out_of_range, interp, interp_many};
pub use romberg::romberg;
