//! Fourier-integral WMS model.
//!
//! For a target wavenumber `nu` and modulation depth `a`, the nth harmonic of
//! the transmitted signal under ideal cosine modulation is
//!
//! ```text
//! H_n(nu) = 1/pi * integral_{-pi}^{pi} T(nu + a cos u) cos(n u) du
//! ```
//!
//! `T` is evaluated on a fine auxiliary grid and interpolated at the
//! modulated wavenumbers; the integral uses Romberg quadrature over
//! [`PHASE_SAMPLES`] phase samples.

use std::f64::consts::PI;

use log::{debug, info};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::das::DasEngine;
use crate::dsp::{interp, romberg};
use crate::error::{Result, SynthesisError};
use crate::lineshape::{LineProfile, LineShapeAdapter};
use crate::spectrum::{linspace, GasParameters, SpectralGrid, SpectrumKind, WmsResult};

/// Phase samples over `[-pi, pi]`, `2^10 + 1` for Romberg quadrature
pub const PHASE_SAMPLES: usize = (1 << 10) + 1;

/// Auxiliary grid points per modulation depth
pub const AUXILIARY_POINTS_PER_DEPTH: f64 = 1024.0;

/// Upper bound on the auxiliary grid size (128 MiB of wavenumbers)
pub const MAX_AUXILIARY_POINTS: usize = 1 << 24;

/// Fine grid over `[min(grid), max(grid)]` with
/// `round((max - min) / depth * 1024) + 1` points.
///
/// Fails with `InvalidParameter` when that exceeds [`MAX_AUXILIARY_POINTS`].
pub fn auxiliary_grid(grid: &SpectralGrid, modulation_depth: f64) -> Result<SpectralGrid> {
    let span = grid.max() - grid.min();
    let intervals = (span / modulation_depth * AUXILIARY_POINTS_PER_DEPTH).round();
    if !intervals.is_finite() || intervals >= MAX_AUXILIARY_POINTS as f64 {
        return Err(SynthesisError::invalid(format!(
            "modulation depth {} cm^-1 is too small for a {} cm^-1 grid ({} points, limit {})",
            modulation_depth, span, intervals, MAX_AUXILIARY_POINTS
        )));
    }
    let points = (intervals as usize + 1).max(2);
    SpectralGrid::linspace(grid.min(), grid.max(), points)
}

/// nth harmonic Fourier coefficient of `T(xp) = fp` at `nu`.
pub fn harmonic_coefficient(
    nu: f64,
    modulation_depth: f64,
    harmonic: u32,
    xp: &[f64],
    fp: &[f64],
) -> Result<f64> {
    let phases = linspace(-PI, PI, PHASE_SAMPLES);
    let du = 2.0 * PI / (PHASE_SAMPLES - 1) as f64;
    let n = harmonic as f64;
    let samples: Vec<f64> = phases
        .iter()
        .map(|&u| interp(nu + modulation_depth * u.cos(), xp, fp) * (n * u).cos())
        .collect();
    Ok(romberg(&samples, du)? / PI)
}

pub(crate) fn validate_harmonic(harmonic: u32) -> Result<()> {
    if harmonic == 0 {
        return Err(SynthesisError::invalid("harmonic order must be at least 1"));
    }
    Ok(())
}

/// Theoretical WMS signal for every gas on `grid`.
pub fn compute_wms_theoretical<A: LineShapeAdapter>(
    das: &DasEngine<A>,
    gases: &[GasParameters],
    grid: &SpectralGrid,
    profile: LineProfile,
    harmonic: u32,
    modulation_depth: f64,
) -> Result<Vec<WmsResult>> {
    validate_harmonic(harmonic)?;
    if !(modulation_depth.is_finite() && modulation_depth > 0.0) {
        return Err(SynthesisError::invalid(format!(
            "modulation depth must be positive, got {}",
            modulation_depth
        )));
    }

    let aux = auxiliary_grid(grid, modulation_depth)?;
    info!(
        "Theoretical WMS {}f: {} gas(es), {} target points, depth {} cm^-1",
        harmonic,
        gases.len(),
        grid.len(),
        modulation_depth
    );
    debug!("Auxiliary grid: {} points", aux.len());

    let transmissions = das.compute_das(gases, &aux, profile, SpectrumKind::Transmission)?;

    transmissions
        .into_iter()
        .map(|spectrum| {
            let xp = spectrum.grid.as_slice();
            let fp = spectrum.values.as_slice();

            #[cfg(feature = "parallel")]
            let values = grid
                .as_slice()
                .par_iter()
                .map(|&nu| harmonic_coefficient(nu, modulation_depth, harmonic, xp, fp))
                .collect::<Result<Vec<f64>>>()?;

            #[cfg(not(feature = "parallel"))]
            let values = grid
                .iter()
                .map(|&nu| harmonic_coefficient(nu, modulation_depth, harmonic, xp, fp))
                .collect::<Result<Vec<f64>>>()?;

            Ok(WmsResult {
                gas: spectrum.gas,
                grid: grid.clone(),
                values,
                harmonic,
                modulation_depth,
                quadrature: None,
            })
        })
        .collect()
}
