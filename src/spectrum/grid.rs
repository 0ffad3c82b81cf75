use serde::Serialize;

use crate::error::{Result, SynthesisError};

/// Strictly increasing wavenumber axis in cm^-1 with at least two points.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SpectralGrid {
    points: Vec<f64>,
}

impl SpectralGrid {
    /// Create a grid from wavenumber samples.
    ///
    /// Fails with `InvalidParameter` when fewer than two points are given, a
    /// sample is not finite, or the samples are not strictly increasing.
    pub fn new(points: Vec<f64>) -> Result<Self> {
        if points.len() < 2 {
            return Err(SynthesisError::invalid(format!(
                "spectral grid needs at least 2 points, got {}",
                points.len()
            )));
        }
        if let Some(bad) = points.iter().find(|p| !p.is_finite()) {
            return Err(SynthesisError::invalid(format!(
                "spectral grid contains non-finite wavenumber {}",
                bad
            )));
        }
        if let Some(idx) = points.windows(2).position(|w| w[1] <= w[0]) {
            return Err(SynthesisError::invalid(format!(
                "spectral grid must be strictly increasing (index {}: {} -> {})",
                idx,
                points[idx],
                points[idx + 1]
            )));
        }
        Ok(Self { points })
    }

    /// Evenly spaced grid over `[start, stop]` with `num` points, both ends included.
    pub fn linspace(start: f64, stop: f64, num: usize) -> Result<Self> {
        if num < 2 {
            return Err(SynthesisError::invalid(format!(
                "spectral grid needs at least 2 points, got {}",
                num
            )));
        }
        Self::new(linspace(start, stop, num))
    }

    /// Lowest wavenumber.
    pub fn min(&self) -> f64 {
        self.points[0]
    }

    /// Highest wavenumber.
    pub fn max(&self) -> f64 {
        self.points[self.points.len() - 1]
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false; a grid holds at least two points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Borrow the samples.
    pub fn as_slice(&self) -> &[f64] {
        &self.points
    }

    /// Iterate over the samples.
    pub fn iter(&self) -> std::slice::Iter<'_, f64> {
        self.points.iter()
    }

    /// Consume the grid, returning the samples.
    pub fn into_inner(self) -> Vec<f64> {
        self.points
    }
}

impl AsRef<[f64]> for SpectralGrid {
    fn as_ref(&self) -> &[f64] {
        &self.points
    }
}

/// `num` evenly spaced samples over `[start, stop]`; the last sample is exactly `stop`.
pub(crate) fn linspace(start: f64, stop: f64, num: usize) -> Vec<f64> {
    match num {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (num - 1) as f64;
            let mut out: Vec<f64> = (0..num).map(|i| start + i as f64 * step).collect();
            out[num - 1] = stop;
            out
        }
    }
}
