//! Romberg integration of equally spaced samples.
//!
//! Successive trapezoid estimates with step `h, h/2, h/4, ...` are combined
//! by Richardson extrapolation. The sample count must be `2^k + 1`.

use crate::error::{Result, SynthesisError};

/// Integrate `samples` spaced `dx` apart.
///
/// Fails with `InvalidParameter` unless `samples.len() == 2^k + 1` for some
/// `k >= 0` (a single interval degenerates to the trapezoid rule).
pub fn romberg(samples: &[f64], dx: f64) -> Result<f64> {
    let intervals = samples.len().saturating_sub(1);
    if intervals == 0 || !intervals.is_power_of_two() {
        return Err(SynthesisError::invalid(format!(
            "Romberg integration needs 2^k + 1 samples, got {}",
            samples.len()
        )));
    }
    let levels = intervals.trailing_zeros() as usize;

    let mut h = intervals as f64 * dx;
    let mut prev = vec![0.5 * (samples[0] + samples[intervals]) * h];
    let mut stride = intervals;

    for i in 1..=levels {
        // Midpoints introduced at this refinement level
        let start = stride / 2;
        let midpoints: f64 = samples[start..intervals].iter().step_by(stride).sum();
        stride /= 2;

        let mut row = Vec::with_capacity(i + 1);
        row.push(0.5 * (prev[0] + h * midpoints));
        for j in 1..=i {
            let last = row[j - 1];
            let factor = ((1u64 << (2 * j)) - 1) as f64;
            row.push(last + (last - prev[j - 1]) / factor);
        }
        prev = row;
        h /= 2.0;
    }

    Ok(prev[levels])
}
