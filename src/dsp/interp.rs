//! Piecewise-linear interpolation on an increasing abscissa.
//!
//! Queries outside `[xp[0], xp[last]]` clamp to the edge values, so the
//! result is always finite for finite tables.

/// Interpolate `fp(xp)` at `x`.
///
/// `xp` must be increasing and the same length as `fp` (at least one point).
pub fn interp(x: f64, xp: &[f64], fp: &[f64]) -> f64 {
    debug_assert_eq!(xp.len(), fp.len());
    let last = xp.len() - 1;
    if x <= xp[0] {
        return fp[0];
    }
    if x >= xp[last] {
        return fp[last];
    }

    // First index with xp[i] > x; x lies in [xp[i-1], xp[i])
    let i = xp.partition_point(|&v| v <= x);
    let (x0, x1) = (xp[i - 1], xp[i]);
    let (y0, y1) = (fp[i - 1], fp[i]);
    let t = (x - x0) / (x1 - x0);
    y0 + (y1 - y0) * t
}

/// Interpolate `fp(xp)` at every point of `xs`.
pub fn interp_many(xs: &[f64], xp: &[f64], fp: &[f64]) -> Vec<f64> {
    xs.iter().map(|&x| interp(x, xp, fp)).collect()
}

/// Number of queries falling outside `[xp[0], xp[last]]`.
pub fn count_out_of_range(xs: &[f64], xp: &[f64]) -> usize {
    let (lo, hi) = (xp[0], xp[xp.len() - 1]);
    xs.iter().filter(|&&x| x < lo || x > hi).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_interp_at_nodes() {
        let xp = [0.0, 1.0, 2.0];
        let fp = [10.0, 20.0, 40.0];
        assert_eq!(interp(0.0, &xp, &fp), 10.0);
        assert_eq!(interp(1.0, &xp, &fp), 20.0);
        assert_eq!(interp(2.0, &xp, &fp), 40.0);
    }

    #[test]
    fn test_interp_between_nodes() {
        let xp = [0.0, 1.0, 2.0];
        let fp = [10.0, 20.0, 40.0];
        assert_relative_eq!(interp(0.5, &xp, &fp), 15.0);
        assert_relative_eq!(interp(1.25, &xp, &fp), 25.0);
    }

    #[test]
    fn test_interp_clamps_outside() {
        let xp = [0.0, 1.0];
        let fp = [3.0, 5.0];
        assert_eq!(interp(-10.0, &xp, &fp), 3.0);
        assert_eq!(interp(10.0, &xp, &fp), 5.0);
        assert_eq!(count_out_of_range(&[-1.0, 0.5, 2.0], &xp), 2);
    }

    #[test]
    fn test_interp_many() {
        let xp = [0.0, 2.0];
        let fp = [0.0, 4.0];
        assert_eq!(interp_many(&[0.5, 1.0, 1.5], &xp, &fp), vec![1.0, 2.0, 3.0]);
    }
}
