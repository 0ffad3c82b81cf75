//! Diagnostics on computed spectra.

/// Default number of samples averaged around each extremum
pub const DEFAULT_AVERAGING_WINDOW: usize = 50;

/// Peak-to-trough height of `signal[start..end]`.
///
/// Finds the global maximum of the window, the minimum to its left and the
/// minimum to its right, then returns
/// `mean(peak) - (mean(left) + mean(right)) / 2`. Each mean covers
/// `[idx - window/2, idx + window/2)` clipped to the analysed range (a single
/// sample when `window < 2`).
///
/// Returns `None` when the range is empty or out of bounds, or when the peak
/// sits on the first or last sample so one trough does not exist.
pub fn peak_trough_height(signal: &[f64], start: usize, end: usize, window: usize) -> Option<f64> {
    if start >= end || end > signal.len() {
        return None;
    }
    let data = &signal[start..end];

    let peak = argmax(data)?;
    if peak == 0 || peak == data.len() - 1 {
        return None;
    }
    let left = argmin(&data[..peak])?;
    let right = peak + 1 + argmin(&data[peak + 1..])?;

    let half = window / 2;
    let peak_mean = window_mean(data, peak, half);
    let left_mean = window_mean(data, left, half);
    let right_mean = window_mean(data, right, half);
    Some(peak_mean - 0.5 * (left_mean + right_mean))
}

fn argmax(data: &[f64]) -> Option<usize> {
    data.iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f64)>, (i, &v)| match best {
            Some((_, b)) if b >= v => best,
            _ => Some((i, v)),
        })
        .map(|(i, _)| i)
}

fn argmin(data: &[f64]) -> Option<usize> {
    data.iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f64)>, (i, &v)| match best {
            Some((_, b)) if b <= v => best,
            _ => Some((i, v)),
        })
        .map(|(i, _)| i)
}

fn window_mean(data: &[f64], idx: usize, half: usize) -> f64 {
    let lo = idx.saturating_sub(half);
    let hi = if half == 0 { idx + 1 } else { (idx + half).min(data.len()) };
    let slice = &data[lo..hi];
    slice.iter().sum::<f64>() / slice.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn sample<F: Fn(f64) -> f64>(f: F, a: f64, b: f64, n: usize) -> Vec<f64> {
        let dx = (b - a) / (n - 1) as f64;
        (0..n).map(|i| f(a + i as f64 * dx)).collect()
    }

    #[test]
    fn test_sine_period() {
        let signal = sample(f64::sin, -PI / 2.0, 1.5 * PI, 1000);
        let pth = peak_trough_height(&signal, 0, signal.len(), DEFAULT_AVERAGING_WINDOW).unwrap();
        assert!((pth - 2.0).abs() < 0.02, "got {}", pth);
    }

    #[test]
    fn test_two_sided_troughs() {
        // Mexican hat: peak 1 at 0, troughs -2 exp(-1.5) at +-sqrt(1.5)
        let signal = sample(|x| (1.0 - 2.0 * x * x) * (-x * x).exp(), -4.0, 4.0, 2001);
        let expected = 1.0 + 2.0 * (-1.5f64).exp();
        let pth = peak_trough_height(&signal, 0, signal.len(), 10).unwrap();
        assert!((pth - expected).abs() < 1e-3, "got {}", pth);
    }

    #[test]
    fn test_sub_window_offsets() {
        let mut signal = vec![5.0; 10];
        signal.extend([0.0, -1.0, 0.0, 3.0, 0.0, -2.0, 0.0]);
        signal.extend(vec![5.0; 10]);
        // window covers only the inner pattern; single-sample means
        let pth = peak_trough_height(&signal, 10, 17, 1).unwrap();
        assert_eq!(pth, 3.0 - 0.5 * (-1.0 + -2.0));
    }

    #[test]
    fn test_windows_are_clipped() {
        let signal = [0.0, -1.0, 2.0, -1.0, 0.0];
        let pth = peak_trough_height(&signal, 0, signal.len(), 50).unwrap();
        assert!(pth.is_finite());
    }

    #[test]
    fn test_right_trough_excludes_peak() {
        let pth = peak_trough_height(&[0.0, 5.0, 5.0], 0, 3, 1).unwrap();
        assert_eq!(pth, 2.5);

        // right trough is the plateau sample after the peak, averaged over [1, 3)
        let pth = peak_trough_height(&[0.0, 5.0, 5.0, 5.0], 0, 4, 2).unwrap();
        assert_eq!(pth, 0.0);
    }

    #[test]
    fn test_degenerate_ranges() {
        let rising: Vec<f64> = (0..10).map(|i| i as f64).collect();
        assert!(peak_trough_height(&rising, 0, 10, 4).is_none());
        assert!(peak_trough_height(&rising, 5, 5, 4).is_none());
        assert!(peak_trough_height(&rising, 0, 11, 4).is_none());
        assert!(peak_trough_height(&[], 0, 0, 4).is_none());
    }
}
