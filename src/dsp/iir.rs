//! Butterworth low-pass IIR filters.
//!
//! Filters are cascades of biquad sections designed from the analog
//! Butterworth prototype with a pre-warped bilinear transform. Processing
//! starts from a zero state, so [`IirFilter::filter`] behaves like a
//! direct-form `lfilter(b, a, x)` with no initial conditions.

use num_complex::Complex64;
use std::f64::consts::PI;

use crate::error::{Result, SynthesisError};

/// A single second-order section.
///
/// Transfer function: H(z) = (b0 + b1*z^-1 + b2*z^-2) / (1 + a1*z^-1 + a2*z^-2),
/// evaluated in Direct Form II Transposed.
#[derive(Debug, Clone)]
pub struct Biquad {
    /// Numerator coefficients [b0, b1, b2]
    b: [f64; 3],
    /// Denominator coefficients [a1, a2] (a0 is normalized to 1)
    a: [f64; 2],
    state: [f64; 2],
}

impl Biquad {
    /// Create a section from numerator `[b0, b1, b2]` and denominator `[a1, a2]`.
    pub fn new(b: [f64; 3], a: [f64; 2]) -> Self {
        Self {
            b,
            a,
            state: [0.0; 2],
        }
    }

    /// Process one sample.
    pub fn process(&mut self, input: f64) -> f64 {
        let output = self.b[0] * input + self.state[0];
        self.state[0] = self.b[1] * input - self.a[0] * output + self.state[1];
        self.state[1] = self.b[2] * input - self.a[1] * output;
        output
    }

    /// Clear the delay line.
    pub fn reset(&mut self) {
        self.state = [0.0; 2];
    }

    /// Numerator coefficients.
    pub fn numerator(&self) -> &[f64; 3] {
        &self.b
    }

    /// Denominator coefficients (without the leading 1).
    pub fn denominator(&self) -> &[f64; 2] {
        &self.a
    }

    /// Poles inside the unit circle.
    pub fn is_stable(&self) -> bool {
        self.a[1].abs() < 1.0 && self.a[0].abs() < 1.0 + self.a[1]
    }
}

/// Low-pass IIR filter as a cascade of biquads
#[derive(Debug, Clone)]
pub struct IirFilter {
    sections: Vec<Biquad>,
    order: usize,
}

impl IirFilter {
    /// Design a Butterworth low-pass filter.
    ///
    /// # Arguments
    /// * `order` - Filter order (1-20)
    /// * `cutoff_hz` - -3 dB frequency in Hz, strictly below Nyquist
    /// * `sample_rate` - Sample rate in Hz
    pub fn butterworth_lowpass(order: usize, cutoff_hz: f64, sample_rate: f64) -> Result<Self> {
        if order == 0 || order > 20 {
            return Err(SynthesisError::invalid(format!(
                "filter order must be 1-20, got {}",
                order
            )));
        }
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            return Err(SynthesisError::invalid(format!(
                "sample rate must be positive, got {}",
                sample_rate
            )));
        }
        if !(cutoff_hz > 0.0 && cutoff_hz < sample_rate / 2.0) {
            return Err(SynthesisError::invalid(format!(
                "cutoff {} Hz must lie in (0, {}) Hz",
                cutoff_hz,
                sample_rate / 2.0
            )));
        }

        let wc = prewarp(cutoff_hz, sample_rate);
        let k = 2.0 * sample_rate;
        let sections = butterworth_poles(order)
            .into_iter()
            .map(|pole| {
                let p = pole * wc;
                if p.im.abs() < 1e-12 {
                    bilinear_1pole(p.re, k)
                } else {
                    bilinear_2pole(p, k)
                }
            })
            .collect();

        Ok(Self { sections, order })
    }

    /// Design a Butterworth low-pass filter from a normalized cutoff.
    ///
    /// `wn` is the -3 dB frequency as a fraction of the Nyquist frequency and
    /// must lie in `(0, 1)`.
    pub fn butterworth_lowpass_normalized(order: usize, wn: f64) -> Result<Self> {
        if !(wn > 0.0 && wn < 1.0) {
            return Err(SynthesisError::invalid(format!(
                "normalized cutoff must lie in (0, 1), got {}",
                wn
            )));
        }
        // Nyquist is 1 when the sample rate is 2
        Self::butterworth_lowpass(order, wn, 2.0)
    }

    /// Process one sample through the cascade.
    pub fn process(&mut self, input: f64) -> f64 {
        self.sections
            .iter_mut()
            .fold(input, |acc, section| section.process(acc))
    }

    /// Reset every section.
    pub fn reset(&mut self) {
        self.sections.iter_mut().for_each(Biquad::reset);
    }

    /// Filter a whole signal starting from a zero state.
    pub fn filter(&mut self, signal: &[f64]) -> Vec<f64> {
        self.reset();
        signal.iter().map(|&x| self.process(x)).collect()
    }

    /// Filter order.
    pub fn order(&self) -> usize {
        self.order
    }

    /// Number of biquad sections.
    pub fn num_sections(&self) -> usize {
        self.sections.len()
    }

    /// Biquad sections for analysis.
    pub fn sections(&self) -> &[Biquad] {
        &self.sections
    }

    /// All poles inside the unit circle.
    pub fn is_stable(&self) -> bool {
        self.sections.iter().all(Biquad::is_stable)
    }

    /// Complex frequency response H(e^jw) at `freq_hz`.
    pub fn frequency_response(&self, freq_hz: f64, sample_rate: f64) -> Complex64 {
        let omega = 2.0 * PI * freq_hz / sample_rate;
        let z_inv = Complex64::new(omega.cos(), -omega.sin());
        let z_inv2 = z_inv * z_inv;

        self.sections
            .iter()
            .fold(Complex64::new(1.0, 0.0), |response, section| {
                let num = section.b[0] + section.b[1] * z_inv + section.b[2] * z_inv2;
                let den = 1.0 + section.a[0] * z_inv + section.a[1] * z_inv2;
                response * num / den
            })
    }

    /// Magnitude response in dB at `freq_hz`.
    pub fn magnitude_response_db(&self, freq_hz: f64, sample_rate: f64) -> f64 {
        20.0 * self.frequency_response(freq_hz, sample_rate).norm().log10()
    }
}

/// Pre-warp frequency for the bilinear transform.
fn prewarp(freq_hz: f64, sample_rate: f64) -> f64 {
    2.0 * sample_rate * (PI * freq_hz / sample_rate).tan()
}

/// Analog prototype poles, one per section: upper-half-plane members of each
/// conjugate pair, then the real pole for odd orders.
fn butterworth_poles(order: usize) -> Vec<Complex64> {
    let mut poles: Vec<Complex64> = (0..order / 2)
        .map(|k| {
            let theta = PI * (2 * k + order + 1) as f64 / (2 * order) as f64;
            Complex64::new(theta.cos(), theta.sin())
        })
        .collect();
    if order % 2 == 1 {
        poles.push(Complex64::new(-1.0, 0.0));
    }
    poles
}

/// Bilinear transform of H(s) = -p / (s - p) for a real pole `p`.
fn bilinear_1pole(p: f64, k: f64) -> Biquad {
    let alpha = k - p;
    let b0 = -p / alpha;
    let a1 = -(k + p) / alpha;
    Biquad::new([b0, b0, 0.0], [a1, 0.0])
}

/// Bilinear transform of H(s) = |p|^2 / (s^2 - 2 Re(p) s + |p|^2).
fn bilinear_2pole(p: Complex64, k: f64) -> Biquad {
    let mag_sq = p.norm_sqr();
    let k2 = k * k;
    let d = k2 - 2.0 * k * p.re + mag_sq;

    let b0 = mag_sq / d;
    let a1 = 2.0 * (mag_sq - k2) / d;
    let a2 = (k2 + 2.0 * k * p.re + mag_sq) / d;

    Biquad::new([b0, 2.0 * b0, b0], [a1, a2])
}
