//! Lock-in extraction of the nth harmonic of a periodically modulated signal.

use std::f64::consts::PI;

use crate::error::{Result, SynthesisError};

use super::iir::IirFilter;

/// Order of the low-pass filter applied after mixing
pub const LOWPASS_ORDER: usize = 4;

/// Software lock-in amplifier for one harmonic.
///
/// The reference is `cos(2*pi*n*f_mod*t + phase)` sampled on `t = i / f_s`.
/// The mixed signal is passed through a 4th-order Butterworth low-pass whose
/// normalized cutoff is `f_cut / f_s` (relative to Nyquist).
#[derive(Debug, Clone)]
pub struct HarmonicDemodulator {
    sample_rate: f64,
    modulation_frequency: f64,
    harmonic: u32,
    phase_rad: f64,
    lowpass: IirFilter,
}

impl HarmonicDemodulator {
    /// Build a demodulator.
    ///
    /// Fails with `InvalidParameter` if `cutoff / sample_rate` is not in
    /// `(0, 1)` or the rates are not positive.
    pub fn new(
        sample_rate: f64,
        modulation_frequency: f64,
        harmonic: u32,
        cutoff: f64,
        phase_deg: f64,
    ) -> Result<Self> {
        if !(modulation_frequency.is_finite() && modulation_frequency > 0.0) {
            return Err(SynthesisError::invalid(format!(
                "modulation frequency must be positive, got {}",
                modulation_frequency
            )));
        }
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            return Err(SynthesisError::invalid(format!(
                "sample rate must be positive, got {}",
                sample_rate
            )));
        }
        let lowpass =
            IirFilter::butterworth_lowpass_normalized(LOWPASS_ORDER, cutoff / sample_rate)?;

        Ok(Self {
            sample_rate,
            modulation_frequency,
            harmonic,
            phase_rad: phase_deg.to_radians(),
            lowpass,
        })
    }

    /// Harmonic being extracted.
    pub fn harmonic(&self) -> u32 {
        self.harmonic
    }

    /// In-phase channel: `LowPass(signal * cos(2*pi*n*f_mod*t + phase))`.
    pub fn in_phase(&self, signal: &[f64]) -> Vec<f64> {
        self.mix_and_filter(signal, self.phase_rad, f64::cos)
    }

    /// Quadrature channel: `LowPass(signal * sin(2*pi*n*f_mod*t))`.
    pub fn quadrature(&self, signal: &[f64]) -> Vec<f64> {
        self.mix_and_filter(signal, 0.0, f64::sin)
    }

    fn mix_and_filter(&self, signal: &[f64], phase: f64, reference: fn(f64) -> f64) -> Vec<f64> {
        let omega = 2.0 * PI * self.harmonic as f64 * self.modulation_frequency;
        let mixed: Vec<f64> = signal
            .iter()
            .enumerate()
            .map(|(i, &s)| {
                let t = i as f64 / self.sample_rate;
                s * reference(omega * t + phase)
            })
            .collect();

        let mut lowpass = self.lowpass.clone();
        lowpass.filter(&mixed)
    }
}

/// In-phase lock-in output for harmonic `n` of a signal sampled at `sample_rate`.
pub fn filter_harmonic(
    signal: &[f64],
    sample_rate: f64,
    modulation_frequency: f64,
    n: u32,
    cutoff: f64,
    phase_deg: f64,
) -> Result<Vec<f64>> {
    let demod = HarmonicDemodulator::new(sample_rate, modulation_frequency, n, cutoff, phase_deg)?;
    Ok(demod.in_phase(signal))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    const FS: f64 = 100_000.0;
    const FMOD: f64 = 1_000.0;

    fn tone(harmonic: f64, phase: f64, len: usize) -> Vec<f64> {
        (0..len)
            .map(|i| (2.0 * PI * harmonic * FMOD * i as f64 / FS + phase).cos())
            .collect()
    }

    #[test]
    fn test_in_phase_recovers_half_amplitude() {
        let signal = tone(2.0, 0.0, 20_000);
        let out = filter_harmonic(&signal, FS, FMOD, 2, 200.0, 0.0).unwrap();
        assert_eq!(out.len(), signal.len());
        let settled = out[out.len() - 1];
        assert!((settled - 0.5).abs() < 1e-3, "got {}", settled);
    }

    #[test]
    fn test_other_harmonic_is_rejected() {
        let signal = tone(3.0, 0.0, 20_000);
        let out = filter_harmonic(&signal, FS, FMOD, 2, 200.0, 0.0).unwrap();
        assert!(out[out.len() - 1].abs() < 1e-3);
    }

    #[test]
    fn test_quadrature_of_cosine_vanishes() {
        let demod = HarmonicDemodulator::new(FS, FMOD, 2, 200.0, 0.0).unwrap();
        let signal = tone(2.0, 0.0, 20_000);
        let q = demod.quadrature(&signal);
        assert!(q[q.len() - 1].abs() < 1e-3);
    }

    #[test]
    fn test_phase_shift_moves_signal_to_quadrature() {
        // cos(x - pi/2) = sin(x)
        let signal = tone(1.0, -PI / 2.0, 20_000);
        let demod = HarmonicDemodulator::new(FS, FMOD, 1, 200.0, 0.0).unwrap();
        let i = demod.in_phase(&signal);
        let q = demod.quadrature(&signal);
        assert!(i[i.len() - 1].abs() < 1e-3);
        assert!((q[q.len() - 1] - 0.5).abs() < 1e-3);

        let shifted = HarmonicDemodulator::new(FS, FMOD, 1, 200.0, -90.0).unwrap();
        let i = shifted.in_phase(&signal);
        assert!((i[i.len() - 1] - 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_rejects_cutoff_at_or_above_sample_rate() {
        let err = HarmonicDemodulator::new(FS, FMOD, 2, FS, 0.0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameter);
        assert!(HarmonicDemodulator::new(FS, FMOD, 2, 0.0, 0.0).is_err());
        assert!(HarmonicDemodulator::new(FS, 0.0, 2, 200.0, 0.0).is_err());
    }
}
