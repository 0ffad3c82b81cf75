//! Time-domain WMS simulation of the laser driver and lock-in chain.
//!
//! One ramp period is sampled at `fS`. The driving current is a linear ramp
//! plus a sinusoidal modulation; it is mapped to instantaneous wavenumber
//! and optical power, the transmitted signal is built from a DAS
//! transmission spectrum, and the result is demodulated at harmonic `n`.

use std::f64::consts::PI;

use log::{debug, info, warn};

use super::laser::LaserSpec;
use super::theoretical::validate_harmonic;
use crate::das::DasEngine;
use crate::dsp::{count_out_of_range, interp, HarmonicDemodulator};
use crate::error::Result;
use crate::lineshape::{LineProfile, LineShapeAdapter};
use crate::spectrum::{linspace, GasParameters, SpectralGrid, SpectrumKind, WmsResult};

/// Sampled driver waveforms over one ramp period
#[derive(Debug, Clone, PartialEq)]
pub struct LaserWaveforms {
    /// Sample times in s
    pub time: Vec<f64>,
    /// Ramp current (mA / 1000)
    pub ramp_current: Vec<f64>,
    /// Modulation current (mA / 1000)
    pub modulation_current: Vec<f64>,
    /// Wavenumber from the ramp alone, cm^-1
    pub ramp_wavenumber: Vec<f64>,
    /// Instantaneous wavenumber including modulation, cm^-1
    pub total_wavenumber: Vec<f64>,
    /// Optical power, clipped at zero
    pub intensity: Vec<f64>,
}

impl LaserWaveforms {
    /// Sample the driver over one ramp period.
    pub fn synthesize(spec: &LaserSpec) -> Result<Self> {
        spec.validate()?;
        let n = spec.samples_per_ramp();
        let fs = spec.sampling_frequency_hz;

        let time: Vec<f64> = (0..n).map(|i| i as f64 / fs).collect();
        let ramp_current: Vec<f64> = linspace(0.0, spec.ramp_amplitude_ma, n)
            .into_iter()
            .map(|c| (c - 0.5 * spec.ramp_amplitude_ma) / 1000.0)
            .collect();
        let modulation_current: Vec<f64> = time
            .iter()
            .map(|&t| {
                let phase = 2.0 * PI * spec.modulation_frequency_hz * t;
                0.5 * spec.modulation_amplitude_ma * phase.sin() / 1000.0
            })
            .collect();

        let ramp_wavenumber: Vec<f64> = ramp_current
            .iter()
            .map(|&c| c * spec.ramp_tuning_rate * 200.0 + spec.central_wavenumber)
            .collect();
        let total_wavenumber: Vec<f64> = ramp_wavenumber
            .iter()
            .zip(&modulation_current)
            .map(|(&nu, &c)| nu + c * spec.modulation_tuning_rate * 200.0)
            .collect();

        let mut clipped = 0usize;
        let intensity: Vec<f64> = ramp_current
            .iter()
            .zip(&modulation_current)
            .map(|(&r, &m)| {
                let p = (r + m) * spec.current_to_power + spec.laser_dc_power_mw;
                if p < 0.0 {
                    clipped += 1;
                    0.0
                } else {
                    p
                }
            })
            .collect();
        if clipped > 0 {
            warn!("Laser intensity clipped to zero at {} of {} samples", clipped, n);
        }

        Ok(Self {
            time,
            ramp_current,
            modulation_current,
            ramp_wavenumber,
            total_wavenumber,
            intensity,
        })
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// True if no samples were generated.
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Transmitted optical signal for a transmission spectrum `T(xp) = fp`.
    ///
    /// The wavenumber waveform is traversed in reverse relative to the time
    /// axis.
    pub fn transmitted_signal(&self, xp: &[f64], fp: &[f64]) -> Vec<f64> {
        self.intensity
            .iter()
            .zip(self.total_wavenumber.iter().rev())
            .map(|(&power, &nu)| power * interp(nu, xp, fp))
            .collect()
    }
}

/// Simulated WMS signal for every gas.
///
/// `grid` is the domain of the absorption model; the results are reported on
/// the ramp wavenumber axis.
pub fn compute_wms_simulated<A: LineShapeAdapter>(
    das: &DasEngine<A>,
    gases: &[GasParameters],
    grid: &SpectralGrid,
    profile: LineProfile,
    harmonic: u32,
    laser: &LaserSpec,
) -> Result<Vec<WmsResult>> {
    validate_harmonic(harmonic)?;
    let waveforms = LaserWaveforms::synthesize(laser)?;
    let demod = HarmonicDemodulator::new(
        laser.sampling_frequency_hz,
        laser.modulation_frequency_hz,
        harmonic,
        laser.lowpass_cutoff_hz,
        laser.phase_deg,
    )?;
    let ramp_grid = SpectralGrid::new(waveforms.ramp_wavenumber.clone())?;

    info!(
        "Simulated WMS {}f: {} gas(es), {} samples per ramp, depth {} cm^-1",
        harmonic,
        gases.len(),
        waveforms.len(),
        laser.modulation_depth()
    );

    let transmissions = das.compute_das(gases, grid, profile, SpectrumKind::Transmission)?;

    Ok(transmissions
        .into_iter()
        .map(|spectrum| {
            let xp = spectrum.grid.as_slice();
            let outside = count_out_of_range(&waveforms.total_wavenumber, xp);
            if outside > 0 {
                warn!(
                    "{}: {} laser samples fall outside the {}-{} cm^-1 absorption grid",
                    spectrum.gas.gas_id(),
                    outside,
                    spectrum.grid.min(),
                    spectrum.grid.max()
                );
            }

            let signal = waveforms.transmitted_signal(xp, &spectrum.values);
            debug!("{}: demodulating {} samples", spectrum.gas.gas_id(), signal.len());

            WmsResult {
                gas: spectrum.gas,
                grid: ramp_grid.clone(),
                values: demod.in_phase(&signal),
                harmonic,
                modulation_depth: laser.modulation_depth(),
                quadrature: Some(demod.quadrature(&signal)),
            }
        })
        .collect())
}
