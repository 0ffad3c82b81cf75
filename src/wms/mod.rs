//! # Wavelength modulation spectroscopy
//!
//! Two models of the nth-harmonic lock-in signal:
//!
//! - [`WmsMethod::Theoretical`]: Fourier integral of the transmission under
//!   ideal cosine modulation of fixed depth ([`compute_wms_theoretical`]).
//! - [`WmsMethod::Simulation`]: time-domain simulation of the laser ramp,
//!   modulation, optical power and a 4th-order Butterworth lock-in
//!   ([`compute_wms_simulated`]), driven by a [`LaserSpec`].
//!
//! Both call [`DasEngine`] for the underlying transmission spectrum.
//!
//! ## Example
//!
//! ```rust,no_run
//! use qclas::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut adapter = TabulatedAdapter::new();
//! adapter.load_csv("NH3", "nh3_voigt.csv")?;
//!
//! let engine = WmsEngine::new(DasEngine::new(adapter));
//! let gas = GasParameters::builder("NH3").mixing_ratio(300e-9).build()?;
//! let grid = SpectralGrid::linspace(1103.0, 1105.0, 1000)?;
//!
//! let settings = WmsSettings::theoretical(2, 0.05);
//! let results = engine.compute_wms(&[gas], &grid, LineProfile::Voigt, &settings)?;
//! println!("2f peak: {:?}", results[0].peak());
//! # Ok(())
//! # }
//! ```

mod laser;
mod simulation;
mod theoretical;


use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::das::DasEngine;
use crate::error::{Result, SynthesisError};
use crate::lineshape::{LineProfile, LineShapeAdapter};
use crate::spectrum::{GasParameters, SpectralGrid, WmsResult};

pub use laser::{parse_key_values, read_laser_config, LaserConfigError, LaserSpec, LASER_KEYS};
pub use simulation::{compute_wms_simulated, LaserWaveforms};
pub use theoretical::{
    auxiliary_grid, compute_wms_theoretical, harmonic_coefficient, AUXILIARY_POINTS_PER_DEPTH,
    MAX_AUXILIARY_POINTS, PHASE_SAMPLES,
};

/// WMS model selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WmsMethod {
    /// Closed-form harmonic model
    #[default]
    Theoretical,
    /// Time-domain hardware simulation
    #[serde(alias = "simulation with parameters")]
    Simulation,
}

impl WmsMethod {
    /// Returns all accepted method names.
    pub fn variants() -> &'static [&'static str] {
        &["theoretical", "simulation"]
    }
}

impl fmt::Display for WmsMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WmsMethod::Theoretical => write!(f, "Theoretical"),
            WmsMethod::Simulation => write!(f, "Simulation with parameters"),
        }
    }
}

impl FromStr for WmsMethod {
    type Err = SynthesisError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "theoretical" | "theory" => Ok(WmsMethod::Theoretical),
            "simulation" | "simulation with parameters" | "sim" => Ok(WmsMethod::Simulation),
            _ => Err(SynthesisError::invalid(format!(
                "unknown WMS method '{}'. Valid options: {}",
                s,
                WmsMethod::variants().join(", ")
            ))),
        }
    }
}

/// Parameters of one WMS computation
#[derive(Debug, Clone, PartialEq)]
pub struct WmsSettings {
    /// Model to run
    pub method: WmsMethod,
    /// Harmonic order n (>= 1)
    pub harmonic: u32,
    /// Modulation depth in cm^-1, required by the theoretical model
    pub modulation_depth: Option<f64>,
    /// Laser driver, required by the simulation
    pub laser: Option<LaserSpec>,
}

impl WmsSettings {
    /// Theoretical model at the given harmonic and depth.
    pub fn theoretical(harmonic: u32, modulation_depth: f64) -> Self {
        Self {
            method: WmsMethod::Theoretical,
            harmonic,
            modulation_depth: Some(modulation_depth),
            laser: None,
        }
    }

    /// Simulation at the given harmonic with a laser description.
    pub fn simulation(harmonic: u32, laser: LaserSpec) -> Self {
        Self {
            method: WmsMethod::Simulation,
            harmonic,
            modulation_depth: None,
            laser: Some(laser),
        }
    }
}

/// WMS engine on top of a [`DasEngine`]
#[derive(Debug, Clone)]
pub struct WmsEngine<A> {
    das: DasEngine<A>,
}

impl<A: LineShapeAdapter> WmsEngine<A> {
    /// Wrap a DAS engine.
    pub fn new(das: DasEngine<A>) -> Self {
        Self { das }
    }

    /// Underlying DAS engine.
    pub fn das(&self) -> &DasEngine<A> {
        &self.das
    }

    /// Theoretical harmonic signal on `grid`.
    pub fn compute_theoretical(
        &self,
        gases: &[GasParameters],
        grid: &SpectralGrid,
        profile: LineProfile,
        harmonic: u32,
        modulation_depth: f64,
    ) -> Result<Vec<WmsResult>> {
        compute_wms_theoretical(&self.das, gases, grid, profile, harmonic, modulation_depth)
    }

    /// Simulated harmonic signal on the ramp wavenumber axis.
    pub fn compute_simulated(
        &self,
        gases: &[GasParameters],
        grid: &SpectralGrid,
        profile: LineProfile,
        harmonic: u32,
        laser: &LaserSpec,
    ) -> Result<Vec<WmsResult>> {
        compute_wms_simulated(&self.das, gases, grid, profile, harmonic, laser)
    }

    /// Run the model selected by `settings`.
    ///
    /// Fails with `MissingLaserSpec` when the simulation has no laser and
    /// with `InvalidParameter` when the theoretical model has no depth.
    pub fn compute_wms(
        &self,
        gases: &[GasParameters],
        grid: &SpectralGrid,
        profile: LineProfile,
        settings: &WmsSettings,
    ) -> Result<Vec<WmsResult>> {
        match settings.method {
            WmsMethod::Theoretical => {
                let depth = settings.modulation_depth.ok_or_else(|| {
                    SynthesisError::invalid("theoretical WMS requires a modulation depth")
                })?;
                self.compute_theoretical(gases, grid, profile, settings.harmonic, depth)
            }
            WmsMethod::Simulation => {
                let laser = settings.laser.as_ref().ok_or(SynthesisError::MissingLaserSpec)?;
                self.compute_simulated(gases, grid, profile, settings.harmonic, laser)
            }
        }
    }
}
