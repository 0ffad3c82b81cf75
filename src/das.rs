//! Direct absorption spectroscopy.
//!
//! [`DasEngine`] turns a batch of [`GasParameters`] into one [`Spectrum`] per
//! gas using Beer-Lambert:
//!
//! ```text
//! Coefficient:  k(nu)                     (cm^2/molec)
//! Absorbance:   A(nu) = k(nu) * N * L
//! Transmission: T(nu) = exp(-A(nu))
//! ```
//!
//! where `N` is the number density of the gas and `L` the path length. The
//! line shape `k(nu)` comes from the injected [`LineShapeAdapter`].

use log::{debug, info};

use crate::error::{Result, SynthesisError};
use crate::etalon::{combined_transmission, EtalonCoeffs};
use crate::lineshape::{CoefficientRequest, Environment, LineProfile, LineShapeAdapter};
use crate::spectrum::{ConcentrationKind, GasParameters, SpectralGrid, Spectrum, SpectrumKind};
use crate::units;

/// Default intensity threshold below which lines are ignored (cm/molec)
pub const DEFAULT_INTENSITY_CUTOFF: f64 = 1e-30;

/// Tolerance on the tabulated line coverage, in cm^-1
pub const RANGE_TOLERANCE: f64 = 1.0;

/// Tuning knobs of a DAS computation
#[derive(Debug, Clone, PartialEq)]
pub struct DasOptions {
    /// Minimum line intensity passed to the adapter
    pub intensity_cutoff: f64,
    /// Parasitic etalons applied to Absorbance and Transmission
    pub etalons: Vec<EtalonCoeffs>,
}

impl Default for DasOptions {
    fn default() -> Self {
        Self {
            intensity_cutoff: DEFAULT_INTENSITY_CUTOFF,
            etalons: Vec::new(),
        }
    }
}

/// Builds DAS spectra from an injected line-shape adapter
#[derive(Debug, Clone)]
pub struct DasEngine<A> {
    adapter: A,
    options: DasOptions,
}

impl<A: LineShapeAdapter> DasEngine<A> {
    /// Create an engine with default options.
    pub fn new(adapter: A) -> Self {
        Self::with_options(adapter, DasOptions::default())
    }

    /// Create an engine with explicit options.
    pub fn with_options(adapter: A, options: DasOptions) -> Self {
        Self { adapter, options }
    }

    /// Set the intensity cutoff.
    pub fn with_intensity_cutoff(mut self, intensity_cutoff: f64) -> Self {
        self.options.intensity_cutoff = intensity_cutoff;
        self
    }

    /// Set the etalons applied to every spectrum.
    pub fn with_etalons(mut self, etalons: Vec<EtalonCoeffs>) -> Self {
        self.options.etalons = etalons;
        self
    }

    /// The line-shape adapter.
    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    /// Current options.
    pub fn options(&self) -> &DasOptions {
        &self.options
    }

    /// Check every gas against the adapter before any evaluation.
    ///
    /// The first failing gas in input order determines the error.
    pub fn validate(&self, gases: &[GasParameters], grid: &SpectralGrid) -> Result<()> {
        if !(self.options.intensity_cutoff.is_finite() && self.options.intensity_cutoff >= 0.0) {
            return Err(SynthesisError::invalid(format!(
                "intensity cutoff must be non-negative, got {}",
                self.options.intensity_cutoff
            )));
        }
        for gas in gases {
            if !self.adapter.has_line_table(gas.gas_id()) {
                return Err(SynthesisError::UnknownGas(gas.gas_id().to_string()));
            }
            let extent = self.adapter.wavenumber_extent(gas.gas_id())?;
            check_coverage(gas.gas_id(), grid, extent)?;
        }
        Ok(())
    }

    /// Compute one spectrum per gas, in input order.
    ///
    /// All gases are validated first; a single bad gas fails the whole batch.
    pub fn compute_das(
        &self,
        gases: &[GasParameters],
        grid: &SpectralGrid,
        profile: LineProfile,
        kind: SpectrumKind,
    ) -> Result<Vec<Spectrum>> {
        self.validate(gases, grid)?;
        info!(
            "Computing DAS {} for {} gas(es) on {} points ({} profile)",
            kind,
            gases.len(),
            grid.len(),
            profile
        );

        gases
            .iter()
            .map(|gas| self.compute_one(gas, grid, profile, kind))
            .collect()
    }

    fn compute_one(
        &self,
        gas: &GasParameters,
        grid: &SpectralGrid,
        profile: LineProfile,
        kind: SpectrumKind,
    ) -> Result<Spectrum> {
        let pressure_atm = units::hpa_to_atm(gas.pressure_hpa());
        let density = number_density(gas);
        debug!("{}: number density {:e} molec/cm^3", gas, density);

        let request = CoefficientRequest {
            gas_id: gas.gas_id(),
            grid,
            environment: Environment::new(gas.temperature_k(), pressure_atm),
            profile,
            intensity_cutoff: self.options.intensity_cutoff,
        };
        let raw = self.adapter.compute_coefficient(&request)?;
        if raw.coefficients.len() != raw.grid.len() {
            return Err(SynthesisError::invalid(format!(
                "adapter returned {} coefficients for {} wavenumbers ({})",
                raw.coefficients.len(),
                raw.grid.len(),
                gas.gas_id()
            )));
        }
        if raw.grid != *grid {
            debug!(
                "{}: adapter returned its own grid ({} points)",
                gas.gas_id(),
                raw.grid.len()
            );
        }

        let scale = density * gas.path_length_cm();
        let etalons = &self.options.etalons;
        let values = match kind {
            SpectrumKind::Coefficient => raw.coefficients,
            SpectrumKind::Absorbance => raw
                .coefficients
                .iter()
                .zip(raw.grid.iter())
                .map(|(&k, &nu)| k * scale - combined_transmission(etalons, nu).ln())
                .collect(),
            SpectrumKind::Transmission => raw
                .coefficients
                .iter()
                .zip(raw.grid.iter())
                .map(|(&k, &nu)| (-(k * scale)).exp() * combined_transmission(etalons, nu))
                .collect(),
        };

        Ok(Spectrum {
            gas: gas.clone(),
            grid: raw.grid,
            values,
            kind,
        })
    }
}

/// Number density of the gas in molec/cm^3.
pub fn number_density(gas: &GasParameters) -> f64 {
    match gas.concentration_kind() {
        ConcentrationKind::VolumeMixingRatio => units::mixing_ratio_to_number_density(
            gas.concentration(),
            units::hpa_to_atm(gas.pressure_hpa()),
            gas.temperature_k(),
        ),
        ConcentrationKind::MolarDensity => {
            units::molar_density_to_number_density(gas.concentration())
        }
    }
}

/// Fail with `Range` unless the tabulated extent covers `grid` within
/// [`RANGE_TOLERANCE`] on both ends.
pub fn check_coverage(gas_id: &str, grid: &SpectralGrid, extent: (f64, f64)) -> Result<()> {
    let (table_min, table_max) = extent;
    let (grid_min, grid_max) = (grid.min(), grid.max());
    let outside = grid_min < table_min - RANGE_TOLERANCE
        || grid_min > table_max + RANGE_TOLERANCE
        || grid_max > table_max + RANGE_TOLERANCE
        || grid_max < table_min - RANGE_TOLERANCE;
    if outside {
        return Err(SynthesisError::Range {
            gas: gas_id.to_string(),
            grid_min,
            grid_max,
            table_min,
            table_max,
        });
    }
    Ok(())
}
