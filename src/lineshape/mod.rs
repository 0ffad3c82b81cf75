//! # Line-shape adapter boundary
//!
//! The engines never evaluate line shapes themselves. They talk to a
//! [`LineShapeAdapter`], an injected collaborator that owns the line database
//! and returns absorption-coefficient arrays for a gas, a wavenumber grid and
//! a thermodynamic [`Environment`].
//!
//! [`TabulatedAdapter`] is the adapter shipped with the crate: it serves
//! coefficient arrays that an external line-by-line evaluator has already
//! produced (one CSV per gas).

mod error;
mod tabulated;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SynthesisError;
use crate::spectrum::SpectralGrid;

pub use error::LineShapeError;
pub use tabulated::{LineTable, TabulatedAdapter};

/// Line broadening profile evaluated by the adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LineProfile {
    /// Voigt profile
    #[serde(alias = "voigt")]
    Voigt,
    /// Hartmann-Tran profile
    #[serde(rename = "HT", alias = "ht")]
    HartmannTran,
    /// Pressure (Lorentz) broadening only
    #[serde(alias = "lorentz")]
    Lorentz,
    /// Doppler (Gaussian) broadening only
    #[serde(alias = "doppler")]
    Doppler,
}

impl LineProfile {
    /// All profiles, in canonical order.
    pub const ALL: [LineProfile; 4] = [
        LineProfile::Voigt,
        LineProfile::HartmannTran,
        LineProfile::Lorentz,
        LineProfile::Doppler,
    ];

    /// Returns all accepted profile names.
    pub fn variants() -> &'static [&'static str] {
        &["Voigt", "HT", "Lorentz", "Doppler"]
    }
}

impl fmt::Display for LineProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineProfile::Voigt => write!(f, "Voigt"),
            LineProfile::HartmannTran => write!(f, "HT"),
            LineProfile::Lorentz => write!(f, "Lorentz"),
            LineProfile::Doppler => write!(f, "Doppler"),
        }
    }
}

impl FromStr for LineProfile {
    type Err = SynthesisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "voigt" => Ok(LineProfile::Voigt),
            "ht" | "hartmann-tran" | "hartmanntran" => Ok(LineProfile::HartmannTran),
            "lorentz" | "lorentzian" => Ok(LineProfile::Lorentz),
            "doppler" | "gaussian" => Ok(LineProfile::Doppler),
            _ => Err(SynthesisError::UnsupportedProfile(format!(
                "'{}'. Valid options: {}",
                s,
                LineProfile::variants().join(", ")
            ))),
        }
    }
}

/// Thermodynamic state passed to the adapter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    /// Temperature in K
    pub temperature_k: f64,
    /// Pressure in atm
    pub pressure_atm: f64,
}

impl Environment {
    /// Create an environment from temperature (K) and pressure (atm).
    pub fn new(temperature_k: f64, pressure_atm: f64) -> Self {
        Self {
            temperature_k,
            pressure_atm,
        }
    }

    /// True if both quantities agree within `rel_tol` relative difference.
    pub fn approx_eq(&self, other: &Environment, rel_tol: f64) -> bool {
        let close = |a: f64, b: f64| (a - b).abs() <= rel_tol * a.abs().max(b.abs());
        close(self.temperature_k, other.temperature_k)
            && close(self.pressure_atm, other.pressure_atm)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T={} K, p={} atm", self.temperature_k, self.pressure_atm)
    }
}

/// Everything the adapter needs to evaluate one gas
#[derive(Debug, Clone, Copy)]
pub struct CoefficientRequest<'a> {
    /// Gas identifier
    pub gas_id: &'a str,
    /// Requested wavenumber grid
    pub grid: &'a SpectralGrid,
    /// Temperature and pressure
    pub environment: Environment,
    /// Broadening profile
    pub profile: LineProfile,
    /// Lines weaker than this intensity are ignored
    pub intensity_cutoff: f64,
}

/// Coefficients returned by the adapter.
///
/// `grid` may differ slightly from the requested grid; it supersedes it.
#[derive(Debug, Clone, PartialEq)]
pub struct CoefficientArray {
    /// Grid the coefficients are aligned to
    pub grid: SpectralGrid,
    /// Absorption coefficient per grid point (cm^2/molec)
    pub coefficients: Vec<f64>,
}

/// Synchronous contract of the external line-by-line evaluator.
///
/// Implementations own any caching of line tables. The adapter is expected to
/// restrict itself to lines inside `[grid.min(), grid.max()]` whose intensity
/// is at least `intensity_cutoff`.
pub trait LineShapeAdapter {
    /// True if the adapter holds line data for `gas_id`.
    fn has_line_table(&self, gas_id: &str) -> bool;

    /// Lowest and highest tabulated line position of `gas_id` in cm^-1.
    fn wavenumber_extent(&self, gas_id: &str) -> Result<(f64, f64), LineShapeError>;

    /// Evaluate absorption coefficients for one gas.
    fn compute_coefficient(
        &self,
        request: &CoefficientRequest<'_>,
    ) -> Result<CoefficientArray, LineShapeError>;
}

impl<T: LineShapeAdapter + ?Sized> LineShapeAdapter for &T {
    fn has_line_table(&self, gas_id: &str) -> bool {
        (**self).has_line_table(gas_id)
    }

    fn wavenumber_extent(&self, gas_id: &str) -> Result<(f64, f64), LineShapeError> {
        (**self).wavenumber_extent(gas_id)
    }

    fn compute_coefficient(
        &self,
        request: &CoefficientRequest<'_>,
    ) -> Result<CoefficientArray, LineShapeError> {
        (**self).compute_coefficient(request)
    }
}

impl<T: LineShapeAdapter + ?Sized> LineShapeAdapter for Box<T> {
    fn has_line_table(&self, gas_id: &str) -> bool {
        (**self).has_line_table(gas_id)
    }

    fn wavenumber_extent(&self, gas_id: &str) -> Result<(f64, f64), LineShapeError> {
        (**self).wavenumber_extent(gas_id)
    }

    fn compute_coefficient(
        &self,
        request: &CoefficientRequest<'_>,
    ) -> Result<CoefficientArray, LineShapeError> {
        (**self).compute_coefficient(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_profile_from_str() {
        assert_eq!(LineProfile::from_str("Voigt").unwrap(), LineProfile::Voigt);
        assert_eq!(LineProfile::from_str("HT").unwrap(), LineProfile::HartmannTran);
        assert_eq!(LineProfile::from_str("lorentz").unwrap(), LineProfile::Lorentz);
        assert_eq!(LineProfile::from_str("DOPPLER").unwrap(), LineProfile::Doppler);
    }

    #[test]
    fn test_unknown_profile_is_unsupported() {
        let err = LineProfile::from_str("Galatry").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedProfile);
        assert!(err.to_string().contains("Galatry"));
    }

    #[test]
    fn test_profile_display_roundtrips() {
        for profile in LineProfile::ALL {
            assert_eq!(LineProfile::from_str(&profile.to_string()).unwrap(), profile);
        }
    }

    #[test]
    fn test_environment_tolerance() {
        let a = Environment::new(296.0, 1.0);
        let b = Environment::new(296.0 * (1.0 + 1e-9), 1.0);
        let c = Environment::new(300.0, 1.0);
        assert!(a.approx_eq(&b, 1e-6));
        assert!(!a.approx_eq(&c, 1e-6));
    }
}
