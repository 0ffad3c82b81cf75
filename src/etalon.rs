//! Fabry-Perot etalon interference.
//!
//! An optical part of thickness `l`, refractive index `n` and surface
//! reflectance `R` traversed at incidence angle `theta` acts as a parasitic
//! cavity. Its transmission follows the Airy function
//!
//! ```text
//! T(nu) = 1 / (1 + F * sin^2(delta(nu) / 2))
//! F     = 4R / (1 - R)^2
//! delta = 4 * pi * n * l * cos(theta) * nu
//! ```
//!
//! with `nu` in cm^-1 and `l` in cm. `theta` is given in degrees.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SynthesisError};

/// Physical description of one etalon-forming part
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EtalonParams {
    /// Refractive index of the part
    #[serde(alias = "n")]
    pub refractive_index: f64,
    /// Angle of incidence in degrees
    #[serde(alias = "theta", default)]
    pub incidence_angle_deg: f64,
    /// Thickness in cm
    #[serde(alias = "l")]
    pub thickness_cm: f64,
    /// Surface reflectance in `[0, 1)`
    #[serde(alias = "R")]
    pub reflectance: f64,
}

impl EtalonParams {
    /// Derive the interference coefficients of this part.
    pub fn coeffs(&self) -> Result<EtalonCoeffs> {
        if !(0.0..1.0).contains(&self.reflectance) {
            return Err(SynthesisError::invalid(format!(
                "etalon reflectance must lie in [0, 1), got {}",
                self.reflectance
            )));
        }
        if !(self.refractive_index.is_finite() && self.refractive_index > 0.0) {
            return Err(SynthesisError::invalid(format!(
                "etalon refractive index must be positive, got {}",
                self.refractive_index
            )));
        }
        if !(self.thickness_cm.is_finite() && self.thickness_cm > 0.0) {
            return Err(SynthesisError::invalid(format!(
                "etalon thickness must be positive, got {}",
                self.thickness_cm
            )));
        }
        if !self.incidence_angle_deg.is_finite() {
            return Err(SynthesisError::invalid("etalon incidence angle must be finite"));
        }

        let r = self.reflectance;
        Ok(EtalonCoeffs {
            finesse_coefficient: 4.0 * r / (1.0 - r).powi(2),
            phase_delta_coefficient: 4.0
                * PI
                * self.refractive_index
                * self.thickness_cm
                * self.incidence_angle_deg.to_radians().cos(),
        })
    }
}

/// Coefficients of the Airy transmission function
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EtalonCoeffs {
    /// Coefficient of finesse `F`
    pub finesse_coefficient: f64,
    /// Phase difference per wavenumber, `delta = coeff * nu`
    pub phase_delta_coefficient: f64,
}

impl EtalonCoeffs {
    /// Transmission of the etalon at wavenumber `nu` (cm^-1), in `(0, 1]`.
    pub fn transmission(&self, nu: f64) -> f64 {
        let half_phase = 0.5 * self.phase_delta_coefficient * nu;
        1.0 / (1.0 + self.finesse_coefficient * half_phase.sin().powi(2))
    }
}

/// Convert a batch of etalon descriptions, preserving order.
pub fn generate_etalon_coeffs(params: &[EtalonParams]) -> Result<Vec<EtalonCoeffs>> {
    params.iter().map(EtalonParams::coeffs).collect()
}

/// Combined transmission of several etalons at `nu`.
pub fn combined_transmission(etalons: &[EtalonCoeffs], nu: f64) -> f64 {
    etalons.iter().map(|e| e.transmission(nu)).product()
}
