//! Concentration and pressure unit conversions.
//!
//! Pressures inside the engines are carried in atm; user-facing inputs are
//! in hPa and are converted with [`hpa_to_atm`].

/// Boltzmann constant, m^2 kg s^-2 K^-1
pub const BOLTZMANN: f64 = 1.38064852e-23;

/// Avogadro's number, molec/mol
pub const AVOGADRO: f64 = 6.022e23;

/// Universal gas constant, J mol^-1 K^-1
pub const GAS_CONSTANT: f64 = 8.314;

/// Pascal per atm, as used throughout the conversions
pub const PA_PER_ATM: f64 = 1.013e5;

/// hPa per atm
pub const HPA_PER_ATM: f64 = 1.013e3;

/// Convert pressure from hPa to atm.
pub fn hpa_to_atm(pressure_hpa: f64) -> f64 {
    pressure_hpa / HPA_PER_ATM
}

/// Convert a volume mixing ratio to number density (molec/cm^3).
///
/// # Arguments
/// * `mixing_ratio` - Volume mixing ratio (dimensionless)
/// * `pressure_atm` - Pressure in atm
/// * `temperature_k` - Temperature in K
pub fn mixing_ratio_to_number_density(
    mixing_ratio: f64,
    pressure_atm: f64,
    temperature_k: f64,
) -> f64 {
    pressure_atm * PA_PER_ATM / BOLTZMANN / temperature_k * 1e-6 * mixing_ratio
}

/// Convert a volume mixing ratio to molar density (mol/m^3).
pub fn mixing_ratio_to_molar_density(
    mixing_ratio: f64,
    pressure_atm: f64,
    temperature_k: f64,
) -> f64 {
    pressure_atm * PA_PER_ATM / GAS_CONSTANT / temperature_k * mixing_ratio
}

/// Convert molar density (mol/m^3) to number density (molec/cm^3).
pub fn molar_density_to_number_density(molar_density: f64) -> f64 {
    AVOGADRO * molar_density * 1e-6
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_number_density_at_standard_conditions() {
        // Loschmidt-like number at 1 atm, 273.15 K
        let n = mixing_ratio_to_number_density(1.0, 1.0, 273.15);
        assert_relative_eq!(n, 2.686e19, max_relative = 1e-3);
    }

    #[test]
    fn test_molar_density_matches_number_density() {
        let (c, p, t) = (300e-9, 990.0 / 1013.0, 293.15);
        let via_molar = molar_density_to_number_density(mixing_ratio_to_molar_density(c, p, t));
        let direct = mixing_ratio_to_number_density(c, p, t);
        // k_B * N_A differs from R by rounding of the constants only
        assert_relative_eq!(via_molar, direct, max_relative = 1e-3);
    }

    #[test]
    fn test_hpa_to_atm() {
        assert_relative_eq!(hpa_to_atm(1013.0), 1.0);
        assert_relative_eq!(hpa_to_atm(506.5), 0.5);
    }

    #[test]
    fn test_conversion_is_linear_in_concentration() {
        let a = mixing_ratio_to_number_density(1e-6, 1.0, 296.0);
        let b = mixing_ratio_to_number_density(2e-6, 1.0, 296.0);
        assert_relative_eq!(b, 2.0 * a);
    }
}
