//! Integration tests for direct absorption spectra
//!
//! These tests drive the DAS engine end to end through the tabulated
//! line-shape adapter, a custom adapter and the CSV export.

use approx::assert_relative_eq;
use qclas::das::{number_density, DasEngine};
use qclas::error::ErrorKind;
use qclas::lineshape::{
    CoefficientArray, CoefficientRequest, Environment, LineProfile, LineShapeAdapter,
    LineShapeError, LineTable, TabulatedAdapter,
};
use qclas::prelude::*;
use std::fs;
use tempfile::tempdir;

/// Two Lorentzian lines near 1103.4 and 1104.3 cm^-1 with NH3-like strengths
fn nh3_table() -> LineTable {
    let nu: Vec<f64> = (0..=4000).map(|i| 1102.0 + i as f64 * 0.001).collect();
    let line = |x: f64, center: f64, strength: f64, gamma: f64| {
        strength * gamma / std::f64::consts::PI / ((x - center).powi(2) + gamma * gamma)
    };
    let voigt: Vec<f64> = nu
        .iter()
        .map(|&x| line(x, 1103.44, 5e-20, 0.08) + line(x, 1104.3, 1.2e-19, 0.08))
        .collect();
    let doppler: Vec<f64> = nu
        .iter()
        .map(|&x| 1e-19 * (-((x - 1104.3) / 0.003).powi(2)).exp())
        .collect();
    LineTable::new(nu)
        .unwrap()
        .with_profile(LineProfile::Voigt, voigt)
        .unwrap()
        .with_profile(LineProfile::Doppler, doppler)
        .unwrap()
}

fn nh3() -> GasParameters {
    GasParameters::builder("NH3")
        .pressure_hpa(990.0)
        .temperature_k(293.15)
        .path_length_cm(2.0)
        .mixing_ratio(300e-9)
        .build()
        .unwrap()
}

fn engine() -> DasEngine<TabulatedAdapter> {
    DasEngine::new(TabulatedAdapter::new().with_table("NH3", nh3_table()))
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_nh3_absorbance_scenario() {
    let grid = SpectralGrid::linspace(1103.0, 1105.0, 1000).unwrap();
    let spectra = engine()
        .compute_das(&[nh3()], &grid, LineProfile::Voigt, SpectrumKind::Absorbance)
        .unwrap();

    assert_eq!(spectra.len(), 1);
    let values = &spectra[0].values;
    assert_eq!(values.len(), 1000);
    assert!(values.iter().all(|&a| a > 0.0 && a < 10.0));

    let local_maxima = values
        .windows(3)
        .filter(|w| w[1] > w[0] && w[1] > w[2])
        .count();
    assert!(local_maxima >= 1);
}

#[test]
fn test_batch_preserves_input_order() {
    let adapter = TabulatedAdapter::new()
        .with_table("NH3", nh3_table())
        .with_table("14NH3", nh3_table());
    let engine = DasEngine::new(adapter);
    let grid = SpectralGrid::linspace(1103.0, 1105.0, 50).unwrap();
    let other = GasParameters::builder("14NH3").mixing_ratio(1e-6).build().unwrap();

    let spectra = engine
        .compute_das(&[other, nh3()], &grid, LineProfile::Voigt, SpectrumKind::Transmission)
        .unwrap();
    assert_eq!(spectra[0].gas.gas_id(), "14NH3");
    assert_eq!(spectra[1].gas.gas_id(), "NH3");

    let total = total_das(&spectra).unwrap();
    for (i, t) in total.iter().enumerate() {
        assert_relative_eq!(*t, spectra[0].values[i] * spectra[1].values[i]);
    }
}

#[test]
fn test_molar_density_input() {
    let grid = SpectralGrid::linspace(1103.0, 1105.0, 20).unwrap();
    let gas = GasParameters::builder("NH3").molar_density(1e-5).build().unwrap();
    let spectra = engine()
        .compute_das(&[gas.clone()], &grid, LineProfile::Voigt, SpectrumKind::Absorbance)
        .unwrap();
    let coeffs = engine()
        .compute_das(&[gas.clone()], &grid, LineProfile::Voigt, SpectrumKind::Coefficient)
        .unwrap();

    let density = number_density(&gas);
    assert_relative_eq!(density, 6.022e23 * 1e-5 * 1e-6, max_relative = 1e-12);
    for (a, k) in spectra[0].values.iter().zip(&coeffs[0].values) {
        assert_relative_eq!(*a, k * density * gas.path_length_cm(), max_relative = 1e-12);
    }
}

// ============================================================================
// Range boundary
// ============================================================================

#[test]
fn test_grid_touching_boundary_within_tolerance() {
    // table covers 1102-1106, tolerance is 1 cm^-1
    let grid = SpectralGrid::linspace(1101.2, 1106.9, 100).unwrap();
    assert!(engine()
        .compute_das(&[nh3()], &grid, LineProfile::Voigt, SpectrumKind::Absorbance)
        .is_ok());
}

#[test]
fn test_grid_outside_tabulated_range() {
    let engine = engine();
    for (lo, hi) in [(1090.0, 1095.0), (1100.5, 1104.0), (1104.0, 1107.5), (1200.0, 1210.0)] {
        let grid = SpectralGrid::linspace(lo, hi, 10).unwrap();
        let err = engine
            .compute_das(&[nh3()], &grid, LineProfile::Voigt, SpectrumKind::Absorbance)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Range, "grid {}-{}", lo, hi);
    }
}

#[test]
fn test_one_bad_gas_fails_batch() {
    let grid = SpectralGrid::linspace(1103.0, 1105.0, 10).unwrap();
    let unknown = GasParameters::builder("CH4").mixing_ratio(2e-6).build().unwrap();
    let err = engine()
        .compute_das(&[nh3(), unknown], &grid, LineProfile::Voigt, SpectrumKind::Absorbance)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownGas);
    assert!(err.to_string().contains("CH4"));
}

#[test]
fn test_unknown_profile_name() {
    let err = "Galatry".parse::<LineProfile>().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedProfile);
}

// ============================================================================
// Custom adapter
// ============================================================================

/// Adapter that snaps the request onto its own coarser grid
struct SnappingAdapter {
    environments: std::cell::RefCell<Vec<Environment>>,
}

impl LineShapeAdapter for SnappingAdapter {
    fn has_line_table(&self, gas_id: &str) -> bool {
        gas_id == "CO2"
    }

    fn wavenumber_extent(&self, _gas_id: &str) -> Result<(f64, f64), LineShapeError> {
        Ok((2300.0, 2400.0))
    }

    fn compute_coefficient(
        &self,
        request: &CoefficientRequest<'_>,
    ) -> Result<CoefficientArray, LineShapeError> {
        self.environments.borrow_mut().push(request.environment);
        let grid = SpectralGrid::linspace(
            request.grid.min() + 0.005,
            request.grid.max() - 0.005,
            request.grid.len() - 1,
        )
        .map_err(|e| LineShapeError::InvalidTable(e.to_string()))?;
        let coefficients = grid.iter().map(|&nu| 1e-21 * (nu - 2300.0)).collect();
        Ok(CoefficientArray { grid, coefficients })
    }
}

#[test]
fn test_adapter_grid_supersedes_request() {
    let adapter = SnappingAdapter {
        environments: Default::default(),
    };
    let engine = DasEngine::new(&adapter);
    let grid = SpectralGrid::linspace(2340.0, 2350.0, 101).unwrap();
    let gas = GasParameters::builder("CO2")
        .pressure_hpa(506.5)
        .temperature_k(250.0)
        .mixing_ratio(4e-4)
        .build()
        .unwrap();

    let spectra = engine
        .compute_das(&[gas], &grid, LineProfile::Lorentz, SpectrumKind::Absorbance)
        .unwrap();
    assert_eq!(spectra[0].grid.len(), 100);
    assert_eq!(spectra[0].values.len(), 100);
    assert_relative_eq!(spectra[0].grid.min(), 2340.005, max_relative = 1e-12);

    let seen = adapter.environments.borrow();
    assert_eq!(seen.len(), 1);
    assert_relative_eq!(seen[0].pressure_atm, 0.5, max_relative = 1e-12);
    assert_eq!(seen[0].temperature_k, 250.0);
}

#[test]
fn test_table_environment_mismatch() {
    let table = nh3_table().with_environment(Environment::new(296.0, 1.0));
    let engine = DasEngine::new(TabulatedAdapter::new().with_table("NH3", table));
    let grid = SpectralGrid::linspace(1103.0, 1105.0, 10).unwrap();
    let err = engine
        .compute_das(&[nh3()], &grid, LineProfile::Voigt, SpectrumKind::Absorbance)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::LineShape);
}

// ============================================================================
// Etalons and export
// ============================================================================

#[test]
fn test_etalon_fringes_in_transmission() {
    let etalons = generate_etalon_coeffs(&[EtalonParams {
        refractive_index: 1.45,
        incidence_angle_deg: 0.0,
        thickness_cm: 0.1,
        reflectance: 0.04,
    }])
    .unwrap();
    assert_relative_eq!(etalons[0].finesse_coefficient, 0.16 / 0.9216, max_relative = 1e-12);

    let grid = SpectralGrid::linspace(1103.0, 1105.0, 400).unwrap();
    let plain = engine()
        .compute_das(&[nh3()], &grid, LineProfile::Voigt, SpectrumKind::Transmission)
        .unwrap();
    let fringed = engine()
        .with_etalons(etalons.clone())
        .compute_das(&[nh3()], &grid, LineProfile::Voigt, SpectrumKind::Transmission)
        .unwrap();

    let pairs = plain[0].values.iter().zip(&fringed[0].values);
    for ((t, te), &nu) in pairs.zip(grid.iter()) {
        assert_relative_eq!(*te, t * etalons[0].transmission(nu), max_relative = 1e-12);
        assert!(*te <= *t);
    }
}

#[test]
fn test_csv_export_to_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nh3.csv");
    let grid = SpectralGrid::linspace(1103.0, 1105.0, 5).unwrap();
    let gases = vec![
        nh3(),
        nh3().with_concentration(600e-9).unwrap(),
    ];
    let spectra = engine()
        .compute_das(&gases, &grid, LineProfile::Voigt, SpectrumKind::Absorbance)
        .unwrap();

    write_csv_file(&path, &spectra).unwrap();
    let text = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines.len(), 7 + 5);
    assert_eq!(lines[0], "Gas:,NH3,NH3");
    assert_eq!(lines[6], "Nu (cm^-1),spec0,spec1");
    assert!(lines[7].starts_with("1103,"));
    assert!(lines[11].starts_with("1105,"));

    let row: Vec<f64> = lines[9].split(',').map(|v| v.parse().unwrap()).collect();
    assert_relative_eq!(row[2], 2.0 * row[1], max_relative = 1e-12);
}
