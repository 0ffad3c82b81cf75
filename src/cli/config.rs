//! TOML run configuration.
//!
//! A run describes the grid, the gases, where the pre-computed line tables
//! live and (for WMS) the modulation settings:
//!
//! ```toml
//! # nh3.toml
//! [grid]
//! min = 1103.0
//! max = 1105.0
//! points = 1000
//!
//! [computation]
//! profile = "Voigt"
//! mode = "absorbance"
//! output = "nh3.csv"
//!
//! [[gas]]
//! id = "NH3"
//! pressure_hpa = 990.0
//! temperature_k = 293.15
//! path_length_cm = 2.0
//! mixing_ratio = 300e-9
//!
//! [[line_table]]
//! gas = "NH3"
//! path = "nh3_voigt.csv"
//!
//! [wms]
//! method = "simulation"
//! harmonic = 2
//! laser_config = "laser.txt"
//!
//! [[etalon]]
//! n = 1.5
//! l = 0.1
//! R = 0.04
//! ```
//!
//! Relative paths are resolved against the directory holding the config file.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use qclas::das::{DasEngine, DEFAULT_INTENSITY_CUTOFF};
use qclas::etalon::{generate_etalon_coeffs, EtalonParams};
use qclas::lineshape::{Environment, LineProfile, LineTable, TabulatedAdapter};
use qclas::spectrum::{GasParameters, SpectralGrid, SpectrumKind};
use qclas::wms::{read_laser_config, LaserSpec, WmsMethod, WmsSettings};

/// Root configuration structure for run files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Wavenumber grid.
    #[serde(default)]
    pub grid: GridConfig,

    /// Profile, mode and output settings.
    #[serde(default)]
    pub computation: ComputationConfig,

    /// Gases to simulate.
    #[serde(default, rename = "gas")]
    pub gases: Vec<GasConfig>,

    /// Pre-computed line-shape tables, one per gas.
    #[serde(default, rename = "line_table")]
    pub line_tables: Vec<LineTableConfig>,

    /// Wavelength modulation settings.
    pub wms: Option<WmsConfig>,

    /// Inline laser description (alternative to `wms.laser_config`).
    pub laser: Option<LaserSpec>,

    /// Etalon-forming optical parts.
    #[serde(default, rename = "etalon")]
    pub etalons: Vec<EtalonParams>,

    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

/// Uniform wavenumber grid.
#[derive(Debug, Deserialize)]
pub struct GridConfig {
    /// Lower edge in cm^-1.
    pub min: f64,
    /// Upper edge in cm^-1.
    pub max: f64,
    /// Number of points.
    pub points: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            min: 1103.0,
            max: 1105.0,
            points: 1000,
        }
    }
}

/// Settings shared by all subcommands.
#[derive(Debug, Default, Deserialize)]
pub struct ComputationConfig {
    /// Line profile name ("Voigt", "HT", "Lorentz", "Doppler").
    pub profile: Option<String>,
    /// DAS quantity ("coefficient", "absorbance", "transmission").
    pub mode: Option<String>,
    /// Line intensity cutoff passed to the adapter.
    pub intensity_cutoff: Option<f64>,
    /// CSV output path.
    pub output: Option<PathBuf>,
}

/// One `[[gas]]` entry.
#[derive(Debug, Deserialize)]
pub struct GasConfig {
    /// Gas identifier, must match a line table.
    pub id: String,
    /// Pressure in hPa.
    #[serde(default = "default_pressure")]
    pub pressure_hpa: f64,
    /// Temperature in K.
    #[serde(default = "default_temperature")]
    pub temperature_k: f64,
    /// Path length in cm.
    #[serde(default = "default_path_length")]
    pub path_length_cm: f64,
    /// Volume mixing ratio.
    pub mixing_ratio: Option<f64>,
    /// Molar density in mol/m^3.
    pub molar_density: Option<f64>,
}

fn default_pressure() -> f64 {
    1013.0
}

fn default_temperature() -> f64 {
    296.0
}

fn default_path_length() -> f64 {
    1.0
}

/// One `[[line_table]]` entry.
#[derive(Debug, Deserialize)]
pub struct LineTableConfig {
    /// Gas the table belongs to.
    pub gas: String,
    /// CSV file with a `nu` column and one column per profile.
    pub path: PathBuf,
    /// Temperature (K) the table was evaluated at.
    pub temperature_k: Option<f64>,
    /// Pressure (atm) the table was evaluated at.
    pub pressure_atm: Option<f64>,
}

/// The `[wms]` table.
#[derive(Debug, Default, Deserialize)]
pub struct WmsConfig {
    /// "theoretical" or "simulation".
    pub method: Option<String>,
    /// Harmonic order.
    pub harmonic: Option<u32>,
    /// Modulation depth in cm^-1 for the theoretical model.
    pub modulation_depth: Option<f64>,
    /// Path to a `key: value` laser description.
    pub laser_config: Option<PathBuf>,
}

impl GasConfig {
    /// Validate into [`GasParameters`].
    pub fn to_parameters(&self) -> Result<GasParameters> {
        let builder = GasParameters::builder(self.id.as_str())
            .pressure_hpa(self.pressure_hpa)
            .temperature_k(self.temperature_k)
            .path_length_cm(self.path_length_cm);
        let builder = match (self.mixing_ratio, self.molar_density) {
            (Some(vmr), None) => builder.mixing_ratio(vmr),
            (None, Some(density)) => builder.molar_density(density),
            (Some(_), Some(_)) => bail!(
                "Gas {} sets both mixing_ratio and molar_density",
                self.id
            ),
            (None, None) => bail!("Gas {} needs mixing_ratio or molar_density", self.id),
        };
        builder
            .build()
            .with_context(|| format!("Invalid parameters for gas {}", self.id))
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let mut config = Self::from_str(&content)?;
        config.base_dir = path.parent().map(Path::to_path_buf);
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// The configured wavenumber grid.
    pub fn grid(&self) -> Result<SpectralGrid> {
        SpectralGrid::linspace(self.grid.min, self.grid.max, self.grid.points)
            .context("Invalid [grid] section")
    }

    /// Validated gas parameters, in file order.
    pub fn gases(&self) -> Result<Vec<GasParameters>> {
        if self.gases.is_empty() {
            bail!("Config defines no [[gas]] entries");
        }
        self.gases.iter().map(GasConfig::to_parameters).collect()
    }

    /// Line profile, defaulting to Voigt.
    pub fn profile(&self) -> Result<LineProfile> {
        match &self.computation.profile {
            Some(name) => Ok(name.parse()?),
            None => Ok(LineProfile::Voigt),
        }
    }

    /// DAS quantity, defaulting to absorbance.
    pub fn mode(&self) -> Result<SpectrumKind> {
        match &self.computation.mode {
            Some(name) => Ok(name.parse()?),
            None => Ok(SpectrumKind::Absorbance),
        }
    }

    /// Output path, resolved against the config directory.
    pub fn output(&self) -> Option<PathBuf> {
        self.computation.output.as_deref().map(|p| self.resolve(p))
    }

    /// Load every `[[line_table]]` into a tabulated adapter.
    pub fn adapter(&self) -> Result<TabulatedAdapter> {
        let mut adapter = TabulatedAdapter::new();
        for entry in &self.line_tables {
            let path = self.resolve(&entry.path);
            let mut table = LineTable::from_csv_file(&path)
                .with_context(|| format!("Failed to load line table {}", path.display()))?;
            match (entry.temperature_k, entry.pressure_atm) {
                (Some(t), Some(p)) => table = table.with_environment(Environment::new(t, p)),
                (None, None) => {}
                _ => bail!(
                    "Line table for {} must set both temperature_k and pressure_atm",
                    entry.gas
                ),
            }
            adapter.insert(entry.gas.as_str(), table);
        }
        Ok(adapter)
    }

    /// DAS engine over [`Config::adapter`] with cutoff and etalons applied.
    pub fn das_engine(&self) -> Result<DasEngine<TabulatedAdapter>> {
        let etalons = generate_etalon_coeffs(&self.etalons).context("Invalid [[etalon]] entry")?;
        Ok(DasEngine::new(self.adapter()?)
            .with_intensity_cutoff(
                self.computation
                    .intensity_cutoff
                    .unwrap_or(DEFAULT_INTENSITY_CUTOFF),
            )
            .with_etalons(etalons))
    }

    /// Laser description: inline `[laser]` wins over `wms.laser_config`.
    pub fn laser(&self) -> Result<Option<LaserSpec>> {
        if let Some(laser) = self.laser {
            laser.validate().context("Invalid [laser] section")?;
            return Ok(Some(laser));
        }
        match self.wms.as_ref().and_then(|w| w.laser_config.as_deref()) {
            Some(path) => {
                let path = self.resolve(path);
                let laser = read_laser_config(&path)
                    .with_context(|| format!("Failed to load laser config {}", path.display()))?;
                Ok(Some(laser))
            }
            None => Ok(None),
        }
    }

    /// WMS settings from `[wms]` and the laser description.
    pub fn wms_settings(&self) -> Result<WmsSettings> {
        let wms = self.wms.as_ref();
        let method = match wms.and_then(|w| w.method.as_deref()) {
            Some(name) => name.parse()?,
            None => WmsMethod::default(),
        };
        Ok(WmsSettings {
            method,
            harmonic: wms.and_then(|w| w.harmonic).unwrap_or(2),
            modulation_depth: wms.and_then(|w| w.modulation_depth),
            laser: self.laser()?,
        })
    }
}
