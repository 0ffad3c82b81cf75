use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::SpectralGrid;
use crate::error::{Result, SynthesisError};

/// How [`GasParameters::concentration`] is expressed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConcentrationKind {
    /// Volume mixing ratio (dimensionless)
    #[default]
    #[serde(alias = "vmr")]
    VolumeMixingRatio,
    /// Molar density in mol/m^3
    MolarDensity,
}

/// One absorbing species under one thermodynamic state.
///
/// Constructed through [`GasParameters::new`] or [`GasParametersBuilder`];
/// both reject non-positive pressure, temperature and path length.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GasParameters {
    gas_id: String,
    pressure_hpa: f64,
    temperature_k: f64,
    path_length_cm: f64,
    concentration: f64,
    concentration_kind: ConcentrationKind,
}

impl GasParameters {
    /// Create validated gas parameters.
    pub fn new(
        gas_id: impl Into<String>,
        pressure_hpa: f64,
        temperature_k: f64,
        path_length_cm: f64,
        concentration: f64,
        concentration_kind: ConcentrationKind,
    ) -> Result<Self> {
        let gas_id = gas_id.into();
        if gas_id.trim().is_empty() {
            return Err(SynthesisError::invalid("gas identifier must not be empty"));
        }
        for (name, value) in [
            ("pressure", pressure_hpa),
            ("temperature", temperature_k),
            ("path length", path_length_cm),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(SynthesisError::invalid(format!(
                    "{} of {} must be positive, got {}",
                    name, gas_id, value
                )));
            }
        }
        if !concentration.is_finite() {
            return Err(SynthesisError::invalid(format!(
                "concentration of {} must be finite, got {}",
                gas_id, concentration
            )));
        }
        Ok(Self {
            gas_id,
            pressure_hpa,
            temperature_k,
            path_length_cm,
            concentration,
            concentration_kind,
        })
    }

    /// Start building parameters for `gas_id`.
    pub fn builder(gas_id: impl Into<String>) -> GasParametersBuilder {
        GasParametersBuilder::new(gas_id)
    }

    /// Gas identifier as known to the line-shape adapter
    pub fn gas_id(&self) -> &str {
        &self.gas_id
    }

    /// Pressure in hPa
    pub fn pressure_hpa(&self) -> f64 {
        self.pressure_hpa
    }

    /// Temperature in K
    pub fn temperature_k(&self) -> f64 {
        self.temperature_k
    }

    /// Optical path length in cm
    pub fn path_length_cm(&self) -> f64 {
        self.path_length_cm
    }

    /// Concentration, see [`GasParameters::concentration_kind`]
    pub fn concentration(&self) -> f64 {
        self.concentration
    }

    /// Unit of the concentration
    pub fn concentration_kind(&self) -> ConcentrationKind {
        self.concentration_kind
    }

    /// Copy of these parameters with a different concentration.
    pub fn with_concentration(&self, concentration: f64) -> Result<Self> {
        Self::new(
            self.gas_id.clone(),
            self.pressure_hpa,
            self.temperature_k,
            self.path_length_cm,
            concentration,
            self.concentration_kind,
        )
    }

    /// Copy of these parameters with a different path length.
    pub fn with_path_length_cm(&self, path_length_cm: f64) -> Result<Self> {
        Self::new(
            self.gas_id.clone(),
            self.pressure_hpa,
            self.temperature_k,
            path_length_cm,
            self.concentration,
            self.concentration_kind,
        )
    }
}

impl fmt::Display for GasParameters {
    /// Legend label, e.g. `2cm 3e-7 NH3 @ 990hPa & 293.15K`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}cm {:e} {} @ {}hPa & {}K",
            self.path_length_cm,
            self.concentration,
            self.gas_id,
            self.pressure_hpa,
            self.temperature_k
        )
    }
}

/// Builder for [`GasParameters`]
#[derive(Debug, Clone)]
pub struct GasParametersBuilder {
    gas_id: String,
    pressure_hpa: f64,
    temperature_k: f64,
    path_length_cm: f64,
    concentration: f64,
    concentration_kind: ConcentrationKind,
}

impl GasParametersBuilder {
    /// Defaults: 1013 hPa, 296 K, 1 cm, zero volume mixing ratio.
    pub fn new(gas_id: impl Into<String>) -> Self {
        Self {
            gas_id: gas_id.into(),
            pressure_hpa: 1013.0,
            temperature_k: 296.0,
            path_length_cm: 1.0,
            concentration: 0.0,
            concentration_kind: ConcentrationKind::VolumeMixingRatio,
        }
    }

    /// Set the pressure in hPa
    pub fn pressure_hpa(mut self, pressure_hpa: f64) -> Self {
        self.pressure_hpa = pressure_hpa;
        self
    }

    /// Set the temperature in K
    pub fn temperature_k(mut self, temperature_k: f64) -> Self {
        self.temperature_k = temperature_k;
        self
    }

    /// Set the path length in cm
    pub fn path_length_cm(mut self, path_length_cm: f64) -> Self {
        self.path_length_cm = path_length_cm;
        self
    }

    /// Set a volume mixing ratio
    pub fn mixing_ratio(mut self, mixing_ratio: f64) -> Self {
        self.concentration = mixing_ratio;
        self.concentration_kind = ConcentrationKind::VolumeMixingRatio;
        self
    }

    /// Set a molar density in mol/m^3
    pub fn molar_density(mut self, molar_density: f64) -> Self {
        self.concentration = molar_density;
        self.concentration_kind = ConcentrationKind::MolarDensity;
        self
    }

    /// Validate and build
    pub fn build(self) -> Result<GasParameters> {
        GasParameters::new(
            self.gas_id,
            self.pressure_hpa,
            self.temperature_k,
            self.path_length_cm,
            self.concentration,
            self.concentration_kind,
        )
    }
}

/// Quantity carried by a DAS [`Spectrum`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpectrumKind {
    /// Raw absorption coefficient from the line-shape adapter
    #[serde(alias = "coefficient", alias = "Absorb coeff")]
    Coefficient,
    /// coefficient x number density x path length
    #[serde(alias = "absorbance")]
    Absorbance,
    /// exp(-absorbance)
    #[serde(alias = "transmission")]
    Transmission,
}

impl SpectrumKind {
    /// Returns all accepted canonical names.
    pub fn variants() -> &'static [&'static str] {
        &["coefficient", "absorbance", "transmission"]
    }
}

impl fmt::Display for SpectrumKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpectrumKind::Coefficient => write!(f, "Absorb coeff"),
            SpectrumKind::Absorbance => write!(f, "Absorbance"),
            SpectrumKind::Transmission => write!(f, "Transmission"),
        }
    }
}

impl FromStr for SpectrumKind {
    type Err = SynthesisError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "coefficient" | "absorb coeff" | "absorp coeff" | "absorption coefficient" => {
                Ok(SpectrumKind::Coefficient)
            }
            "absorbance" => Ok(SpectrumKind::Absorbance),
            "transmission" | "transmittance" => Ok(SpectrumKind::Transmission),
            _ => Err(SynthesisError::invalid(format!(
                "Unknown spectrum mode '{}'. Valid options: {}",
                s,
                SpectrumKind::variants().join(", ")
            ))),
        }
    }
}

/// DAS output for one gas
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Spectrum {
    /// Gas the spectrum was computed for
    pub gas: GasParameters,
    /// Wavenumber axis actually returned by the line-shape adapter
    pub grid: SpectralGrid,
    /// One value per grid point
    pub values: Vec<f64>,
    /// Quantity stored in `values`
    pub kind: SpectrumKind,
}

impl Spectrum {
    /// Number of samples.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if the spectrum holds no samples.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// WMS harmonic signal for one gas
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WmsResult {
    /// Gas the signal was computed for
    pub gas: GasParameters,
    /// Wavenumber axis: the target grid (theoretical) or the ramp axis (simulation)
    pub grid: SpectralGrid,
    /// Demodulated in-phase amplitude
    pub values: Vec<f64>,
    /// Harmonic order n (1f, 2f, ...)
    pub harmonic: u32,
    /// Modulation depth in cm^-1
    pub modulation_depth: f64,
    /// Quadrature channel, only produced by the time-domain simulation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quadrature: Option<Vec<f64>>,
}

impl WmsResult {
    /// Number of samples.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if the result holds no samples.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Index and value of the largest sample.
    pub fn peak(&self) -> Option<(usize, f64)> {
        self.values
            .iter()
            .copied()
            .enumerate()
            .fold(None, |best, (i, v)| match best {
                Some((_, b)) if b >= v => best,
                _ => Some((i, v)),
            })
    }
}
