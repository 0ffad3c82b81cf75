//! Laser hardware description for the time-domain WMS simulation.
//!
//! The description is usually stored as a plain `key: value` file written by
//! the acquisition software:
//!
//! ```text
//! fS: 1000000
//! fMod: 10000
//! fRamp: 100
//! aRamp: 60
//! aMod: 8
//! tRamp: 0.002
//! tMod: 0.0025
//! c2p: 0.5
//! laserDC: 10
//! fCut: 4000
//! phase: 0
//! central_wavelength: 1104
//! ```

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SynthesisError};

/// Errors reading a `key: value` laser configuration
#[derive(Debug, thiserror::Error)]
pub enum LaserConfigError {
    /// I/O error
    #[error("Failed to read laser config: {0}")]
    IoError(#[from] std::io::Error),

    /// Line without a `key: value` pair
    #[error("Malformed line {line}: '{content}'")]
    Malformed {
        /// 1-based line number
        line: usize,
        /// Offending text
        content: String,
    },

    /// Value is not a number
    #[error("Invalid value for '{key}': '{value}'")]
    InvalidValue {
        /// Key
        key: String,
        /// Raw value
        value: String,
    },

    /// Required key absent
    #[error("Missing laser parameter: {0}")]
    MissingKey(&'static str),

    /// Parsed values are not physical
    #[error(transparent)]
    Invalid(#[from] SynthesisError),
}

/// Keys of the `key: value` format, in field order.
pub const LASER_KEYS: [&str; 12] = [
    "fS",
    "fMod",
    "fRamp",
    "aRamp",
    "aMod",
    "tRamp",
    "tMod",
    "c2p",
    "laserDC",
    "fCut",
    "phase",
    "central_wavelength",
];

/// Modulation and ramp settings of the laser driver
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaserSpec {
    /// Sampling frequency in Hz (`fS`)
    #[serde(alias = "fS")]
    pub sampling_frequency_hz: f64,
    /// Modulation frequency in Hz (`fMod`)
    #[serde(alias = "fMod")]
    pub modulation_frequency_hz: f64,
    /// Ramp frequency in Hz (`fRamp`)
    #[serde(alias = "fRamp")]
    pub ramp_frequency_hz: f64,
    /// Ramp current amplitude in mA (`aRamp`)
    #[serde(alias = "aRamp")]
    pub ramp_amplitude_ma: f64,
    /// Peak-to-peak modulation current in mA (`aMod`)
    #[serde(alias = "aMod")]
    pub modulation_amplitude_ma: f64,
    /// Ramp tuning rate in cm^-1/mA (`tRamp`)
    #[serde(alias = "tRamp")]
    pub ramp_tuning_rate: f64,
    /// Modulation tuning rate in cm^-1/mA (`tMod`)
    #[serde(alias = "tMod")]
    pub modulation_tuning_rate: f64,
    /// Current to optical power conversion in mW/mA (`c2p`)
    #[serde(alias = "c2p")]
    pub current_to_power: f64,
    /// DC laser power in mW (`laserDC`)
    #[serde(alias = "laserDC")]
    pub laser_dc_power_mw: f64,
    /// Low-pass cutoff in Hz (`fCut`)
    #[serde(alias = "fCut")]
    pub lowpass_cutoff_hz: f64,
    /// Lock-in reference phase in degrees (`phase`)
    #[serde(alias = "phase", default)]
    pub phase_deg: f64,
    /// Wavenumber at the centre of the ramp in cm^-1 (`central_wavelength`)
    #[serde(alias = "central_wavelength")]
    pub central_wavenumber: f64,
}

impl LaserSpec {
    /// Number of samples in one ramp period, `floor(fS / fRamp)`.
    pub fn samples_per_ramp(&self) -> usize {
        let n = (self.sampling_frequency_hz / self.ramp_frequency_hz).floor();
        if n.is_finite() && n > 0.0 {
            n as usize
        } else {
            0
        }
    }

    /// Half-amplitude optical modulation depth in cm^-1.
    pub fn modulation_depth(&self) -> f64 {
        self.modulation_tuning_rate * self.modulation_amplitude_ma / 1000.0 * 200.0 * 0.5
    }

    /// Check that rates and frequencies are strictly positive and that a
    /// ramp period holds at least two samples.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("sampling frequency", self.sampling_frequency_hz),
            ("modulation frequency", self.modulation_frequency_hz),
            ("ramp frequency", self.ramp_frequency_hz),
            ("ramp amplitude", self.ramp_amplitude_ma),
            ("ramp tuning rate", self.ramp_tuning_rate),
            ("modulation tuning rate", self.modulation_tuning_rate),
            ("low-pass cutoff", self.lowpass_cutoff_hz),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(SynthesisError::invalid(format!(
                    "laser {} must be positive, got {}",
                    name, value
                )));
            }
        }

        let finite = [
            ("modulation amplitude", self.modulation_amplitude_ma),
            ("current to power", self.current_to_power),
            ("DC power", self.laser_dc_power_mw),
            ("phase", self.phase_deg),
            ("central wavenumber", self.central_wavenumber),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(SynthesisError::invalid(format!(
                    "laser {} must be finite, got {}",
                    name, value
                )));
            }
        }
        if self.modulation_amplitude_ma < 0.0 {
            return Err(SynthesisError::invalid(format!(
                "laser modulation amplitude must be non-negative, got {}",
                self.modulation_amplitude_ma
            )));
        }

        if self.samples_per_ramp() < 2 {
            return Err(SynthesisError::invalid(format!(
                "sampling frequency {} Hz gives fewer than 2 samples per ramp at {} Hz",
                self.sampling_frequency_hz, self.ramp_frequency_hz
            )));
        }
        Ok(())
    }

    /// Build a laser description from parsed `key: value` pairs.
    ///
    /// Every key in [`LASER_KEYS`] is required; extra keys are ignored.
    pub fn from_key_values(
        values: &HashMap<String, f64>,
    ) -> std::result::Result<Self, LaserConfigError> {
        let get = |key: &'static str| {
            values
                .get(key)
                .copied()
                .ok_or(LaserConfigError::MissingKey(key))
        };

        for key in values.keys() {
            if !LASER_KEYS.contains(&key.as_str()) {
                warn!("Ignoring unknown laser parameter '{}'", key);
            }
        }

        Ok(Self {
            sampling_frequency_hz: get("fS")?,
            modulation_frequency_hz: get("fMod")?,
            ramp_frequency_hz: get("fRamp")?,
            ramp_amplitude_ma: get("aRamp")?,
            modulation_amplitude_ma: get("aMod")?,
            ramp_tuning_rate: get("tRamp")?,
            modulation_tuning_rate: get("tMod")?,
            current_to_power: get("c2p")?,
            laser_dc_power_mw: get("laserDC")?,
            lowpass_cutoff_hz: get("fCut")?,
            phase_deg: get("phase")?,
            central_wavenumber: get("central_wavelength")?,
        })
    }

    /// The laser description as `key: value` pairs, in [`LASER_KEYS`] order.
    pub fn to_key_values(&self) -> Vec<(&'static str, f64)> {
        let values = [
            self.sampling_frequency_hz,
            self.modulation_frequency_hz,
            self.ramp_frequency_hz,
            self.ramp_amplitude_ma,
            self.modulation_amplitude_ma,
            self.ramp_tuning_rate,
            self.modulation_tuning_rate,
            self.current_to_power,
            self.laser_dc_power_mw,
            self.lowpass_cutoff_hz,
            self.phase_deg,
            self.central_wavenumber,
        ];
        LASER_KEYS.iter().copied().zip(values).collect()
    }
}

/// Parse `key: value` lines into a map.
///
/// Blank lines and lines starting with `#` are skipped.
pub fn parse_key_values<R: BufRead>(
    reader: R,
) -> std::result::Result<HashMap<String, f64>, LaserConfigError> {
    let mut values = HashMap::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let (key, raw) = trimmed.split_once(':').ok_or_else(|| LaserConfigError::Malformed {
            line: idx + 1,
            content: trimmed.to_string(),
        })?;
        let (key, raw) = (key.trim(), raw.trim());
        let value: f64 = raw.parse().map_err(|_| LaserConfigError::InvalidValue {
            key: key.to_string(),
            value: raw.to_string(),
        })?;
        debug!("{}: {}", key, value);
        values.insert(key.to_string(), value);
    }
    Ok(values)
}

/// Read and validate a `key: value` laser configuration file.
pub fn read_laser_config<P: AsRef<Path>>(
    path: P,
) -> std::result::Result<LaserSpec, LaserConfigError> {
    debug!("Reading laser configuration from {}", path.as_ref().display());
    let file = File::open(path)?;
    let values = parse_key_values(BufReader::new(file))?;
    let spec = LaserSpec::from_key_values(&values)?;
    spec.validate()?;
    Ok(spec)
}
