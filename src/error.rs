//! Error types shared by the synthesis engines.
//!
//! Every DAS and WMS computation is all-or-nothing: the first validation
//! failure aborts the whole batch and is reported through [`SynthesisError`].

use std::fmt;

use crate::lineshape::LineShapeError;

/// Coarse category of a [`SynthesisError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Gas identifier not known to the line-shape adapter
    UnknownGas,
    /// Spectral grid outside the tabulated line coverage
    Range,
    /// Line-shape profile name not recognised
    UnsupportedProfile,
    /// Simulation method requested without a laser specification
    MissingLaserSpec,
    /// Non-physical or inconsistent numeric input
    InvalidParameter,
    /// Failure reported by the line-shape adapter itself
    LineShape,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::UnknownGas => "unknown gas",
            ErrorKind::Range => "range",
            ErrorKind::UnsupportedProfile => "unsupported profile",
            ErrorKind::MissingLaserSpec => "missing laser spec",
            ErrorKind::InvalidParameter => "invalid parameter",
            ErrorKind::LineShape => "line shape",
        };
        f.write_str(name)
    }
}

/// Errors that can occur while synthesizing DAS or WMS spectra
#[derive(Debug, thiserror::Error)]
pub enum SynthesisError {
    /// The gas has no line table in the adapter
    #[error("Cannot find specified gas: {0}")]
    UnknownGas(String),

    /// The requested grid is not covered by the gas' tabulated lines
    #[error(
        "Cannot find lines for {gas} within {grid_min}-{grid_max} cm^-1 \
         (tabulated {table_min}-{table_max} cm^-1), please download data"
    )]
    Range {
        /// Gas identifier
        gas: String,
        /// Lower edge of the requested grid
        grid_min: f64,
        /// Upper edge of the requested grid
        grid_max: f64,
        /// Lowest tabulated line position
        table_min: f64,
        /// Highest tabulated line position
        table_max: f64,
    },

    /// Profile name is not Voigt, HT, Lorentz or Doppler
    #[error("No suitable profile: {0}")]
    UnsupportedProfile(String),

    /// Simulation requested without laser hardware description
    #[error("Simulation with parameters requires a laser specification")]
    MissingLaserSpec,

    /// Non-positive or otherwise invalid numeric input
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error raised by the line-shape adapter
    #[error("Line-shape adapter error: {0}")]
    LineShape(#[from] LineShapeError),
}

impl SynthesisError {
    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            SynthesisError::UnknownGas(_) => ErrorKind::UnknownGas,
            SynthesisError::Range { .. } => ErrorKind::Range,
            SynthesisError::UnsupportedProfile(_) => ErrorKind::UnsupportedProfile,
            SynthesisError::MissingLaserSpec => ErrorKind::MissingLaserSpec,
            SynthesisError::InvalidParameter(_) => ErrorKind::InvalidParameter,
            SynthesisError::LineShape(_) => ErrorKind::LineShape,
        }
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        SynthesisError::InvalidParameter(message.into())
    }
}

/// Result alias used by the engines
pub type Result<T> = std::result::Result<T, SynthesisError>;
