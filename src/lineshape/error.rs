use super::{Environment, LineProfile};

/// Errors raised at the line-shape adapter boundary
#[derive(Debug, thiserror::Error)]
pub enum LineShapeError {
    /// I/O error reading a coefficient table
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// CSV parsing error
    #[error("CSV parsing error: {0}")]
    CsvError(#[from] csv::Error),

    /// No table registered for the gas
    #[error("No line table for gas: {0}")]
    UnknownTable(String),

    /// Table exists but lacks the requested profile
    #[error("Line table for {gas} has no {profile} coefficients")]
    ProfileUnavailable {
        /// Gas identifier
        gas: String,
        /// Requested profile
        profile: LineProfile,
    },

    /// Table was evaluated at a different thermodynamic state
    #[error("Line table for {gas} was evaluated at {tabulated}, requested {requested}")]
    EnvironmentMismatch {
        /// Gas identifier
        gas: String,
        /// Environment of the request
        requested: Environment,
        /// Environment the table was evaluated at
        tabulated: Environment,
    },

    /// Malformed coefficient table
    #[error("Invalid line table: {0}")]
    InvalidTable(String),
}
