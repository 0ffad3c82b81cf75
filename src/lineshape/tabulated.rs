//! CSV-backed line-shape adapter.
//!
//! A [`LineTable`] holds absorption coefficients that an external
//! line-by-line evaluator has already computed on its own wavenumber axis,
//! one column per profile:
//!
//! ```text
//! nu,Voigt,Lorentz
//! 1103.000,1.2e-21,1.1e-21
//! 1103.002,1.3e-21,1.2e-21
//! ```
//!
//! [`TabulatedAdapter`] resamples those columns onto the requested grid by
//! linear interpolation.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::str::FromStr;

use log::{debug, warn};

use super::{
    CoefficientArray, CoefficientRequest, Environment, LineProfile, LineShapeAdapter,
    LineShapeError,
};
use crate::dsp::{count_out_of_range, interp_many};

/// Default relative tolerance when comparing a request to a table's environment
pub const DEFAULT_ENVIRONMENT_TOLERANCE: f64 = 1e-6;

/// Pre-computed coefficients for one gas
#[derive(Debug, Clone, PartialEq)]
pub struct LineTable {
    nu: Vec<f64>,
    profiles: HashMap<LineProfile, Vec<f64>>,
    environment: Option<Environment>,
}

impl LineTable {
    /// Create an empty table on the wavenumber axis `nu` (cm^-1).
    pub fn new(nu: Vec<f64>) -> Result<Self, LineShapeError> {
        if nu.len() < 2 {
            return Err(LineShapeError::InvalidTable(format!(
                "wavenumber axis needs at least 2 points, got {}",
                nu.len()
            )));
        }
        if nu.windows(2).any(|w| !(w[1] > w[0])) {
            return Err(LineShapeError::InvalidTable(
                "wavenumber axis must be strictly increasing".to_string(),
            ));
        }
        Ok(Self {
            nu,
            profiles: HashMap::new(),
            environment: None,
        })
    }

    /// Attach the coefficients of one profile.
    pub fn with_profile(
        mut self,
        profile: LineProfile,
        coefficients: Vec<f64>,
    ) -> Result<Self, LineShapeError> {
        if coefficients.len() != self.nu.len() {
            return Err(LineShapeError::InvalidTable(format!(
                "{} column has {} values for {} wavenumbers",
                profile,
                coefficients.len(),
                self.nu.len()
            )));
        }
        self.profiles.insert(profile, coefficients);
        Ok(self)
    }

    /// Record the thermodynamic state the coefficients were evaluated at.
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = Some(environment);
        self
    }

    /// Parse a table from CSV text.
    ///
    /// The header must contain a `nu` (or `wavenumber`) column. Other columns
    /// are matched against profile names; unrecognised columns are skipped.
    /// Lines starting with `#` are comments.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, LineShapeError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .comment(Some(b'#'))
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader
            .headers()?
            .iter()
            .map(|s| s.trim().to_string())
            .collect();

        let nu_col = headers
            .iter()
            .position(|h| {
                let h = h.to_lowercase();
                h == "nu" || h == "wavenumber"
            })
            .ok_or_else(|| LineShapeError::InvalidTable("missing 'nu' column".to_string()))?;

        let mut columns: Vec<(usize, LineProfile)> = Vec::new();
        for (i, header) in headers.iter().enumerate() {
            if i == nu_col {
                continue;
            }
            match LineProfile::from_str(header) {
                Ok(profile) => columns.push((i, profile)),
                Err(_) => warn!("Skipping unrecognised line table column '{}'", header),
            }
        }

        let mut nu = Vec::new();
        let mut values: Vec<Vec<f64>> = vec![Vec::new(); columns.len()];
        for (row, record) in csv_reader.records().enumerate() {
            let record = record?;
            nu.push(parse_field(record.get(nu_col), row, "nu")?);
            for ((col, profile), out) in columns.iter().zip(values.iter_mut()) {
                out.push(parse_field(record.get(*col), row, &profile.to_string())?);
            }
        }

        let mut table = Self::new(nu)?;
        for ((_, profile), coefficients) in columns.into_iter().zip(values) {
            table = table.with_profile(profile, coefficients)?;
        }
        Ok(table)
    }

    /// Parse a table from a CSV file.
    pub fn from_csv_file<P: AsRef<Path>>(path: P) -> Result<Self, LineShapeError> {
        let file = File::open(path)?;
        Self::from_csv_reader(BufReader::new(file))
    }

    /// Wavenumber axis.
    pub fn nu(&self) -> &[f64] {
        &self.nu
    }

    /// Coefficients for `profile`, if tabulated.
    pub fn profile(&self, profile: LineProfile) -> Option<&[f64]> {
        self.profiles.get(&profile).map(Vec::as_slice)
    }

    /// Environment the table was evaluated at, if recorded.
    pub fn environment(&self) -> Option<Environment> {
        self.environment
    }
}

fn parse_field(field: Option<&str>, row: usize, column: &str) -> Result<f64, LineShapeError> {
    let raw = field.ok_or_else(|| {
        LineShapeError::InvalidTable(format!("row {}: missing {} value", row + 1, column))
    })?;
    raw.parse::<f64>().map_err(|_| {
        LineShapeError::InvalidTable(format!("row {}: invalid {} value '{}'", row + 1, column, raw))
    })
}

/// Line-shape adapter serving pre-computed coefficient tables.
///
/// The intensity cutoff of a request is not applied: tabulated coefficients
/// already reflect whatever cutoff the producing evaluator used.
#[derive(Debug, Clone)]
pub struct TabulatedAdapter {
    tables: HashMap<String, LineTable>,
    environment_tolerance: f64,
}

impl Default for TabulatedAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl TabulatedAdapter {
    /// Create an adapter with no tables.
    pub fn new() -> Self {
        Self {
            tables: HashMap::new(),
            environment_tolerance: DEFAULT_ENVIRONMENT_TOLERANCE,
        }
    }

    /// Register (or replace) the table for `gas_id`.
    pub fn insert(&mut self, gas_id: impl Into<String>, table: LineTable) {
        self.tables.insert(gas_id.into(), table);
    }

    /// Builder form of [`TabulatedAdapter::insert`].
    pub fn with_table(mut self, gas_id: impl Into<String>, table: LineTable) -> Self {
        self.insert(gas_id, table);
        self
    }

    /// Load a CSV table from disk and register it for `gas_id`.
    pub fn load_csv<P: AsRef<Path>>(
        &mut self,
        gas_id: impl Into<String>,
        path: P,
    ) -> Result<(), LineShapeError> {
        let gas_id = gas_id.into();
        let table = LineTable::from_csv_file(path.as_ref())?;
        debug!(
            "Loaded line table for {} from {} ({} points)",
            gas_id,
            path.as_ref().display(),
            table.nu.len()
        );
        self.insert(gas_id, table);
        Ok(())
    }

    /// Relative tolerance used to match request and table environments.
    pub fn with_environment_tolerance(mut self, tolerance: f64) -> Self {
        self.environment_tolerance = tolerance;
        self
    }

    /// Registered gas identifiers, sorted.
    pub fn gas_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.tables.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    fn table(&self, gas_id: &str) -> Result<&LineTable, LineShapeError> {
        self.tables
            .get(gas_id)
            .ok_or_else(|| LineShapeError::UnknownTable(gas_id.to_string()))
    }
}

impl LineShapeAdapter for TabulatedAdapter {
    fn has_line_table(&self, gas_id: &str) -> bool {
        self.tables.contains_key(gas_id)
    }

    fn wavenumber_extent(&self, gas_id: &str) -> Result<(f64, f64), LineShapeError> {
        let table = self.table(gas_id)?;
        Ok((table.nu[0], table.nu[table.nu.len() - 1]))
    }

    fn compute_coefficient(
        &self,
        request: &CoefficientRequest<'_>,
    ) -> Result<CoefficientArray, LineShapeError> {
        let table = self.table(request.gas_id)?;

        if let Some(tabulated) = table.environment {
            if !tabulated.approx_eq(&request.environment, self.environment_tolerance) {
                return Err(LineShapeError::EnvironmentMismatch {
                    gas: request.gas_id.to_string(),
                    requested: request.environment,
                    tabulated,
                });
            }
        }

        let column = table
            .profile(request.profile)
            .ok_or_else(|| LineShapeError::ProfileUnavailable {
                gas: request.gas_id.to_string(),
                profile: request.profile,
            })?;

        let grid = request.grid.as_slice();
        let clamped = count_out_of_range(grid, &table.nu);
        if clamped > 0 {
            warn!(
                "{} of {} wavenumbers for {} lie outside the tabulated axis and were clamped",
                clamped,
                grid.len(),
                request.gas_id
            );
        }

        let coefficients = if grid == table.nu.as_slice() {
            column.to_vec()
        } else {
            interp_many(grid, &table.nu, column)
        };

        Ok(CoefficientArray {
            grid: request.grid.clone(),
            coefficients,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spectrum::SpectralGrid;

    const CSV: &str = "\
# evaluated at 296 K, 1 atm
nu,Voigt,Lorentz,comment
1000.0,1.0,2.0,x
1001.0,3.0,4.0,y
1002.0,5.0,6.0,z
";

    fn request<'a>(grid: &'a SpectralGrid, profile: LineProfile) -> CoefficientRequest<'a> {
        CoefficientRequest {
            gas_id: "CO",
            grid,
            environment: Environment::new(296.0, 1.0),
            profile,
            intensity_cutoff: 1e-30,
        }
    }

    #[test]
    fn test_parse_csv_table() {
        let table = LineTable::from_csv_reader(CSV.as_bytes()).unwrap();
        assert_eq!(table.nu(), &[1000.0, 1001.0, 1002.0]);
        assert_eq!(table.profile(LineProfile::Voigt).unwrap(), &[1.0, 3.0, 5.0]);
        assert_eq!(table.profile(LineProfile::Lorentz).unwrap(), &[2.0, 4.0, 6.0]);
        assert!(table.profile(LineProfile::Doppler).is_none());
    }

    #[test]
    fn test_parse_rejects_missing_nu_column() {
        let err = LineTable::from_csv_reader("Voigt\n1.0\n2.0\n".as_bytes()).unwrap_err();
        assert!(matches!(err, LineShapeError::InvalidTable(_)));
    }

    #[test]
    fn test_parse_rejects_bad_number() {
        let err = LineTable::from_csv_reader("nu,Voigt\n1.0,abc\n2.0,1\n".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("abc"));
    }

    #[test]
    fn test_table_rejects_unsorted_axis() {
        assert!(LineTable::new(vec![1.0, 1.0]).is_err());
        assert!(LineTable::new(vec![1.0]).is_err());
        let table = LineTable::new(vec![1.0, 2.0]).unwrap();
        assert!(table.with_profile(LineProfile::Voigt, vec![1.0]).is_err());
    }

    #[test]
    fn test_adapter_interpolates_onto_grid() {
        let table = LineTable::from_csv_reader(CSV.as_bytes()).unwrap();
        let adapter = TabulatedAdapter::new().with_table("CO", table);

        assert!(adapter.has_line_table("CO"));
        assert!(!adapter.has_line_table("NH3"));
        assert_eq!(adapter.wavenumber_extent("CO").unwrap(), (1000.0, 1002.0));

        let grid = SpectralGrid::new(vec![1000.5, 1001.5]).unwrap();
        let out = adapter.compute_coefficient(&request(&grid, LineProfile::Voigt)).unwrap();
        assert_eq!(out.grid, grid);
        assert_eq!(out.coefficients, vec![2.0, 4.0]);
    }

    #[test]
    fn test_adapter_missing_profile() {
        let table = LineTable::from_csv_reader(CSV.as_bytes()).unwrap();
        let adapter = TabulatedAdapter::new().with_table("CO", table);
        let grid = SpectralGrid::new(vec![1000.0, 1001.0]).unwrap();
        let err = adapter
            .compute_coefficient(&request(&grid, LineProfile::HartmannTran))
            .unwrap_err();
        assert!(matches!(err, LineShapeError::ProfileUnavailable { .. }));
    }

    #[test]
    fn test_adapter_environment_mismatch() {
        let table = LineTable::from_csv_reader(CSV.as_bytes())
            .unwrap()
            .with_environment(Environment::new(300.0, 1.0));
        let adapter = TabulatedAdapter::new().with_table("CO", table);
        let grid = SpectralGrid::new(vec![1000.0, 1001.0]).unwrap();
        let err = adapter
            .compute_coefficient(&request(&grid, LineProfile::Voigt))
            .unwrap_err();
        assert!(matches!(err, LineShapeError::EnvironmentMismatch { .. }));
    }

    #[test]
    fn test_adapter_unknown_gas() {
        let adapter = TabulatedAdapter::default();
        assert!(matches!(
            adapter.wavenumber_extent("CH4"),
            Err(LineShapeError::UnknownTable(_))
        ));
        assert!(adapter.gas_ids().is_empty());
    }
}
