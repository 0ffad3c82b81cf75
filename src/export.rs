//! CSV export of DAS and WMS batches.
//!
//! Layout, one column per result after the label column:
//!
//! ```text
//! Gas:,NH3,CO2
//! Path length (cm):,2,2
//! Conc.:,0.0000003,0.0004
//! Pressure (hPa):,990,990
//! Temperature (K):,293.15,293.15
//! --,--,--
//! Nu (cm^-1),spec0,spec1
//! 1103,0.0012,0.0001
//! ...
//! ```
//!
//! The wavenumber column is taken from the first result.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::spectrum::{GasParameters, SpectralGrid, Spectrum, WmsResult};

/// Errors that can occur during CSV export
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// I/O error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// CSV writer error
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Nothing to export
    #[error("No results to export")]
    Empty,

    /// A result does not match the first result's grid length
    #[error("Result {index} has {found} samples, expected {expected}")]
    LengthMismatch {
        /// Position in the batch
        index: usize,
        /// Length of the first result's grid
        expected: usize,
        /// Length of the offending result
        found: usize,
    },
}

/// Field layout shared by [`Spectrum`] and [`WmsResult`].
pub trait SpectralRecord {
    /// Gas the result belongs to.
    fn gas(&self) -> &GasParameters;
    /// Wavenumber axis.
    fn grid(&self) -> &SpectralGrid;
    /// One value per grid point.
    fn values(&self) -> &[f64];
}

impl SpectralRecord for Spectrum {
    fn gas(&self) -> &GasParameters {
        &self.gas
    }

    fn grid(&self) -> &SpectralGrid {
        &self.grid
    }

    fn values(&self) -> &[f64] {
        &self.values
    }
}

impl SpectralRecord for WmsResult {
    fn gas(&self) -> &GasParameters {
        &self.gas
    }

    fn grid(&self) -> &SpectralGrid {
        &self.grid
    }

    fn values(&self) -> &[f64] {
        &self.values
    }
}

/// Write a batch to `writer`.
pub fn write_csv<W: Write, R: SpectralRecord>(writer: W, results: &[R]) -> Result<(), ExportError> {
    let first = results.first().ok_or(ExportError::Empty)?;
    let nu = first.grid().as_slice();
    for (index, result) in results.iter().enumerate() {
        if result.values().len() != nu.len() {
            return Err(ExportError::LengthMismatch {
                index,
                expected: nu.len(),
                found: result.values().len(),
            });
        }
    }

    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record(metadata_row("Gas:", results, |g| g.gas_id().to_string()))?;
    csv_writer.write_record(metadata_row("Path length (cm):", results, |g| {
        g.path_length_cm().to_string()
    }))?;
    csv_writer.write_record(metadata_row("Conc.:", results, |g| g.concentration().to_string()))?;
    csv_writer.write_record(metadata_row("Pressure (hPa):", results, |g| {
        g.pressure_hpa().to_string()
    }))?;
    csv_writer.write_record(metadata_row("Temperature (K):", results, |g| {
        g.temperature_k().to_string()
    }))?;
    csv_writer.write_record(metadata_row("--", results, |_| "--".to_string()))?;

    let header: Vec<String> = std::iter::once("Nu (cm^-1)".to_string())
        .chain((0..results.len()).map(|i| format!("spec{}", i)))
        .collect();
    csv_writer.write_record(&header)?;

    for (idx, n) in nu.iter().enumerate() {
        let row: Vec<String> = std::iter::once(n.to_string())
            .chain(results.iter().map(|r| r.values()[idx].to_string()))
            .collect();
        csv_writer.write_record(&row)?;
    }

    csv_writer.flush()?;
    Ok(())
}

fn metadata_row<R: SpectralRecord>(
    label: &str,
    results: &[R],
    field: impl Fn(&GasParameters) -> String,
) -> Vec<String> {
    std::iter::once(label.to_string())
        .chain(results.iter().map(|r| field(r.gas())))
        .collect()
}

/// Write a batch to a CSV file, replacing it if it exists.
pub fn write_csv_file<P: AsRef<Path>, R: SpectralRecord>(
    path: P,
    results: &[R],
) -> Result<(), ExportError> {
    let file = File::create(path)?;
    write_csv(BufWriter::new(file), results)
}
