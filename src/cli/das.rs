use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use qclas::export::write_csv_file;
use qclas::spectrum::total_das;

use super::config::Config;
use super::report::RunReport;

/// Compute direct absorption spectra for every configured gas
pub fn run(config_path: PathBuf, output: Option<PathBuf>, mode: Option<String>) -> Result<()> {
    let mut config = Config::from_file(&config_path)?;
    if mode.is_some() {
        config.computation.mode = mode;
    }

    let grid = config.grid()?;
    let gases = config.gases()?;
    let profile = config.profile()?;
    let kind = config.mode()?;
    let engine = config.das_engine()?;

    info!(
        "DAS: {} gas(es), {} points, {} profile, {}",
        gases.len(),
        grid.len(),
        profile,
        kind
    );

    let spectra = engine
        .compute_das(&gases, &grid, profile, kind)
        .context("DAS computation failed")?;

    for spectrum in &spectra {
        let max = spectrum.values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let min = spectrum.values.iter().copied().fold(f64::INFINITY, f64::min);
        println!("{}: {} in [{:e}, {:e}]", spectrum.gas, kind, min, max);
    }
    if let Some(total) = total_das(&spectra) {
        let max = total.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        println!("Total: max {:e}", max);
    }

    let Some(output) = output.or_else(|| config.output()) else {
        return Ok(());
    };
    write_csv_file(&output, &spectra)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    let mut report = RunReport::new("das", profile, kind);
    report.gases = spectra.iter().map(|s| s.gas.to_string()).collect();
    report.points = spectra.first().map_or(0, |s| s.len());
    let sidecar = report.write_sidecar(&output)?;

    info!("Wrote {} and {}", output.display(), sidecar.display());
    Ok(())
}
