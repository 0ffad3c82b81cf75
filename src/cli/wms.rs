use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use qclas::export::write_csv_file;
use qclas::metrics::{peak_trough_height, DEFAULT_AVERAGING_WINDOW};
use qclas::wms::WmsEngine;

use super::config::Config;
use super::report::RunReport;

/// Compute WMS harmonic signals for every configured gas
pub fn run(
    config_path: PathBuf,
    output: Option<PathBuf>,
    method: Option<String>,
    harmonic: Option<u32>,
) -> Result<()> {
    let mut config = Config::from_file(&config_path)?;
    {
        let wms = config.wms.get_or_insert_with(Default::default);
        if method.is_some() {
            wms.method = method;
        }
        if harmonic.is_some() {
            wms.harmonic = harmonic;
        }
    }

    let grid = config.grid()?;
    let gases = config.gases()?;
    let profile = config.profile()?;
    let settings = config.wms_settings()?;
    let engine = WmsEngine::new(config.das_engine()?);

    info!(
        "WMS {}f ({}): {} gas(es), {} points, {} profile",
        settings.harmonic,
        settings.method,
        gases.len(),
        grid.len(),
        profile
    );

    let results = engine
        .compute_wms(&gases, &grid, profile, &settings)
        .context("WMS computation failed")?;

    for result in &results {
        let height = peak_trough_height(&result.values, 0, result.len(), DEFAULT_AVERAGING_WINDOW);
        match height {
            Some(h) => println!("{}: peak-to-trough {:e}", result.gas, h),
            None => println!("{}: no peak inside the grid", result.gas),
        }
    }

    let Some(output) = output.or_else(|| config.output()) else {
        return Ok(());
    };
    write_csv_file(&output, &results)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    let mut report = RunReport::new("wms", profile, settings.method);
    report.harmonic = Some(settings.harmonic);
    report.modulation_depth = results.first().map(|r| r.modulation_depth);
    report.gases = results.iter().map(|r| r.gas.to_string()).collect();
    report.points = results.first().map_or(0, |r| r.len());
    let sidecar = report.write_sidecar(&output)?;

    info!("Wrote {} and {}", output.display(), sidecar.display());
    Ok(())
}
