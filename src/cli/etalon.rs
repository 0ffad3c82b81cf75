use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use qclas::etalon::EtalonParams;
use qclas::spectrum::SpectralGrid;

/// Print etalon coefficients and optionally write the Airy transmission
pub fn run(
    params: EtalonParams,
    grid: Option<(f64, f64, usize)>,
    output: Option<PathBuf>,
) -> Result<()> {
    let coeffs = params.coeffs().context("Invalid etalon parameters")?;
    println!("Coefficient of finesse F: {}", coeffs.finesse_coefficient);
    println!("Phase coefficient delta (cm): {}", coeffs.phase_delta_coefficient);

    let Some((min, max, points)) = grid else {
        return Ok(());
    };
    let grid = SpectralGrid::linspace(min, max, points).context("Invalid grid")?;

    let Some(output) = output else {
        let t: Vec<f64> = grid.iter().map(|&nu| coeffs.transmission(nu)).collect();
        let lo = t.iter().copied().fold(f64::INFINITY, f64::min);
        println!("Transmission over {}-{} cm^-1: min {}", min, max, lo);
        return Ok(());
    };

    let mut writer = csv::Writer::from_path(&output)
        .with_context(|| format!("Failed to create {}", output.display()))?;
    writer.write_record(["Nu (cm^-1)", "Transmission"])?;
    for &nu in grid.iter() {
        writer.write_record([nu.to_string(), coeffs.transmission(nu).to_string()])?;
    }
    writer.flush()?;

    info!("Wrote {} ({} points)", output.display(), grid.len());
    Ok(())
}
