use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use qclas::etalon::EtalonParams;

mod config;
mod das;
mod etalon;
mod report;
mod wms;

/// qclas - Laser absorption spectra synthesis (DAS and WMS)
#[derive(Parser)]
#[command(name = "qclas")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute direct absorption spectra from a TOML run file
    Das {
        /// Run configuration (TOML)
        #[arg(value_name = "CONFIG")]
        config: PathBuf,

        /// Output CSV path (overrides computation.output)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Quantity: coefficient, absorbance or transmission
        #[arg(short, long)]
        mode: Option<String>,
    },

    /// Compute WMS harmonic signals from a TOML run file
    Wms {
        /// Run configuration (TOML)
        #[arg(value_name = "CONFIG")]
        config: PathBuf,

        /// Output CSV path (overrides computation.output)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Model: theoretical or simulation
        #[arg(short, long)]
        method: Option<String>,

        /// Harmonic order (1f, 2f, ...)
        #[arg(short = 'n', long)]
        harmonic: Option<u32>,
    },

    /// Fabry-Perot coefficients of one optical part
    Etalon {
        /// Refractive index
        #[arg(short = 'n', long)]
        refractive_index: f64,

        /// Thickness in cm
        #[arg(short = 'l', long)]
        thickness: f64,

        /// Surface reflectance in [0, 1)
        #[arg(short = 'R', long)]
        reflectance: f64,

        /// Angle of incidence in degrees
        #[arg(short = 't', long, default_value_t = 0.0)]
        angle: f64,

        /// Evaluate the transmission on MIN MAX POINTS
        #[arg(long, num_args = 3, value_names = ["MIN", "MAX", "POINTS"])]
        grid: Option<Vec<f64>>,

        /// Output CSV path for the transmission
        #[arg(short, long, value_name = "FILE", requires = "grid")]
        output: Option<PathBuf>,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Das {
            config,
            output,
            mode,
        } => das::run(config, output, mode),
        Commands::Wms {
            config,
            output,
            method,
            harmonic,
        } => wms::run(config, output, method, harmonic),
        Commands::Etalon {
            refractive_index,
            thickness,
            reflectance,
            angle,
            grid,
            output,
        } => {
            let params = EtalonParams {
                refractive_index,
                incidence_angle_deg: angle,
                thickness_cm: thickness,
                reflectance,
            };
            let grid = match grid.as_deref() {
                Some(&[min, max, points]) => {
                    if !(points >= 2.0 && points.fract() == 0.0) {
                        anyhow::bail!("Grid POINTS must be an integer >= 2, got {}", points);
                    }
                    Some((min, max, points as usize))
                }
                _ => None,
            };
            etalon::run(params, grid, output)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_wms_args() {
        let cli = Cli::try_parse_from([
            "qclas",
            "-vv",
            "wms",
            "run.toml",
            "-m",
            "simulation",
            "-n",
            "1",
        ])
        .unwrap();
        assert_eq!(cli.verbosity(), 2);
        match cli.command {
            Commands::Wms {
                config,
                method,
                harmonic,
                output,
            } => {
                assert_eq!(config, PathBuf::from("run.toml"));
                assert_eq!(method.as_deref(), Some("simulation"));
                assert_eq!(harmonic, Some(1));
                assert!(output.is_none());
            }
            _ => panic!("expected wms subcommand"),
        }
    }

    #[test]
    fn test_parse_etalon_args() {
        let cli = Cli::try_parse_from([
            "qclas", "etalon", "-n", "1.5", "-l", "0.1", "-R", "0.04", "--grid", "1100", "1110",
            "11",
        ])
        .unwrap();
        match cli.command {
            Commands::Etalon {
                refractive_index,
                angle,
                grid,
                ..
            } => {
                assert_eq!(refractive_index, 1.5);
                assert_eq!(angle, 0.0);
                assert_eq!(grid, Some(vec![1100.0, 1110.0, 11.0]));
            }
            _ => panic!("expected etalon subcommand"),
        }
    }

    #[test]
    fn test_etalon_output_requires_grid() {
        let parsed = Cli::try_parse_from([
            "qclas", "etalon", "-n", "1.5", "-l", "0.1", "-R", "0.04", "-o", "t.csv",
        ]);
        assert!(parsed.is_err());
    }
}
