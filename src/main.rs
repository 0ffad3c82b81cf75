//! # qclas
//!
//! Command-line front end for laser absorption spectra synthesis.
//!
//! ## Usage
//!
//! ```bash
//! # Direct absorption spectra from a run file
//! qclas das nh3.toml -o nh3_das.csv
//!
//! # 2f WMS signal, time-domain simulation
//! qclas -v wms nh3.toml -m simulation -n 2 -o nh3_2f.csv
//!
//! # Etalon coefficients of a 1 mm window
//! qclas etalon -n 1.5 -l 0.1 -R 0.04
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
