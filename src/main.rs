//! # lxb-convert
//!
//! Command-line converter from Luminex LXB plate directories to CSV.
//!
//! ## Usage
//!
//! ```bash
//! # Convert a plate directory (writes luminex_data.csv)
//! lxb-convert convert plate_01/
//!
//! # Choose the output path
//! lxb-convert convert plate_01/ plate_01.csv
//!
//! # Inspect a single well file
//! lxb-convert info plate_01/plate_01_A01.lxb
//!
//! # Generate a synthetic plate
//! lxb-convert demo demo_plate/
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
