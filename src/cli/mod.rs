use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod config;
mod convert;
mod demo;
mod info;

/// lxb-convert - Luminex LXB plate to CSV converter
#[derive(Parser)]
#[command(name = "lxb-convert")]
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
    /// Convert a directory of LXB well files into one CSV table
    Convert {
        /// Directory holding the plate's well files
        #[arg(value_name = "INPUT_DIR")]
        input: PathBuf,

        /// Output CSV path (defaults to luminex_data.csv)
        #[arg(value_name = "OUTPUT")]
        output: Option<PathBuf>,

        /// Load settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Skip directory entries that are not well files instead of failing
        #[arg(long)]
        skip_non_well: bool,

        /// Well file extension (default: lxb)
        #[arg(long, value_name = "EXT")]
        extension: Option<String>,

        /// Header of the well identifier column (default: Well)
        #[arg(long, value_name = "NAME")]
        well_column: Option<String>,
    },

    /// Display header, channel and keyword information for one well file
    Info {
        /// Input LXB file path
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Also list every TEXT keyword
        #[arg(long)]
        keywords: bool,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate a synthetic plate of LXB files for testing
    Demo {
        /// Output directory
        #[arg(value_name = "OUTPUT_DIR", default_value = "demo_plate")]
        output: PathBuf,

        /// Number of wells to generate
        #[arg(short = 'w', long, default_value = "12")]
        wells: usize,

        /// Events per well
        #[arg(short = 'e', long, default_value = "500")]
        events: usize,
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
        Commands::Convert {
            input,
            output,
            config,
            skip_non_well,
            extension,
            well_column,
        } => convert::run(
            input,
            output,
            config,
            skip_non_well,
            extension,
            well_column,
        ),
        Commands::Info {
            file,
            keywords,
            json,
        } => info::run(file, keywords, json),
        Commands::Demo {
            output,
            wells,
            events,
        } => demo::run(output, wells, events),
    }
}
