use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use lxbread::config::{ConversionConfig, EntryPolicy, DEFAULT_OUTPUT};
use lxbread::dataset::{aggregate_directory, write_csv, ConversionStats, CsvOptions};

use super::config::Config;

/// Convert a plate directory into one CSV file
pub fn run(
    input: PathBuf,
    output: Option<PathBuf>,
    config_path: Option<PathBuf>,
    skip_non_well: bool,
    extension: Option<String>,
    well_column: Option<String>,
) -> Result<()> {
    // Validate input before touching any file
    if !input.is_dir() {
        anyhow::bail!("{} is not a valid directory", input.display());
    }

    let output = output.unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));

    // Defaults < config file < command-line flags
    let mut config = match &config_path {
        Some(path) => Config::from_file(path)?.apply(ConversionConfig::default())?,
        None => ConversionConfig::default(),
    };
    if skip_non_well {
        config.entry_policy = EntryPolicy::Skip;
    }
    if let Some(extension) = extension {
        config.extension = extension.trim_start_matches('.').to_string();
    }
    if let Some(well_column) = well_column {
        config.well_column = well_column;
    }

    info!("lxb-convert - Luminex LXB to CSV");
    info!("================================");
    info!("Input:  {}", input.display());
    info!("Output: {}", output.display());
    info!("Extension: .{}", config.extension);
    info!("Non-well entries: {:?}", config.entry_policy);

    let dataset = aggregate_directory(&input, &config)
        .with_context(|| format!("Conversion of {} failed", input.display()))?;

    write_csv(&dataset, &output, &CsvOptions::from(&config))
        .with_context(|| format!("Failed to write {}", output.display()))?;

    let stats = ConversionStats::from(&dataset);
    info!("Conversion complete!");
    info!("  {}", stats);
    info!("  Output file: {}", output.display());

    Ok(())
}
