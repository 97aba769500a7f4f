use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};

use super::Dataset;
use crate::config::{ConversionConfig, EntryPolicy};
use crate::error::LxbError;
use crate::table::load_well_file;

/// Decode every well file in `dir` and stack the tables.
///
/// Entries are processed in file-name order. The first failure aborts the
/// aggregation; no partial dataset is returned.
pub fn aggregate_directory<P: AsRef<Path>>(
    dir: P,
    config: &ConversionConfig,
) -> Result<Dataset, LxbError> {
    let dir = dir.as_ref();
    let entries = list_well_files(dir, config)?;

    let mut dataset = Dataset::new();
    for path in &entries {
        dataset.push(load_well_file(path, &config.extension)?);
    }

    info!(
        "Aggregated {} files from {}: {} rows, {} columns",
        dataset.table_count(),
        dir.display(),
        dataset.row_count(),
        dataset.columns().len()
    );
    Ok(dataset)
}

/// Directory entries to decode, sorted by file name.
///
/// Under [`EntryPolicy::Skip`], entries that are not regular files or lack the
/// configured extension are dropped with a warning.
pub fn list_well_files(dir: &Path, config: &ConversionConfig) -> Result<Vec<PathBuf>, LxbError> {
    if !dir.is_dir() {
        return Err(LxbError::Input {
            path: dir.to_path_buf(),
            reason: "not an existing directory".to_string(),
        });
    }

    let input_error = |e: std::io::Error| LxbError::Input {
        path: dir.to_path_buf(),
        reason: e.to_string(),
    };

    let mut paths = fs::read_dir(dir)
        .map_err(input_error)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(input_error)?;
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    if config.entry_policy == EntryPolicy::Error {
        return Ok(paths);
    }

    Ok(paths
        .into_iter()
        .filter(|path| {
            let is_well_file = path.is_file()
                && path
                    .file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| config.matches_extension(name));
            if !is_well_file {
                warn!("Skipping non-well entry {}", path.display());
            }
            is_well_file
        })
        .collect())
}
