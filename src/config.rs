//! Conversion settings shared by the library and the CLI.

use serde::Deserialize;

/// Default output file name when none is given
pub const DEFAULT_OUTPUT: &str = "luminex_data.csv";

/// Default name of the well identifier column
pub const DEFAULT_WELL_COLUMN: &str = "Well";

/// Default well file extension
pub const DEFAULT_EXTENSION: &str = "lxb";

/// What to do with directory entries that are not well files
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryPolicy {
    /// Every entry is treated as a well file; anything undecodable aborts the run
    #[default]
    Error,
    /// Entries that are not regular files ending in `.<extension>` are skipped
    Skip,
}

/// Settings for directory aggregation and CSV output
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConversionConfig {
    /// Well file extension, stripped from names when extracting well IDs
    pub extension: String,
    /// Handling of non-well directory entries
    pub entry_policy: EntryPolicy,
    /// Header of the well identifier column
    pub well_column: String,
    /// CSV field delimiter
    pub delimiter: u8,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            extension: DEFAULT_EXTENSION.to_string(),
            entry_policy: EntryPolicy::Error,
            well_column: DEFAULT_WELL_COLUMN.to_string(),
            delimiter: b',',
        }
    }
}

impl ConversionConfig {
    /// Whether `file_name` carries the configured extension
    pub fn matches_extension(&self, file_name: &str) -> bool {
        self.extension.is_empty() || file_name.ends_with(&format!(".{}", self.extension))
    }
}
