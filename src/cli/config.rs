//! TOML configuration file support.
//!
//! ```toml
//! # lxb-convert.toml
//! [conversion]
//! extension = "lxb"
//! entry_policy = "skip"
//! well_column = "Well"
//! delimiter = ","
//! ```

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;

use lxbread::config::{ConversionConfig, EntryPolicy};

/// Root configuration structure
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Conversion-specific settings.
    #[serde(default)]
    pub conversion: ConversionSettings,
}

/// Settings for the convert command; unset fields keep their defaults.
#[derive(Debug, Default, Deserialize)]
pub struct ConversionSettings {
    /// Well file extension
    pub extension: Option<String>,

    /// `error` or `skip` for non-well directory entries
    pub entry_policy: Option<EntryPolicy>,

    /// Header of the well identifier column
    pub well_column: Option<String>,

    /// Single ASCII delimiter character
    pub delimiter: Option<String>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }

    /// Apply file settings on top of `base`
    pub fn apply(&self, mut base: ConversionConfig) -> Result<ConversionConfig> {
        let settings = &self.conversion;
        if let Some(extension) = &settings.extension {
            base.extension = extension.trim_start_matches('.').to_string();
        }
        if let Some(policy) = settings.entry_policy {
            base.entry_policy = policy;
        }
        if let Some(well_column) = &settings.well_column {
            base.well_column = well_column.clone();
        }
        if let Some(delimiter) = &settings.delimiter {
            base.delimiter = parse_delimiter(delimiter)?;
        }
        Ok(base)
    }
}

fn parse_delimiter(value: &str) -> Result<u8> {
    let value = if value == "\\t" { "\t" } else { value };
    match value.as_bytes() {
        [byte] if byte.is_ascii() => Ok(*byte),
        _ => bail!("Delimiter must be a single ASCII character, got {:?}", value),
    }
}
