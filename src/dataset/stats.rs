use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use super::Dataset;

/// Summary of a completed conversion
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionStats {
    /// Number of well files decoded
    pub files: usize,
    /// Number of distinct well identifiers
    pub wells: usize,
    /// Total events (output rows)
    pub events: usize,
    /// Channel columns in the output (well column excluded)
    pub columns: usize,
}

impl From<&Dataset> for ConversionStats {
    fn from(dataset: &Dataset) -> Self {
        let wells: BTreeSet<&str> = dataset.tables().map(|t| t.well()).collect();
        Self {
            files: dataset.table_count(),
            wells: wells.len(),
            events: dataset.row_count(),
            columns: dataset.columns().len(),
        }
    }
}

impl fmt::Display for ConversionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Converted {} files ({} wells): {} events x {} channel columns",
            self.files, self.wells, self.events, self.columns
        )
    }
}
