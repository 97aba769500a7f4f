//! # Plate Dataset
//!
//! Stacks the per-well [`EventTable`](crate::table::EventTable)s of a plate
//! directory and writes them as one CSV:
//!
//! ```text
//! IL-6,TNF,,,Well
//! 5123.0,80.0,12.0,2.0,A01
//! 4870.0,92.0,11.0,2.0,A01
//! ...
//! ```
//!
//! - [`aggregate_directory`]: decode every well file of a directory (fail-fast)
//! - [`Dataset`]: row-wise concatenation with column union
//! - [`write_csv`]: atomic delimited-text output

mod aggregate;
mod stats;
mod types;
mod writer;


pub use aggregate::{aggregate_directory, list_well_files};
pub use stats::ConversionStats;
pub use types::{ColumnKey, Dataset, DatasetRow};
pub use writer::{format_value, write_csv, write_to, CsvOptions};
