//! Error taxonomy for LXB conversion.
//!
//! Nothing is retried or recovered: every error aborts the run and surfaces to
//! the caller.

use std::path::PathBuf;

use crate::fcs::FcsError;

/// Errors that turn one file's raw content into a failed event table
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The file could not be read or is not a valid FCS/LXB file
    #[error("Format error: {0}")]
    Format(#[from] FcsError),

    /// The source declared zero channels
    #[error("Channel count must be non-zero")]
    NoChannels,

    /// Flat event buffer cannot be reshaped into whole events
    #[error("Event buffer of {len} values is not divisible by {channels} channels")]
    UnevenEvents {
        /// Number of values in the flat buffer
        len: usize,
        /// Declared channel count
        channels: usize,
    },

    /// Channel dictionary key is not a positive integer
    #[error("Invalid channel index: {0:?}")]
    InvalidChannelIndex(String),

    /// Two channel dictionary keys resolve to the same index
    #[error("Duplicate channel index: {0}")]
    DuplicateChannelIndex(usize),

    /// Resolved channel list and decoded matrix disagree on the column count
    #[error("Channel metadata describes {mappings} channels but the event matrix has {columns} columns")]
    ColumnMismatch {
        /// Number of resolved channel mappings
        mappings: usize,
        /// Number of matrix columns
        columns: usize,
    },
}

/// Errors deriving a well identifier from a file name
#[derive(Debug, thiserror::Error)]
pub enum NamingError {
    /// File name missing or not valid UTF-8
    #[error("File name is not valid UTF-8: {}", .0.display())]
    InvalidFileName(PathBuf),

    /// No `_<well>` segment in the file name
    #[error("No well identifier in file name {0:?} (expected <name>_<well>.<ext>)")]
    MissingWell(String),
}

/// Errors writing the output table
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    /// I/O error during file operations
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// CSV serialization error
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Finished temp file could not be moved onto the destination
    #[error("Failed to persist output file: {0}")]
    PersistError(#[from] tempfile::PersistError),
}

/// Top-level error for directory conversion
#[derive(Debug, thiserror::Error)]
pub enum LxbError {
    /// Input path is not an existing, listable directory
    #[error("Invalid input directory {}: {reason}", .path.display())]
    Input {
        /// Offending path
        path: PathBuf,
        /// Why it was rejected
        reason: String,
    },

    /// A well file could not be decoded
    #[error("Failed to decode {}: {source}", .path.display())]
    Decode {
        /// File being decoded
        path: PathBuf,
        /// Underlying decode failure
        #[source]
        source: DecodeError,
    },

    /// A well file name carries no well identifier
    #[error("Naming error: {0}")]
    Naming(#[from] NamingError),

    /// Output could not be written
    #[error("Output error: {0}")]
    Output(#[from] OutputError),
}

impl LxbError {
    pub(crate) fn decode(path: impl Into<PathBuf>, source: impl Into<DecodeError>) -> Self {
        LxbError::Decode {
            path: path.into(),
            source: source.into(),
        }
    }
}
