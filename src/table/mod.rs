//! # Per-file Event Tables
//!
//! An [`EventTable`] is one well's decoded content: the event matrix, one label
//! per column, and the well identifier taken from the file name.

mod matrix;
mod well;


pub use matrix::EventMatrix;
pub use well::{extract_well_id, well_id_from_path};

use std::path::Path;

use log::info;

use crate::channels::{resolve_channels, ChannelMapping};
use crate::error::{DecodeError, LxbError};
use crate::fcs::FcsFile;
use crate::source::RawEventSource;

/// Labeled events of one well
#[derive(Debug, Clone, PartialEq)]
pub struct EventTable {
    mappings: Vec<ChannelMapping>,
    matrix: EventMatrix,
    well: String,
}

impl EventTable {
    /// Reshape a source's events and label them with its resolved channels.
    ///
    /// The resolved channel count must equal the matrix column count; column `i`
    /// is labeled by the `i`-th channel in index order.
    pub fn from_source<S: RawEventSource + ?Sized>(
        source: &S,
        well: impl Into<String>,
    ) -> Result<Self, DecodeError> {
        let matrix = EventMatrix::from_flat(source.events().to_vec(), source.channel_count())?;
        let mappings = resolve_channels(source.channels())?;

        if mappings.len() != matrix.columns() {
            return Err(DecodeError::ColumnMismatch {
                mappings: mappings.len(),
                columns: matrix.columns(),
            });
        }

        Ok(Self {
            mappings,
            matrix,
            well: well.into(),
        })
    }

    /// Column labels: each channel's marker, empty when the channel has none
    pub fn labels(&self) -> impl Iterator<Item = &str> + '_ {
        self.mappings.iter().map(|m| m.marker.as_str())
    }

    /// Resolved channel mappings in column order
    pub fn mappings(&self) -> &[ChannelMapping] {
        &self.mappings
    }

    /// Event matrix
    pub fn matrix(&self) -> &EventMatrix {
        &self.matrix
    }

    /// Well identifier attached to every row
    pub fn well(&self) -> &str {
        &self.well
    }

    /// Number of events
    pub fn rows(&self) -> usize {
        self.matrix.rows()
    }

    /// Number of channel columns (the well column not included)
    pub fn columns(&self) -> usize {
        self.matrix.columns()
    }
}

/// Decode one well file into an [`EventTable`].
///
/// The well identifier is checked first so badly named files fail before any
/// decoding work.
pub fn load_well_file<P: AsRef<Path>>(path: P, extension: &str) -> Result<EventTable, LxbError> {
    let path = path.as_ref();
    let well = well_id_from_path(path, extension)?;

    let file = FcsFile::open(path).map_err(|e| LxbError::decode(path, e))?;
    let table = EventTable::from_source(&file, well).map_err(|e| LxbError::decode(path, e))?;

    info!(
        "Decoded {} (well {}): {} events x {} channels",
        path.display(),
        table.well(),
        table.rows(),
        table.columns()
    );
    Ok(table)
}
