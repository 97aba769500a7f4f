use crate::error::DecodeError;

/// Dense events x channels matrix of fluorescence intensities
#[derive(Debug, Clone, PartialEq)]
pub struct EventMatrix {
    values: Vec<f64>,
    rows: usize,
    columns: usize,
}

impl EventMatrix {
    /// Reshape a flat row-major buffer into `columns` columns.
    ///
    /// Fails when `columns` is zero or the buffer would leave a partial row.
    pub fn from_flat(values: Vec<f64>, columns: usize) -> Result<Self, DecodeError> {
        if columns == 0 {
            return Err(DecodeError::NoChannels);
        }
        if values.len() % columns != 0 {
            return Err(DecodeError::UnevenEvents {
                len: values.len(),
                channels: columns,
            });
        }

        Ok(Self {
            rows: values.len() / columns,
            columns,
            values,
        })
    }

    /// Number of events
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of channels
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Values of one event
    pub fn row(&self, index: usize) -> Option<&[f64]> {
        let start = index.checked_mul(self.columns)?;
        self.values.get(start..start + self.columns)
    }

    /// Single cell
    pub fn get(&self, row: usize, column: usize) -> Option<f64> {
        if column >= self.columns {
            return None;
        }
        self.row(row).map(|r| r[column])
    }

    /// Iterate events in order
    pub fn iter_rows(&self) -> std::slice::ChunksExact<'_, f64> {
        self.values.chunks_exact(self.columns)
    }

    /// The flat row-major buffer
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }
}
