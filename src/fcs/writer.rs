//! Minimal FCS 3.0 list-mode writer.
//!
//! Produces files in the layout Luminex instruments emit: one TEXT segment,
//! one DATA segment and no ANALYSIS segment. Used for synthetic plates and
//! test fixtures.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use super::data::{self, ByteOrder, ChannelLayout, DataLayout, DataType};
use super::header::HEADER_LEN;
use super::text::{parameter_key, Keywords};
use super::FcsError;

const DELIMITER: u8 = b'/';
/// Header offsets are limited to 8 ASCII digits
const MAX_HEADER_OFFSET: usize = 99_999_999;
/// Fixed width for `$BEGINDATA`/`$ENDDATA` so TEXT length does not depend on them
const DATA_OFFSET_WIDTH: usize = 20;

#[derive(Debug, Clone)]
struct ChannelSpec {
    name: String,
    marker: Option<String>,
}

/// Builder-style writer for synthetic FCS/LXB files
#[derive(Debug, Clone)]
pub struct FcsWriter {
    channels: Vec<ChannelSpec>,
    data_type: DataType,
    byte_order: ByteOrder,
    extra: Vec<(String, String)>,
}

impl Default for FcsWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl FcsWriter {
    /// 32-bit little-endian integer data, as written by Luminex instruments
    pub fn new() -> Self {
        Self {
            channels: Vec::new(),
            data_type: DataType::Integer,
            byte_order: ByteOrder::LittleEndian,
            extra: Vec::new(),
        }
    }

    /// Append a channel with its `$PnN` and optional `$PnS`
    pub fn channel(mut self, name: &str, marker: Option<&str>) -> Self {
        self.channels.push(ChannelSpec {
            name: name.to_string(),
            marker: marker.map(str::to_string),
        });
        self
    }

    /// Store values as `F` (32-bit float) or `D` (64-bit float) instead of integers
    pub fn data_type(mut self, data_type: DataType) -> Self {
        self.data_type = data_type;
        self
    }

    /// Byte order of stored values
    pub fn byte_order(mut self, byte_order: ByteOrder) -> Self {
        self.byte_order = byte_order;
        self
    }

    /// Add or override a TEXT keyword
    pub fn keyword(mut self, key: &str, value: &str) -> Self {
        self.extra.push((key.to_string(), value.to_string()));
        self
    }

    /// Number of channels configured
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Encode `events` (flat, row-major) into a complete file image.
    ///
    /// The buffer is written as-is; a length that is not a multiple of the
    /// channel count produces a file with a partial trailing event.
    pub fn to_bytes(&self, events: &[f64]) -> Vec<u8> {
        let bits: u32 = match self.data_type {
            DataType::Double => 64,
            DataType::Integer | DataType::Float => 32,
        };
        let layout = DataLayout {
            data_type: self.data_type,
            byte_order: self.byte_order,
            channels: self
                .channels
                .iter()
                .map(|_| ChannelLayout { bits, mask: None })
                .collect(),
        };
        let data = data::encode(&layout, events);

        let mut keywords = self.keywords(bits, events.len());
        // Placeholder offsets keep the TEXT length fixed while offsets are computed
        keywords.insert("$BEGINDATA", "0".repeat(DATA_OFFSET_WIDTH));
        keywords.insert("$ENDDATA", "0".repeat(DATA_OFFSET_WIDTH));
        let text_len = keywords.to_segment(DELIMITER).len();

        let text_begin = HEADER_LEN;
        let text_end = text_begin + text_len - 1;
        let (data_begin, data_end) = if data.is_empty() {
            (0, 0)
        } else {
            (text_end + 1, text_end + data.len())
        };

        keywords.insert("$BEGINDATA", format!("{:0width$}", data_begin, width = DATA_OFFSET_WIDTH));
        keywords.insert("$ENDDATA", format!("{:0width$}", data_end, width = DATA_OFFSET_WIDTH));
        let text = keywords.to_segment(DELIMITER);

        let header_offset = |offset: usize| if offset > MAX_HEADER_OFFSET { 0 } else { offset };
        let header = format!(
            "FCS3.0    {:>8}{:>8}{:>8}{:>8}{:>8}{:>8}",
            header_offset(text_begin),
            header_offset(text_end),
            header_offset(data_begin),
            header_offset(data_end),
            0,
            0
        );

        let mut out = Vec::with_capacity(HEADER_LEN + text.len() + data.len());
        out.extend_from_slice(header.as_bytes());
        out.extend_from_slice(&text);
        out.extend_from_slice(&data);
        out
    }

    /// Write `events` to `path`
    pub fn write<P: AsRef<Path>>(&self, path: P, events: &[f64]) -> Result<(), FcsError> {
        let mut file = File::create(path)?;
        file.write_all(&self.to_bytes(events))?;
        file.flush()?;
        Ok(())
    }

    fn keywords(&self, bits: u32, value_count: usize) -> Keywords {
        let par = self.channels.len();
        let mut keywords = Keywords::default();
        keywords.insert("$PAR", par.to_string());
        keywords.insert("$TOT", (value_count / par.max(1)).to_string());
        keywords.insert("$MODE", "L");
        keywords.insert("$DATATYPE", self.data_type.keyword());
        keywords.insert("$BYTEORD", self.byte_order.keyword((bits / 8) as usize));
        keywords.insert("$NEXTDATA", "0");

        for (i, channel) in self.channels.iter().enumerate() {
            let n = i + 1;
            keywords.insert(&parameter_key(n, 'N'), channel.name.clone());
            keywords.insert(&parameter_key(n, 'B'), bits.to_string());
            keywords.insert(&parameter_key(n, 'E'), "0,0");
            if self.data_type == DataType::Integer {
                keywords.insert(&parameter_key(n, 'R'), (1u64 << bits).to_string());
            }
            if let Some(marker) = &channel.marker {
                keywords.insert(&parameter_key(n, 'S'), marker.clone());
            }
        }

        for (key, value) in &self.extra {
            keywords.insert(key, value.clone());
        }
        keywords
    }
}
