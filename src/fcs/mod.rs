//! # FCS / LXB Decoder
//!
//! Luminex `.lxb` files are FCS 3.0 list-mode files. This module decodes the
//! parts the conversion needs:
//!
//! ```text
//! ┌────────────┬──────────────────────────┬──────────────────────────────┐
//! │ HEADER     │ TEXT                     │ DATA                         │
//! │ 58 bytes   │ /$PAR/3/$P1N/CL1/...     │ event 1: ch1 ch2 ch3, ...    │
//! └────────────┴──────────────────────────┴──────────────────────────────┘
//! ```
//!
//! - [`FcsHeader`]: version tag and segment offsets
//! - [`Keywords`]: the TEXT keyword dictionary
//! - [`DataLayout`]: `$DATATYPE`/`$BYTEORD`/`$PnB` driven value decoding
//! - [`FcsFile`]: a fully decoded file, usable as a [`RawEventSource`]
//! - [`FcsWriter`]: synthetic file generation
//!
//! The ANALYSIS segment and chained data sets (`$NEXTDATA`) are not read.

mod data;
mod error;
mod header;
mod text;
mod writer;


pub use data::{ByteOrder, ChannelLayout, DataLayout, DataType};
pub use error::FcsError;
pub use header::{FcsHeader, FcsVersion, Segment, HEADER_LEN};
pub use text::{parameter_key, Keywords};
pub use writer::FcsWriter;

use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::{debug, warn};

use crate::channels::{ChannelKeywords, ChannelMetadata};
use crate::source::RawEventSource;

/// A decoded FCS/LXB file held entirely in memory
#[derive(Debug, Clone)]
pub struct FcsFile {
    header: FcsHeader,
    keywords: Keywords,
    layout: DataLayout,
    channels: ChannelMetadata,
    events: Vec<f64>,
}

impl FcsFile {
    /// Read and decode a file.
    ///
    /// The file handle is released before decoding starts.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, FcsError> {
        let bytes = {
            let mut file = File::open(path.as_ref())?;
            let mut bytes = Vec::new();
            file.read_to_end(&mut bytes)?;
            bytes
        };
        Self::from_bytes(&bytes)
    }

    /// Decode a complete file image
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FcsError> {
        let header = FcsHeader::parse(bytes)?;

        let text_range = header.text.byte_range("TEXT", bytes.len())?;
        if text_range.is_empty() {
            return Err(FcsError::InvalidText("TEXT segment is empty".to_string()));
        }
        let keywords = Keywords::parse(&bytes[text_range])?;

        if let Some(mode) = keywords.get("$MODE") {
            if !mode.trim().eq_ignore_ascii_case("L") {
                return Err(FcsError::UnsupportedMode(mode.to_string()));
            }
        }
        if let Some(next) = keywords.parse_opt::<u64>("$NEXTDATA").ok().flatten() {
            if next != 0 {
                debug!("Ignoring chained data set at offset {}", next);
            }
        }

        let par: usize = keywords.parse_required("$PAR")?;
        let channels = channel_metadata(&keywords, par)?;
        let layout = DataLayout::from_keywords(&keywords, par)?;

        let data_segment = data_segment(&header, &keywords)?;
        let data_range = data_segment.byte_range("DATA", bytes.len())?;
        let events = layout.decode(&bytes[data_range])?;

        let file = Self {
            header,
            keywords,
            layout,
            channels,
            events,
        };
        file.check_reported_total();
        Ok(file)
    }

    /// Parsed HEADER segment
    pub fn header(&self) -> &FcsHeader {
        &self.header
    }

    /// Declared FCS version
    pub fn version(&self) -> FcsVersion {
        self.header.version
    }

    /// Full TEXT keyword dictionary
    pub fn keywords(&self) -> &Keywords {
        &self.keywords
    }

    /// DATA segment layout
    pub fn layout(&self) -> &DataLayout {
        &self.layout
    }

    /// Number of complete events in the decoded buffer
    pub fn event_count(&self) -> usize {
        match self.layout.channels.len() {
            0 => 0,
            par => self.events.len() / par,
        }
    }

    /// Event count reported by `$TOT`, if present and numeric
    pub fn reported_event_count(&self) -> Option<usize> {
        self.keywords.parse_opt("$TOT").ok().flatten()
    }

    fn check_reported_total(&self) {
        if let Some(total) = self.reported_event_count() {
            if total != self.event_count() {
                warn!(
                    "$TOT reports {} events but the DATA segment holds {}",
                    total,
                    self.event_count()
                );
            }
        }
    }
}

impl RawEventSource for FcsFile {
    fn channel_count(&self) -> usize {
        self.layout.channels.len()
    }

    fn events(&self) -> &[f64] {
        &self.events
    }

    fn channels(&self) -> &ChannelMetadata {
        &self.channels
    }
}

/// DATA offsets from the header, or from `$BEGINDATA`/`$ENDDATA` when the header
/// leaves them unset
fn data_segment(header: &FcsHeader, keywords: &Keywords) -> Result<Segment, FcsError> {
    if !header.data.is_unset() {
        return Ok(header.data);
    }
    Ok(Segment::new(
        keywords.parse_required("$BEGINDATA")?,
        keywords.parse_required("$ENDDATA")?,
    ))
}

/// Channel dictionary keyed by the 1-based channel index, validated here so the
/// resolver never sees a channel without a name
fn channel_metadata(keywords: &Keywords, par: usize) -> Result<ChannelMetadata, FcsError> {
    (1..=par)
        .map(|n| {
            let name_key = parameter_key(n, 'N');
            let name = keywords.require(&name_key)?.to_string();
            let marker = keywords.parameter(n, 'S').map(str::to_string);
            Ok((n.to_string(), ChannelKeywords::new(name, marker)))
        })
        .collect()
}
