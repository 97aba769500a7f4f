//! FCS HEADER segment.
//!
//! The first 58 bytes of every file: a 6-byte version tag, four spaces and six
//! right-justified ASCII offsets (TEXT, DATA and ANALYSIS begin/end).

use std::fmt;
use std::ops::Range;

use super::FcsError;

/// Length of the fixed HEADER segment
pub const HEADER_LEN: usize = 58;

const OFFSET_WIDTH: usize = 8;

/// FCS standard revision declared in the header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FcsVersion {
    /// FCS 2.0
    Fcs2_0,
    /// FCS 3.0 (Luminex LXB files)
    Fcs3_0,
    /// FCS 3.1
    Fcs3_1,
    /// FCS 3.2
    Fcs3_2,
}

impl FcsVersion {
    /// Parse the 6-byte version tag
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "FCS2.0" => Some(FcsVersion::Fcs2_0),
            "FCS3.0" => Some(FcsVersion::Fcs3_0),
            "FCS3.1" => Some(FcsVersion::Fcs3_1),
            "FCS3.2" => Some(FcsVersion::Fcs3_2),
            _ => None,
        }
    }

    /// The version tag as written in the header
    pub fn tag(&self) -> &'static str {
        match self {
            FcsVersion::Fcs2_0 => "FCS2.0",
            FcsVersion::Fcs3_0 => "FCS3.0",
            FcsVersion::Fcs3_1 => "FCS3.1",
            FcsVersion::Fcs3_2 => "FCS3.2",
        }
    }
}

impl fmt::Display for FcsVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Inclusive byte span of a segment, as stored in FCS offsets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Segment {
    /// First byte offset
    pub begin: usize,
    /// Last byte offset (inclusive)
    pub end: usize,
}

impl Segment {
    /// Create a segment from inclusive offsets
    pub fn new(begin: usize, end: usize) -> Self {
        Self { begin, end }
    }

    /// Both offsets zero: the segment is absent (or deferred to TEXT keywords)
    pub fn is_unset(&self) -> bool {
        self.begin == 0 && self.end == 0
    }

    /// Resolve to a half-open byte range, checked against the file length.
    ///
    /// Unset segments and segments whose end precedes their begin are empty.
    pub fn byte_range(
        &self,
        name: &'static str,
        file_len: usize,
    ) -> Result<Range<usize>, FcsError> {
        if self.is_unset() {
            return Ok(0..0);
        }
        if self.end < self.begin {
            if self.begin > file_len {
                return Err(self.out_of_bounds(name, file_len));
            }
            return Ok(self.begin..self.begin);
        }
        if self.end >= file_len {
            return Err(self.out_of_bounds(name, file_len));
        }
        Ok(self.begin..self.end + 1)
    }

    fn out_of_bounds(&self, segment: &'static str, file_len: usize) -> FcsError {
        FcsError::SegmentOutOfBounds {
            segment,
            begin: self.begin,
            end: self.end,
            file_len,
        }
    }
}

/// Parsed HEADER segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FcsHeader {
    /// Declared FCS version
    pub version: FcsVersion,
    /// TEXT segment span
    pub text: Segment,
    /// DATA segment span (unset for files over 99,999,999 bytes)
    pub data: Segment,
    /// ANALYSIS segment span
    pub analysis: Segment,
}

impl FcsHeader {
    /// Parse the header from the start of a file
    pub fn parse(bytes: &[u8]) -> Result<Self, FcsError> {
        if bytes.len() < HEADER_LEN {
            return Err(FcsError::InvalidHeader(format!(
                "file is {} bytes, header needs {}",
                bytes.len(),
                HEADER_LEN
            )));
        }

        let tag = String::from_utf8_lossy(&bytes[0..6]);
        let version = FcsVersion::from_tag(&tag)
            .ok_or_else(|| FcsError::UnsupportedVersion(tag.to_string()))?;

        let offsets = bytes[10..HEADER_LEN]
            .chunks_exact(OFFSET_WIDTH)
            .map(parse_offset)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            version,
            text: Segment::new(offsets[0], offsets[1]),
            data: Segment::new(offsets[2], offsets[3]),
            analysis: Segment::new(offsets[4], offsets[5]),
        })
    }
}

/// Blank offset fields read as zero
fn parse_offset(field: &[u8]) -> Result<usize, FcsError> {
    let text = std::str::from_utf8(field)
        .map_err(|_| FcsError::InvalidHeader("offset field is not ASCII".to_string()))?
        .trim();
    if text.is_empty() {
        return Ok(0);
    }
    text.parse()
        .map_err(|_| FcsError::InvalidHeader(format!("invalid offset {:?}", text)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(text: &str) -> Vec<u8> {
        let mut bytes = text.as_bytes().to_vec();
        bytes.resize(HEADER_LEN, b' ');
        bytes
    }

    #[test]
    fn test_parse_header() {
        let bytes = header("FCS3.0          58     300     301    1500       0       0");
        let header = FcsHeader::parse(&bytes).unwrap();

        assert_eq!(header.version, FcsVersion::Fcs3_0);
        assert_eq!(header.text, Segment::new(58, 300));
        assert_eq!(header.data, Segment::new(301, 1500));
        assert!(header.analysis.is_unset());
    }

    #[test]
    fn test_blank_offsets_are_zero() {
        let bytes = header("FCS3.1          58     300                                ");
        let header = FcsHeader::parse(&bytes).unwrap();
        assert!(header.data.is_unset());
    }

    #[test]
    fn test_rejects_short_and_unknown() {
        assert!(matches!(
            FcsHeader::parse(b"FCS3.0"),
            Err(FcsError::InvalidHeader(_))
        ));
        let bytes = header("NOTFCS          58     300     301    1500       0       0");
        assert!(matches!(
            FcsHeader::parse(&bytes),
            Err(FcsError::UnsupportedVersion(_))
        ));
        let bytes = header("FCS3.0          58     3x0     301    1500       0       0");
        assert!(matches!(
            FcsHeader::parse(&bytes),
            Err(FcsError::InvalidHeader(_))
        ));
    }

    #[test]
    fn test_segment_byte_range() {
        assert_eq!(Segment::new(10, 19).byte_range("DATA", 20).unwrap(), 10..20);
        assert_eq!(Segment::new(0, 0).byte_range("DATA", 20).unwrap(), 0..0);
        assert_eq!(Segment::new(15, 14).byte_range("DATA", 20).unwrap(), 15..15);
        assert!(matches!(
            Segment::new(10, 20).byte_range("DATA", 20),
            Err(FcsError::SegmentOutOfBounds { segment: "DATA", .. })
        ));
    }
}
