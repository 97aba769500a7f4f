/// Errors that can occur while parsing an FCS/LXB file
#[derive(Debug, thiserror::Error)]
pub enum FcsError {
    /// I/O error reading the file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// HEADER segment is malformed
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// Version tag is not one this decoder understands
    #[error("Unsupported FCS version: {0:?}")]
    UnsupportedVersion(String),

    /// TEXT segment is malformed
    #[error("Invalid TEXT segment: {0}")]
    InvalidText(String),

    /// Required keyword is absent
    #[error("Missing required keyword: {0}")]
    MissingKeyword(String),

    /// Keyword value could not be interpreted
    #[error("Invalid value for {key}: {value:?}")]
    InvalidKeyword {
        /// Keyword name
        key: String,
        /// Raw value
        value: String,
    },

    /// `$MODE` other than list mode
    #[error("Unsupported acquisition mode: {0:?} (only list mode 'L' is supported)")]
    UnsupportedMode(String),

    /// `$DATATYPE` not one of I, F, D
    #[error("Unsupported data type: {0:?}")]
    UnsupportedDataType(String),

    /// `$BYTEORD` is neither little- nor big-endian
    #[error("Unsupported byte order: {0:?}")]
    UnsupportedByteOrder(String),

    /// `$PnB` not usable with the declared data type
    #[error("Unsupported bit width {bits} for channel {channel}")]
    UnsupportedBitWidth {
        /// 1-based channel index
        channel: usize,
        /// Declared bit width
        bits: u32,
    },

    /// Segment offsets point outside the file
    #[error("{segment} segment {begin}..={end} lies outside the file ({file_len} bytes)")]
    SegmentOutOfBounds {
        /// Segment name
        segment: &'static str,
        /// First byte offset
        begin: usize,
        /// Last byte offset (inclusive)
        end: usize,
        /// Total file length
        file_len: usize,
    },

    /// DATA segment ends part-way through a value
    #[error("DATA segment truncated at byte {offset}: need {needed} bytes, {remaining} remain")]
    TruncatedData {
        /// Offset inside the DATA segment
        offset: usize,
        /// Bytes needed for the next value
        needed: usize,
        /// Bytes left in the segment
        remaining: usize,
    },
}
