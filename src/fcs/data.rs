//! DATA segment decoding.
//!
//! List-mode data is a sequence of events, each holding one value per channel in
//! channel order. Values are widened to `f64` and returned as one flat row-major
//! buffer.

use std::io::Cursor;

use byteorder::{BigEndian, ByteOrder as _, LittleEndian, ReadBytesExt};

use super::text::{parameter_key, Keywords};
use super::FcsError;

/// `$DATATYPE` values this decoder supports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    /// Unsigned binary integers (`I`)
    Integer,
    /// 32-bit IEEE floats (`F`)
    Float,
    /// 64-bit IEEE floats (`D`)
    Double,
}

impl DataType {
    /// Parse a `$DATATYPE` value
    pub fn from_keyword(value: &str) -> Result<Self, FcsError> {
        match value.trim().to_ascii_uppercase().as_str() {
            "I" => Ok(DataType::Integer),
            "F" => Ok(DataType::Float),
            "D" => Ok(DataType::Double),
            _ => Err(FcsError::UnsupportedDataType(value.to_string())),
        }
    }

    /// The `$DATATYPE` letter
    pub fn keyword(&self) -> &'static str {
        match self {
            DataType::Integer => "I",
            DataType::Float => "F",
            DataType::Double => "D",
        }
    }
}

/// `$BYTEORD` reduced to the two orders found in practice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    /// `1,2,3,4`
    LittleEndian,
    /// `4,3,2,1`
    BigEndian,
}

impl ByteOrder {
    /// Parse a `$BYTEORD` value
    pub fn from_keyword(value: &str) -> Result<Self, FcsError> {
        let unsupported = || FcsError::UnsupportedByteOrder(value.to_string());

        let order = value
            .split(',')
            .map(|part| part.trim().parse::<usize>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| unsupported())?;

        let ascending = order.iter().enumerate().all(|(i, &b)| b == i + 1);
        let descending = order
            .iter()
            .enumerate()
            .all(|(i, &b)| b == order.len() - i);

        if order.is_empty() {
            Err(unsupported())
        } else if ascending {
            Ok(ByteOrder::LittleEndian)
        } else if descending {
            Ok(ByteOrder::BigEndian)
        } else {
            Err(unsupported())
        }
    }

    /// `$BYTEORD` value for a value width of `bytes`
    pub fn keyword(&self, bytes: usize) -> String {
        let order: Vec<String> = match self {
            ByteOrder::LittleEndian => (1..=bytes).map(|b| b.to_string()).collect(),
            ByteOrder::BigEndian => (1..=bytes).rev().map(|b| b.to_string()).collect(),
        };
        order.join(",")
    }
}

/// Storage of one channel's values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelLayout {
    /// `$PnB`
    pub bits: u32,
    /// Low-bit mask derived from `$PnR` (integer data only)
    pub mask: Option<u64>,
}

impl ChannelLayout {
    fn width(&self) -> usize {
        (self.bits / 8) as usize
    }
}

/// Everything needed to decode a DATA segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataLayout {
    /// Value representation
    pub data_type: DataType,
    /// Byte order of multi-byte values
    pub byte_order: ByteOrder,
    /// Per-channel storage, in channel order
    pub channels: Vec<ChannelLayout>,
}

impl DataLayout {
    /// Build the layout from TEXT keywords for `par` channels
    pub fn from_keywords(keywords: &Keywords, par: usize) -> Result<Self, FcsError> {
        let data_type = DataType::from_keyword(keywords.require("$DATATYPE")?)?;
        let byte_order = ByteOrder::from_keyword(keywords.require("$BYTEORD")?)?;

        let channels = (1..=par)
            .map(|n| channel_layout(keywords, n, data_type))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            data_type,
            byte_order,
            channels,
        })
    }

    /// Decode a DATA segment into a flat row-major buffer
    pub fn decode(&self, bytes: &[u8]) -> Result<Vec<f64>, FcsError> {
        match self.byte_order {
            ByteOrder::LittleEndian => self.decode_with::<LittleEndian>(bytes),
            ByteOrder::BigEndian => self.decode_with::<BigEndian>(bytes),
        }
    }

    /// Bytes per event
    pub fn event_width(&self) -> usize {
        self.channels.iter().map(ChannelLayout::width).sum()
    }

    fn decode_with<B: byteorder::ByteOrder>(&self, bytes: &[u8]) -> Result<Vec<f64>, FcsError> {
        if self.channels.is_empty() || bytes.is_empty() {
            return Ok(Vec::new());
        }

        let mut values = Vec::with_capacity(bytes.len() / self.event_width().max(1) * self.channels.len());
        let mut cursor = Cursor::new(bytes);

        for channel in self.channels.iter().cycle() {
            let offset = cursor.position() as usize;
            let remaining = bytes.len() - offset;
            if remaining == 0 {
                break;
            }
            if remaining < channel.width() {
                return Err(FcsError::TruncatedData {
                    offset,
                    needed: channel.width(),
                    remaining,
                });
            }

            let value = match self.data_type {
                DataType::Float => cursor.read_f32::<B>()? as f64,
                DataType::Double => cursor.read_f64::<B>()?,
                DataType::Integer => {
                    let raw = match channel.bits {
                        8 => cursor.read_u8()? as u64,
                        16 => cursor.read_u16::<B>()? as u64,
                        32 => cursor.read_u32::<B>()? as u64,
                        _ => cursor.read_u64::<B>()?,
                    };
                    channel.mask.map_or(raw, |mask| raw & mask) as f64
                }
            };
            values.push(value);
        }

        Ok(values)
    }
}

fn channel_layout(
    keywords: &Keywords,
    n: usize,
    data_type: DataType,
) -> Result<ChannelLayout, FcsError> {
    let bits_key = parameter_key(n, 'B');
    let bits: u32 = keywords.parse_required(&bits_key)?;

    let supported = match data_type {
        DataType::Integer => matches!(bits, 8 | 16 | 32 | 64),
        DataType::Float => bits == 32,
        DataType::Double => bits == 64,
    };
    if !supported {
        return Err(FcsError::UnsupportedBitWidth { channel: n, bits });
    }

    let mask = match data_type {
        DataType::Integer => keywords
            .parameter(n, 'R')
            .and_then(|range| range.trim().parse::<f64>().ok())
            .and_then(|range| range_mask(range, bits)),
        DataType::Float | DataType::Double => None,
    };

    Ok(ChannelLayout { bits, mask })
}

/// Mask for a `$PnR` range narrower than the stored bit width
fn range_mask(range: f64, bits: u32) -> Option<u64> {
    if !range.is_finite() || range < 2.0 || range >= u64::MAX as f64 {
        return None;
    }
    let range = range.ceil() as u64;
    let used = 64 - (range - 1).leading_zeros();
    (used < bits).then(|| (1u64 << used) - 1)
}

/// Encode `values` the way [`DataLayout::decode`] reads them
pub(crate) fn encode(layout: &DataLayout, values: &[f64]) -> Vec<u8> {
    let mut out = Vec::with_capacity(values.len() * 8);
    for (value, channel) in values.iter().zip(layout.channels.iter().cycle()) {
        let mut buf = [0u8; 8];
        let width = match layout.data_type {
            DataType::Float => {
                write_f32(layout.byte_order, &mut buf, *value as f32);
                4
            }
            DataType::Double => {
                write_f64(layout.byte_order, &mut buf, *value);
                8
            }
            DataType::Integer => {
                let raw = value.max(0.0).round() as u64;
                match channel.bits {
                    8 => buf[0] = raw.min(u8::MAX as u64) as u8,
                    16 => write_u16(layout.byte_order, &mut buf, raw.min(u16::MAX as u64) as u16),
                    32 => write_u32(layout.byte_order, &mut buf, raw.min(u32::MAX as u64) as u32),
                    _ => write_u64(layout.byte_order, &mut buf, raw),
                }
                channel.width()
            }
        };
        out.extend_from_slice(&buf[..width]);
    }
    out
}

fn write_f32(order: ByteOrder, buf: &mut [u8], v: f32) {
    match order {
        ByteOrder::LittleEndian => LittleEndian::write_f32(buf, v),
        ByteOrder::BigEndian => BigEndian::write_f32(buf, v),
    }
}

fn write_f64(order: ByteOrder, buf: &mut [u8], v: f64) {
    match order {
        ByteOrder::LittleEndian => LittleEndian::write_f64(buf, v),
        ByteOrder::BigEndian => BigEndian::write_f64(buf, v),
    }
}

fn write_u16(order: ByteOrder, buf: &mut [u8], v: u16) {
    match order {
        ByteOrder::LittleEndian => LittleEndian::write_u16(buf, v),
        ByteOrder::BigEndian => BigEndian::write_u16(buf, v),
    }
}

fn write_u32(order: ByteOrder, buf: &mut [u8], v: u32) {
    match order {
        ByteOrder::LittleEndian => LittleEndian::write_u32(buf, v),
        ByteOrder::BigEndian => BigEndian::write_u32(buf, v),
    }
}

fn write_u64(order: ByteOrder, buf: &mut [u8], v: u64) {
    match order {
        ByteOrder::LittleEndian => LittleEndian::write_u64(buf, v),
        ByteOrder::BigEndian => BigEndian::write_u64(buf, v),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(data_type: DataType, byte_order: ByteOrder, bits: &[u32]) -> DataLayout {
        DataLayout {
            data_type,
            byte_order,
            channels: bits.iter().map(|&bits| ChannelLayout { bits, mask: None }).collect(),
        }
    }

    #[test]
    fn test_byte_order_keywords() {
        assert_eq!(ByteOrder::from_keyword("1,2,3,4").unwrap(), ByteOrder::LittleEndian);
        assert_eq!(ByteOrder::from_keyword("4, 3, 2, 1").unwrap(), ByteOrder::BigEndian);
        assert_eq!(ByteOrder::from_keyword("1,2").unwrap(), ByteOrder::LittleEndian);
        assert!(matches!(
            ByteOrder::from_keyword("3,4,1,2"),
            Err(FcsError::UnsupportedByteOrder(_))
        ));
        assert!(ByteOrder::from_keyword("").is_err());
        assert_eq!(ByteOrder::BigEndian.keyword(4), "4,3,2,1");
    }

    #[test]
    fn test_data_type_keywords() {
        assert_eq!(DataType::from_keyword("i").unwrap(), DataType::Integer);
        assert_eq!(DataType::from_keyword("D").unwrap(), DataType::Double);
        assert!(matches!(
            DataType::from_keyword("A"),
            Err(FcsError::UnsupportedDataType(_))
        ));
    }

    #[test]
    fn test_decode_u32_little_endian() {
        let bytes: Vec<u8> = [7u32, 1_000_000, 42, 0]
            .iter()
            .flat_map(|v| v.to_le_bytes())
            .collect();
        let values = layout(DataType::Integer, ByteOrder::LittleEndian, &[32, 32])
            .decode(&bytes)
            .unwrap();
        assert_eq!(values, vec![7.0, 1_000_000.0, 42.0, 0.0]);
    }

    #[test]
    fn test_decode_f32_big_endian() {
        let bytes: Vec<u8> = [1.5f32, -2.25].iter().flat_map(|v| v.to_be_bytes()).collect();
        let values = layout(DataType::Float, ByteOrder::BigEndian, &[32])
            .decode(&bytes)
            .unwrap();
        assert_eq!(values, vec![1.5, -2.25]);
    }

    #[test]
    fn test_decode_mixed_widths() {
        // One event: u16 then u32
        let mut bytes = 300u16.to_le_bytes().to_vec();
        bytes.extend_from_slice(&70_000u32.to_le_bytes());
        let values = layout(DataType::Integer, ByteOrder::LittleEndian, &[16, 32])
            .decode(&bytes)
            .unwrap();
        assert_eq!(values, vec![300.0, 70_000.0]);
    }

    #[test]
    fn test_truncated_value() {
        let bytes = [1u8, 0, 0, 0, 2, 0];
        let result = layout(DataType::Integer, ByteOrder::LittleEndian, &[32]).decode(&bytes);
        assert!(matches!(
            result,
            Err(FcsError::TruncatedData {
                offset: 4,
                needed: 4,
                remaining: 2
            })
        ));
    }

    #[test]
    fn test_range_mask() {
        assert_eq!(range_mask(1024.0, 32), Some(0x3ff));
        assert_eq!(range_mask(1000.0, 16), Some(0x3ff));
        assert_eq!(range_mask(65536.0, 16), None);
        assert_eq!(range_mask(4_294_967_296.0, 32), None);
        assert_eq!(range_mask(1.0, 32), None);
    }

    #[test]
    fn test_layout_from_keywords_applies_mask() {
        let keywords = Keywords::parse(
            b"/$DATATYPE/I/$BYTEORD/1,2,3,4/$P1B/32/$P1R/1024/$P2B/32/",
        )
        .unwrap();
        let layout = DataLayout::from_keywords(&keywords, 2).unwrap();

        assert_eq!(layout.channels[0].mask, Some(0x3ff));
        assert_eq!(layout.channels[1].mask, None);
        assert_eq!(layout.event_width(), 8);

        let bytes: Vec<u8> = [0x1401u32, 0x1401].iter().flat_map(|v| v.to_le_bytes()).collect();
        assert_eq!(layout.decode(&bytes).unwrap(), vec![1.0, 5121.0]);
    }

    #[test]
    fn test_float_requires_32_bits() {
        let keywords = Keywords::parse(b"/$DATATYPE/F/$BYTEORD/1,2,3,4/$P1B/16/").unwrap();
        assert!(matches!(
            DataLayout::from_keywords(&keywords, 1),
            Err(FcsError::UnsupportedBitWidth { channel: 1, bits: 16 })
        ));
    }

    #[test]
    fn test_encode_matches_decode() {
        let layout = layout(DataType::Integer, ByteOrder::BigEndian, &[16, 32]);
        let values = vec![12.0, 4_000_000.0, 65_535.0, 1.0];
        assert_eq!(layout.decode(&encode(&layout, &values)).unwrap(), values);
    }
}
