//! Channel metadata and the channel mapping resolver.
//!
//! Decoders expose channel metadata as a dictionary keyed by the string-encoded
//! 1-based channel index. Dictionary iteration order says nothing about
//! acquisition order, so [`resolve_channels`] sorts by the parsed index before
//! emitting labels. Column `i` of the event matrix is labeled by entry `i` of the
//! resolved list.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::DecodeError;

/// Raw per-channel fields from the metadata dictionary (`PnN`, `PnS`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelKeywords {
    /// Short channel name (`PnN`)
    pub pnn: String,
    /// Biological marker name (`PnS`), absent for size/time channels
    pub pns: Option<String>,
}

impl ChannelKeywords {
    /// Create channel fields from a name and optional marker
    pub fn new(pnn: impl Into<String>, pns: Option<String>) -> Self {
        Self {
            pnn: pnn.into(),
            pns,
        }
    }
}

/// Channel metadata dictionary: string-encoded channel index to channel fields
pub type ChannelMetadata = HashMap<String, ChannelKeywords>;

/// One channel with its parsed index
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelDescriptor {
    /// 1-based position declared by the instrument
    pub index: usize,
    /// `PnN`
    pub name: String,
    /// `PnS`
    pub marker: Option<String>,
}

/// Normalized labels for one channel, in resolved column order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelMapping {
    /// `PnN` with underscores replaced by hyphens
    pub channel: String,
    /// `PnS` with underscores replaced by hyphens, or empty when absent
    pub marker: String,
}

impl From<&ChannelDescriptor> for ChannelMapping {
    fn from(descriptor: &ChannelDescriptor) -> Self {
        Self {
            channel: normalize_label(&descriptor.name),
            marker: descriptor
                .marker
                .as_deref()
                .map(normalize_label)
                .unwrap_or_default(),
        }
    }
}

/// Replace underscores with hyphens
pub fn normalize_label(label: &str) -> String {
    label.replace('_', "-")
}

/// Parse dictionary keys and sort channels by index.
///
/// Keys must be positive integers; two keys naming the same index (`"1"` and
/// `"01"`) are rejected rather than silently ordered.
pub fn sorted_descriptors(metadata: &ChannelMetadata) -> Result<Vec<ChannelDescriptor>, DecodeError> {
    let mut descriptors = metadata
        .iter()
        .map(|(key, fields)| {
            let index = parse_index(key)?;
            Ok(ChannelDescriptor {
                index,
                name: fields.pnn.clone(),
                marker: fields.pns.clone(),
            })
        })
        .collect::<Result<Vec<_>, DecodeError>>()?;

    descriptors.sort_by_key(|d| d.index);

    if let Some(pair) = descriptors.windows(2).find(|w| w[0].index == w[1].index) {
        return Err(DecodeError::DuplicateChannelIndex(pair[0].index));
    }

    Ok(descriptors)
}

/// Resolve the metadata dictionary into column-ordered channel mappings
pub fn resolve_channels(metadata: &ChannelMetadata) -> Result<Vec<ChannelMapping>, DecodeError> {
    Ok(sorted_descriptors(metadata)?
        .iter()
        .map(ChannelMapping::from)
        .collect())
}

fn parse_index(key: &str) -> Result<usize, DecodeError> {
    match key.trim().parse::<usize>() {
        Ok(index) if index > 0 => Ok(index),
        _ => Err(DecodeError::InvalidChannelIndex(key.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata(entries: &[(&str, &str, Option<&str>)]) -> ChannelMetadata {
        entries
            .iter()
            .map(|(key, pnn, pns)| {
                (
                    key.to_string(),
                    ChannelKeywords::new(*pnn, pns.map(str::to_string)),
                )
            })
            .collect()
    }

    #[test]
    fn test_resolve_sorts_numerically() {
        let meta = metadata(&[
            ("10", "CL2", None),
            ("2", "RP1", Some("IL_6")),
            ("1", "FSC_A", None),
        ]);
        let mappings = resolve_channels(&meta).unwrap();

        let channels: Vec<_> = mappings.iter().map(|m| m.channel.as_str()).collect();
        assert_eq!(channels, vec!["FSC-A", "RP1", "CL2"]);
        assert_eq!(mappings[1].marker, "IL-6");
    }

    #[test]
    fn test_missing_marker_is_empty() {
        let meta = metadata(&[("1", "FL1", Some("CD4")), ("2", "FL2", None)]);
        let mappings = resolve_channels(&meta).unwrap();

        assert_eq!(
            mappings,
            vec![
                ChannelMapping {
                    channel: "FL1".to_string(),
                    marker: "CD4".to_string(),
                },
                ChannelMapping {
                    channel: "FL2".to_string(),
                    marker: String::new(),
                },
            ]
        );
    }

    #[test]
    fn test_invalid_index() {
        for key in ["x", "0", "-1", ""] {
            let meta = metadata(&[(key, "FL1", None)]);
            assert!(
                matches!(resolve_channels(&meta), Err(DecodeError::InvalidChannelIndex(_))),
                "key {:?} should be rejected",
                key
            );
        }
    }

    #[test]
    fn test_duplicate_index() {
        let meta = metadata(&[("1", "FL1", None), ("01", "FL2", None)]);
        assert!(matches!(
            resolve_channels(&meta),
            Err(DecodeError::DuplicateChannelIndex(1))
        ));
    }

    #[test]
    fn test_descriptors_keep_raw_names() {
        let meta = metadata(&[("1", "FSC_A", Some("bead_id"))]);
        let descriptors = sorted_descriptors(&meta).unwrap();
        assert_eq!(descriptors[0].index, 1);
        assert_eq!(descriptors[0].name, "FSC_A");
        assert_eq!(descriptors[0].marker.as_deref(), Some("bead_id"));
    }

    #[test]
    fn test_empty_metadata() {
        assert!(resolve_channels(&ChannelMetadata::new()).unwrap().is_empty());
    }
}
