//! The seam between binary decoders and table assembly.

use crate::channels::ChannelMetadata;

/// Anything that can supply a file's raw events and channel metadata.
///
/// [`crate::fcs::FcsFile`] is the built-in implementation; alternative decoders
/// plug in here without touching the resolver or table assembly.
pub trait RawEventSource {
    /// Declared number of acquisition channels
    fn channel_count(&self) -> usize;

    /// All event values, row-major (event by event, channel by channel)
    fn events(&self) -> &[f64];

    /// Channel metadata dictionary keyed by 1-based channel index
    fn channels(&self) -> &ChannelMetadata;
}

/// In-memory event source
#[derive(Debug, Clone, Default)]
pub struct MemoryEventSource {
    /// Declared channel count
    pub channel_count: usize,
    /// Flat row-major event buffer
    pub events: Vec<f64>,
    /// Channel metadata dictionary
    pub channels: ChannelMetadata,
}

impl RawEventSource for MemoryEventSource {
    fn channel_count(&self) -> usize {
        self.channel_count
    }

    fn events(&self) -> &[f64] {
        &self.events
    }

    fn channels(&self) -> &ChannelMetadata {
        &self.channels
    }
}
