//! Error types for band and frequency table handling

use thiserror::Error;

/// Errors that can occur while building frequency tables or decoding bands
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChannelError {
    /// Band bitmask has bits outside 2.4 GHz / 5 GHz / DFS
    #[error("invalid band bitmask: 0x{0:02X}")]
    InvalidBand(u32),

    /// A frequency was listed in more than one sub-band
    #[error("frequency {0} MHz appears in more than one sub-band")]
    OverlappingBands(u32),

    /// Frequency has no 802.11 channel number
    #[error("no channel number for frequency {0} MHz")]
    UnknownFrequency(u32),
}
