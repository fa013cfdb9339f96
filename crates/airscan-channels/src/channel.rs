//! 802.11 channel number conversion

use crate::error::ChannelError;

/// Convert a frequency in MHz to its 802.11 channel number
pub fn frequency_to_channel(frequency: u32) -> Result<u32, ChannelError> {
    match frequency {
        2484 => Ok(14),
        2412..=2472 if (frequency - 2407) % 5 == 0 => Ok((frequency - 2407) / 5),
        5160..=5885 if frequency % 5 == 0 => Ok((frequency - 5000) / 5),
        _ => Err(ChannelError::UnknownFrequency(frequency)),
    }
}

/// Convert an 802.11 channel number to its frequency in MHz
///
/// Channels 1-14 are 2.4 GHz, 32-177 are 5 GHz.
pub fn channel_to_frequency(channel: u32) -> Option<u32> {
    match channel {
        1..=13 => Some(2407 + 5 * channel),
        14 => Some(2484),
        32..=177 => Some(5000 + 5 * channel),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_24ghz_channels() {
        assert_eq!(frequency_to_channel(2412), Ok(1));
        assert_eq!(frequency_to_channel(2437), Ok(6));
        assert_eq!(frequency_to_channel(2484), Ok(14));
        assert_eq!(channel_to_frequency(11), Some(2462));
    }

    #[test]
    fn test_5ghz_channels() {
        assert_eq!(frequency_to_channel(5180), Ok(36));
        assert_eq!(frequency_to_channel(5825), Ok(165));
        assert_eq!(channel_to_frequency(100), Some(5500));
    }

    #[test]
    fn test_unknown_frequency() {
        assert_eq!(
            frequency_to_channel(2400),
            Err(ChannelError::UnknownFrequency(2400))
        );
        assert_eq!(channel_to_frequency(0), None);
        assert_eq!(channel_to_frequency(200), None);
    }
}
