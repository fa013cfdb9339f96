//! WiFi bands and the frequency table that expands them

use std::collections::BTreeSet;

use crate::error::ChannelError;

/// Resolved set of scan frequencies in MHz
pub type FrequencySet = BTreeSet<u32>;

const BAND_24_GHZ_BIT: u32 = 1 << 0;
const BAND_5_GHZ_BIT: u32 = 1 << 1;
const BAND_DFS_BIT: u32 = 1 << 2;

/// A predefined group of radio frequencies
///
/// Encoded as a bitmask of the 2.4 GHz, 5 GHz (non-DFS) and 5 GHz DFS
/// sub-bands. Not every combination is a named band: 2.4 GHz together with
/// DFS-only 5 GHz has no variant and is rejected by [`WifiBand::from_bits`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WifiBand {
    /// No band selected
    #[default]
    Unspecified,
    /// 2.4 GHz
    Band24Ghz,
    /// 5 GHz without DFS channels
    Band5Ghz,
    /// 5 GHz DFS channels only
    Band5GhzDfsOnly,
    /// 5 GHz including DFS channels
    Band5GhzWithDfs,
    /// 2.4 GHz and 5 GHz without DFS channels
    Both,
    /// 2.4 GHz and 5 GHz including DFS channels
    BothWithDfs,
}

impl WifiBand {
    /// All named bands, in bitmask order
    pub const ALL: [WifiBand; 7] = [
        WifiBand::Unspecified,
        WifiBand::Band24Ghz,
        WifiBand::Band5Ghz,
        WifiBand::Both,
        WifiBand::Band5GhzDfsOnly,
        WifiBand::Band5GhzWithDfs,
        WifiBand::BothWithDfs,
    ];

    /// Get the bitmask encoding of this band
    pub fn bits(&self) -> u32 {
        match self {
            WifiBand::Unspecified => 0,
            WifiBand::Band24Ghz => BAND_24_GHZ_BIT,
            WifiBand::Band5Ghz => BAND_5_GHZ_BIT,
            WifiBand::Band5GhzDfsOnly => BAND_DFS_BIT,
            WifiBand::Band5GhzWithDfs => BAND_5_GHZ_BIT | BAND_DFS_BIT,
            WifiBand::Both => BAND_24_GHZ_BIT | BAND_5_GHZ_BIT,
            WifiBand::BothWithDfs => BAND_24_GHZ_BIT | BAND_5_GHZ_BIT | BAND_DFS_BIT,
        }
    }

    /// Decode a band from its bitmask
    pub fn from_bits(bits: u32) -> Result<Self, ChannelError> {
        WifiBand::ALL
            .iter()
            .copied()
            .find(|band| band.bits() == bits)
            .ok_or(ChannelError::InvalidBand(bits))
    }

    /// Check whether every sub-band of `other` is part of this band
    pub fn contains(&self, other: WifiBand) -> bool {
        self.bits() & other.bits() == other.bits()
    }

    /// Get human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            WifiBand::Unspecified => "Unspecified",
            WifiBand::Band24Ghz => "2.4 GHz",
            WifiBand::Band5Ghz => "5 GHz",
            WifiBand::Band5GhzDfsOnly => "5 GHz (DFS only)",
            WifiBand::Band5GhzWithDfs => "5 GHz (with DFS)",
            WifiBand::Both => "2.4 GHz + 5 GHz",
            WifiBand::BothWithDfs => "2.4 GHz + 5 GHz (with DFS)",
        }
    }

    /// Combine two bands
    ///
    /// A combination without a named variant widens to [`WifiBand::BothWithDfs`].
    pub fn union(&self, other: WifiBand) -> WifiBand {
        // The only unnamed combination is 2.4 GHz + DFS
        WifiBand::from_bits(self.bits() | other.bits()).unwrap_or(WifiBand::BothWithDfs)
    }
}

/// Per-band frequency lists used to expand a band into concrete frequencies
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawFrequencyTable"))]
pub struct FrequencyTable {
    band_24_ghz: Vec<u32>,
    band_5_ghz: Vec<u32>,
    band_5_ghz_dfs: Vec<u32>,
}

/// Unchecked wire form of [`FrequencyTable`]
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawFrequencyTable {
    band_24_ghz: Vec<u32>,
    band_5_ghz: Vec<u32>,
    band_5_ghz_dfs: Vec<u32>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawFrequencyTable> for FrequencyTable {
    type Error = ChannelError;

    fn try_from(raw: RawFrequencyTable) -> Result<Self, Self::Error> {
        Self::new(raw.band_24_ghz, raw.band_5_ghz, raw.band_5_ghz_dfs)
    }
}

impl FrequencyTable {
    /// Create a table from explicit sub-band lists
    ///
    /// Duplicates within a list are collapsed; a frequency listed in two
    /// sub-bands is an error.
    pub fn new(
        band_24_ghz: impl IntoIterator<Item = u32>,
        band_5_ghz: impl IntoIterator<Item = u32>,
        band_5_ghz_dfs: impl IntoIterator<Item = u32>,
    ) -> Result<Self, ChannelError> {
        let lists = [
            band_24_ghz.into_iter().collect::<FrequencySet>(),
            band_5_ghz.into_iter().collect::<FrequencySet>(),
            band_5_ghz_dfs.into_iter().collect::<FrequencySet>(),
        ];

        let mut seen = FrequencySet::new();
        for list in &lists {
            for &freq in list {
                if !seen.insert(freq) {
                    return Err(ChannelError::OverlappingBands(freq));
                }
            }
        }

        let [band_24_ghz, band_5_ghz, band_5_ghz_dfs] = lists;
        Ok(Self {
            band_24_ghz: band_24_ghz.into_iter().collect(),
            band_5_ghz: band_5_ghz.into_iter().collect(),
            band_5_ghz_dfs: band_5_ghz_dfs.into_iter().collect(),
        })
    }

    /// World regulatory table (channels 1-13, UNII-1/3 and UNII-2/2e as DFS)
    pub fn standard() -> Self {
        Self {
            band_24_ghz: (1..=13).map(|ch| 2407 + 5 * ch).collect(),
            band_5_ghz: vec![5180, 5200, 5220, 5240, 5745, 5765, 5785, 5805, 5825],
            band_5_ghz_dfs: [5260, 5280, 5300, 5320]
                .into_iter()
                .chain((5500..=5720).step_by(20))
                .collect(),
        }
    }

    /// 2.4 GHz frequencies
    pub fn band_24_ghz(&self) -> &[u32] {
        &self.band_24_ghz
    }

    /// 5 GHz non-DFS frequencies
    pub fn band_5_ghz(&self) -> &[u32] {
        &self.band_5_ghz
    }

    /// 5 GHz DFS frequencies
    pub fn band_5_ghz_dfs(&self) -> &[u32] {
        &self.band_5_ghz_dfs
    }

    /// Expand a band into its frequencies
    pub fn frequencies_for_band(&self, band: WifiBand) -> FrequencySet {
        self.frequencies_for_bits(band.bits())
    }

    pub(crate) fn frequencies_for_bits(&self, bits: u32) -> FrequencySet {
        let mut freqs = FrequencySet::new();
        if bits & BAND_24_GHZ_BIT != 0 {
            freqs.extend(self.band_24_ghz.iter().copied());
        }
        if bits & BAND_5_GHZ_BIT != 0 {
            freqs.extend(self.band_5_ghz.iter().copied());
        }
        if bits & BAND_DFS_BIT != 0 {
            freqs.extend(self.band_5_ghz_dfs.iter().copied());
        }
        freqs
    }

    /// Every frequency in the table
    pub fn all_frequencies(&self) -> FrequencySet {
        self.frequencies_for_band(WifiBand::BothWithDfs)
    }

    /// Find the sub-band a frequency belongs to
    pub fn band_of(&self, frequency: u32) -> Option<WifiBand> {
        if self.band_24_ghz.contains(&frequency) {
            Some(WifiBand::Band24Ghz)
        } else if self.band_5_ghz.contains(&frequency) {
            Some(WifiBand::Band5Ghz)
        } else if self.band_5_ghz_dfs.contains(&frequency) {
            Some(WifiBand::Band5GhzDfsOnly)
        } else {
            None
        }
    }
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_bits_roundtrip() {
        for band in WifiBand::ALL {
            assert_eq!(WifiBand::from_bits(band.bits()), Ok(band));
        }
        assert_eq!(WifiBand::from_bits(5), Err(ChannelError::InvalidBand(5)));
        assert_eq!(WifiBand::from_bits(8), Err(ChannelError::InvalidBand(8)));
    }

    #[test]
    fn test_band_contains_and_union() {
        assert!(WifiBand::BothWithDfs.contains(WifiBand::Band5GhzDfsOnly));
        assert!(WifiBand::Both.contains(WifiBand::Band24Ghz));
        assert!(!WifiBand::Band5Ghz.contains(WifiBand::Band24Ghz));

        assert_eq!(
            WifiBand::Band24Ghz.union(WifiBand::Band5Ghz),
            WifiBand::Both
        );
        assert_eq!(
            WifiBand::Band24Ghz.union(WifiBand::Band5GhzDfsOnly),
            WifiBand::BothWithDfs
        );
    }

    #[test]
    fn test_standard_table_expansion() {
        let table = FrequencyTable::standard();
        let freqs = table.frequencies_for_band(WifiBand::Band24Ghz);
        assert_eq!(freqs.len(), 13);
        assert!(freqs.contains(&2412));
        assert!(freqs.contains(&2472));

        let with_dfs = table.frequencies_for_band(WifiBand::Band5GhzWithDfs);
        assert!(with_dfs.contains(&5180));
        assert!(with_dfs.contains(&5500));
        assert!(!with_dfs.contains(&2412));

        assert!(table.frequencies_for_band(WifiBand::Unspecified).is_empty());
    }

    #[test]
    fn test_overlapping_table_rejected() {
        let result = FrequencyTable::new([2400, 2450], [5150, 2450], []);
        assert_eq!(result, Err(ChannelError::OverlappingBands(2450)));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialized_table_validated() {
        let overlapping = r#"{"band_24_ghz":[2412],"band_5_ghz":[2412],"band_5_ghz_dfs":[]}"#;
        let err = serde_json::from_str::<FrequencyTable>(overlapping).unwrap_err();
        assert!(err.to_string().contains("2412"));

        let table = FrequencyTable::new([2412, 2437], [5180], [5500]).unwrap();
        let json = serde_json::to_string(&table).unwrap();
        assert_eq!(serde_json::from_str::<FrequencyTable>(&json).unwrap(), table);

        let unsorted = r#"{"band_24_ghz":[2437,2412,2437],"band_5_ghz":[],"band_5_ghz_dfs":[]}"#;
        let table: FrequencyTable = serde_json::from_str(unsorted).unwrap();
        assert_eq!(table, FrequencyTable::new([2412, 2437], [], []).unwrap());
    }

    #[test]
    fn test_band_of() {
        let table = FrequencyTable::new([2400, 2450], [5150, 5175], [5600, 5650]).unwrap();
        assert_eq!(table.band_of(2450), Some(WifiBand::Band24Ghz));
        assert_eq!(table.band_of(5175), Some(WifiBand::Band5Ghz));
        assert_eq!(table.band_of(5650), Some(WifiBand::Band5GhzDfsOnly));
        assert_eq!(table.band_of(5900), None);
    }
}
