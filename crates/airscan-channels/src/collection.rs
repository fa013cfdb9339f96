//! Accumulation of band/channel selections into frequency sets

use crate::band::{FrequencySet, FrequencyTable, WifiBand};

/// Policy for deriving the set of frequencies accepted in returned results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ValidFrequencyPolicy {
    /// Only the frequencies that were scanned
    #[default]
    MatchScan,
    /// Every frequency of each band the request touched
    WholeBand,
}

/// Collects bands and channels for a single request
///
/// Adding is idempotent: a band or channel added twice has no additional
/// effect on the resolved sets.
#[derive(Debug, Clone)]
pub struct ChannelCollection<'a> {
    table: &'a FrequencyTable,
    policy: ValidFrequencyPolicy,
    band_bits: u32,
    channels: FrequencySet,
}

impl<'a> ChannelCollection<'a> {
    /// Create an empty collection over a frequency table
    pub fn new(table: &'a FrequencyTable, policy: ValidFrequencyPolicy) -> Self {
        Self {
            table,
            policy,
            band_bits: 0,
            channels: FrequencySet::new(),
        }
    }

    /// Add every frequency of a band
    pub fn add_band(&mut self, band: WifiBand) {
        self.band_bits |= band.bits();
    }

    /// Add a single channel, given as its frequency in MHz
    pub fn add_channel(&mut self, frequency: u32) {
        self.channels.insert(frequency);
    }

    /// Add several channels
    pub fn add_channels(&mut self, frequencies: impl IntoIterator<Item = u32>) {
        self.channels.extend(frequencies);
    }

    /// Check whether a whole band has been added
    pub fn contains_band(&self, band: WifiBand) -> bool {
        band != WifiBand::Unspecified && self.band_bits & band.bits() == band.bits()
    }

    /// Check whether a frequency will be scanned
    pub fn contains_channel(&self, frequency: u32) -> bool {
        self.channels.contains(&frequency)
            || self
                .table
                .band_of(frequency)
                .is_some_and(|band| self.band_bits & band.bits() != 0)
    }

    /// Check whether nothing has been added
    pub fn is_empty(&self) -> bool {
        self.band_bits == 0 && self.channels.is_empty()
    }

    /// Remove all selections
    pub fn clear(&mut self) {
        self.band_bits = 0;
        self.channels.clear();
    }

    /// Frequencies to command the driver to scan
    pub fn scan_frequencies(&self) -> FrequencySet {
        let mut freqs = self.table.frequencies_for_bits(self.band_bits);
        freqs.extend(self.channels.iter().copied());
        freqs
    }

    /// Frequencies accepted in the results of this scan
    pub fn valid_frequencies(&self) -> FrequencySet {
        match self.policy {
            ValidFrequencyPolicy::MatchScan => self.scan_frequencies(),
            ValidFrequencyPolicy::WholeBand => {
                let touched = self
                    .channels
                    .iter()
                    .filter_map(|&freq| self.table.band_of(freq))
                    .fold(self.band_bits, |acc, band| acc | band.bits());

                let mut freqs = self.table.frequencies_for_bits(touched);
                freqs.extend(self.channels.iter().copied());
                freqs
            }
        }
    }

    /// Check whether the scan set covers every frequency in the table
    pub fn covers_all_channels(&self) -> bool {
        let scan = self.scan_frequencies();
        self.table.all_frequencies().is_subset(&scan)
    }
}
