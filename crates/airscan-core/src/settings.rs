//! Caller-supplied scan settings

use std::collections::BTreeSet;

use airscan_channels::WifiBand;
use serde::{Deserialize, Serialize};

use crate::error::ScanError;

/// Report-event mask of a bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReportEvents(u32);

impl ReportEvents {
    /// Report when the driver's result buffer fills (no flags set)
    pub const AFTER_BUFFER_FULL: ReportEvents = ReportEvents(0);
    /// Report after every scan
    pub const AFTER_EACH_SCAN: ReportEvents = ReportEvents(1 << 0);
    /// Deliver a full-result callback per discovered network
    pub const FULL_SCAN_RESULT: ReportEvents = ReportEvents(1 << 1);
    /// Do not batch results
    pub const NO_BATCH: ReportEvents = ReportEvents(1 << 2);

    /// Create from raw bits
    pub fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Get the raw bits
    pub fn bits(&self) -> u32 {
        self.0
    }

    /// Check whether every flag of `other` is set
    pub fn contains(&self, other: ReportEvents) -> bool {
        self.0 & other.0 == other.0
    }

    /// Combine two masks
    pub fn union(self, other: ReportEvents) -> Self {
        Self(self.0 | other.0)
    }

    /// Whether full per-result callbacks are requested
    pub fn wants_full_results(&self) -> bool {
        self.contains(ReportEvents::FULL_SCAN_RESULT)
    }
}

impl std::ops::BitOr for ReportEvents {
    type Output = ReportEvents;

    fn bitor(self, rhs: ReportEvents) -> ReportEvents {
        self.union(rhs)
    }
}

/// Channels selected by a bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BucketChannels {
    /// Every frequency in a band
    Band(WifiBand),
    /// Explicit frequencies in MHz
    Channels(Vec<u32>),
}

/// One bucket of a scan request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketSettings {
    /// Scan period of this bucket in milliseconds
    pub period_ms: u32,
    /// Which events to report for this bucket
    pub report_events: ReportEvents,
    /// Channel selection
    pub channels: BucketChannels,
}

/// Settings for one scan request, immutable once submitted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSettings {
    /// Base scan period in milliseconds
    pub base_period_ms: u32,
    /// Maximum results kept per scan
    pub max_ap_per_scan: usize,
    /// Buckets, indexed by position
    pub buckets: Vec<BucketSettings>,
    /// Hidden-network identifiers passed to the driver unchanged
    #[serde(default)]
    pub hidden_network_ids: BTreeSet<i32>,
}

impl ScanSettings {
    /// Start building settings
    pub fn builder() -> ScanSettingsBuilder {
        ScanSettingsBuilder::default()
    }

    /// Check the settings can be turned into a driver command
    pub fn validate(&self) -> Result<(), ScanError> {
        if self.buckets.is_empty() {
            return Err(ScanError::InvalidRequest("no buckets".to_string()));
        }
        if self.max_ap_per_scan == 0 {
            return Err(ScanError::InvalidRequest(
                "max_ap_per_scan must be positive".to_string(),
            ));
        }
        for (index, bucket) in self.buckets.iter().enumerate() {
            match &bucket.channels {
                BucketChannels::Band(WifiBand::Unspecified) => {
                    return Err(ScanError::InvalidRequest(format!(
                        "bucket {} has no band",
                        index
                    )));
                }
                BucketChannels::Channels(channels) if channels.is_empty() => {
                    return Err(ScanError::InvalidRequest(format!(
                        "bucket {} has no channels",
                        index
                    )));
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Whether any bucket requests full per-result callbacks
    pub fn wants_full_results(&self) -> bool {
        self.buckets
            .iter()
            .any(|b| b.report_events.wants_full_results())
    }
}

/// Builder for [`ScanSettings`]
#[derive(Debug, Clone, Default)]
pub struct ScanSettingsBuilder {
    base_period_ms: u32,
    max_ap_per_scan: usize,
    buckets: Vec<BucketSettings>,
    hidden_network_ids: BTreeSet<i32>,
}

impl ScanSettingsBuilder {
    /// Set the base period
    pub fn with_base_period(mut self, period_ms: u32) -> Self {
        self.base_period_ms = period_ms;
        self
    }

    /// Set the per-scan result cap
    pub fn with_max_ap_per_scan(mut self, max: usize) -> Self {
        self.max_ap_per_scan = max;
        self
    }

    /// Set hidden-network identifiers
    pub fn with_hidden_network_ids(mut self, ids: impl IntoIterator<Item = i32>) -> Self {
        self.hidden_network_ids = ids.into_iter().collect();
        self
    }

    /// Add a bucket covering a band
    pub fn add_bucket_with_band(
        mut self,
        period_ms: u32,
        report_events: ReportEvents,
        band: WifiBand,
    ) -> Self {
        self.buckets.push(BucketSettings {
            period_ms,
            report_events,
            channels: BucketChannels::Band(band),
        });
        self
    }

    /// Add a bucket covering explicit channels (frequencies in MHz)
    pub fn add_bucket_with_channels(
        mut self,
        period_ms: u32,
        report_events: ReportEvents,
        channels: impl IntoIterator<Item = u32>,
    ) -> Self {
        self.buckets.push(BucketSettings {
            period_ms,
            report_events,
            channels: BucketChannels::Channels(channels.into_iter().collect()),
        });
        self
    }

    /// Finish building
    pub fn build(self) -> ScanSettings {
        ScanSettings {
            base_period_ms: self.base_period_ms,
            max_ap_per_scan: self.max_ap_per_scan,
            buckets: self.buckets,
            hidden_network_ids: self.hidden_network_ids,
        }
    }
}
