//! In-flight request tracking

use std::fmt;
use std::sync::Arc;

use airscan_channels::FrequencySet;
use serde::{Deserialize, Serialize};

use crate::handler::ScanEventHandler;
use crate::settings::ScanSettings;

/// The two independent request classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScanClass {
    /// One-shot scan
    Single,
    /// Background (periodic/batched) scan
    Background,
}

impl ScanClass {
    /// Both classes
    pub const ALL: [ScanClass; 2] = [ScanClass::Single, ScanClass::Background];

    /// Get human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            ScanClass::Single => "single",
            ScanClass::Background => "background",
        }
    }
}

impl fmt::Display for ScanClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Identifies a timer armed for one request
///
/// The epoch is unique per admitted request, so a timer left over from an
/// earlier request never matches the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerTag {
    /// Class of the request that armed the timer
    pub class: ScanClass,
    /// Epoch of the request that armed the timer
    pub epoch: u64,
}

/// State of one in-flight request
///
/// Its presence in the engine is the "scan in flight" flag for its class.
pub struct ScanRequestState {
    /// Request class
    pub class: ScanClass,
    /// Generation counter value assigned at admission
    pub epoch: u64,
    /// Settings as supplied by the caller
    pub settings: ScanSettings,
    /// Callback target for this request
    pub handler: Arc<dyn ScanEventHandler>,
    /// Monotonic time sampled just before the driver command (microseconds)
    pub start_time_us: u64,
    /// Frequencies commanded to the driver
    pub scan_frequencies: FrequencySet,
    /// Frequencies accepted in results
    pub valid_frequencies: FrequencySet,
    /// Resolved scan frequencies per bucket, in bucket order
    pub bucket_frequencies: Vec<FrequencySet>,
}

impl ScanRequestState {
    /// Tag for the timeout timer belonging to this request
    pub fn timer_tag(&self) -> TimerTag {
        TimerTag {
            class: self.class,
            epoch: self.epoch,
        }
    }
}

impl fmt::Debug for ScanRequestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScanRequestState")
            .field("class", &self.class)
            .field("epoch", &self.epoch)
            .field("settings", &self.settings)
            .field("start_time_us", &self.start_time_us)
            .field("scan_frequencies", &self.scan_frequencies)
            .field("valid_frequencies", &self.valid_frequencies)
            .finish_non_exhaustive()
    }
}
