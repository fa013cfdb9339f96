//! Result filtering and ordering
//!
//! One filtered collection is materialized into two views:
//!
//! - `discovered`: retained results in the order the driver returned them,
//!   used for full-result callbacks
//! - `ranked`: the same results ordered by descending RSSI and capped,
//!   used for the aggregated [`ScanData`](crate::ScanData)

use std::cmp::Ordering;

use airscan_channels::FrequencySet;

use crate::result::ScanResult;

/// Inputs that control filtering of one scan's results
#[derive(Debug, Clone, Copy)]
pub struct FilterParams<'a> {
    /// Results captured before this time (microseconds) are stale
    pub start_time_us: u64,
    /// Frequencies accepted when `filter_invalid_frequencies` is set
    pub valid_frequencies: &'a FrequencySet,
    /// Drop results whose frequency is outside `valid_frequencies`
    pub filter_invalid_frequencies: bool,
    /// Maximum number of ranked results
    pub max_results: usize,
}

/// Both orderings produced from one scan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilteredResults {
    /// Retained results in discovery order, uncapped
    pub discovered: Vec<ScanResult>,
    /// Retained results by descending RSSI, capped
    pub ranked: Vec<ScanResult>,
}

/// Ordering used for ranked results
///
/// Descending RSSI, then BSSID, frequency and SSID so that equal-strength
/// results always come out in the same order.
pub fn compare_by_rssi(a: &ScanResult, b: &ScanResult) -> Ordering {
    b.rssi
        .cmp(&a.rssi)
        .then_with(|| a.bssid.cmp(&b.bssid))
        .then_with(|| a.frequency.cmp(&b.frequency))
        .then_with(|| a.ssid.cmp(&b.ssid))
}

/// Filter raw driver results and produce both views
pub fn filter_results(raw: &[ScanResult], params: FilterParams<'_>) -> FilteredResults {
    let discovered: Vec<ScanResult> = raw
        .iter()
        .filter(|r| r.timestamp_us >= params.start_time_us)
        .filter(|r| {
            !params.filter_invalid_frequencies || params.valid_frequencies.contains(&r.frequency)
        })
        .cloned()
        .collect();

    let mut ranked = discovered.clone();
    ranked.sort_by(compare_by_rssi);
    ranked.truncate(params.max_results);

    FilteredResults { discovered, ranked }
}
