//! Event handler capability implemented by callers

use crate::result::ScanResult;

/// Terminal outcome of a scan request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScanStatus {
    /// Scan completed and results are available
    ResultsAvailable,
    /// Scan failed (driver rejection, driver failure event, or timeout)
    Failed,
}

/// Receives the callbacks of a scan request
///
/// For each admitted request the handler sees zero or more
/// `on_full_scan_result` calls followed by exactly one `on_scan_status`.
/// Callbacks run on the scan actor's task and must not block.
pub trait ScanEventHandler: Send + Sync {
    /// One retained result, in discovery order
    fn on_full_scan_result(&self, result: &ScanResult, bucket_index: usize);

    /// Terminal status of the request
    fn on_scan_status(&self, status: ScanStatus);
}
