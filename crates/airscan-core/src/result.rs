//! Scan results as returned by the driver and as delivered to callers

use serde::{Deserialize, Serialize};

/// One network observation from the driver
///
/// Never mutated by the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScanResult {
    /// Network name
    pub ssid: String,
    /// Access point MAC address, `aa:bb:cc:dd:ee:ff`
    pub bssid: String,
    /// Signal strength in dBm
    pub rssi: i32,
    /// Frequency in MHz
    pub frequency: u32,
    /// Capture time on the monotonic clock (microseconds)
    pub timestamp_us: u64,
    /// Security capability string
    #[serde(default)]
    pub capabilities: String,
    /// Raw information elements
    #[serde(default)]
    pub information_elements: Vec<u8>,
}

impl ScanResult {
    /// Create a result without capabilities or information elements
    pub fn new(
        ssid: impl Into<String>,
        bssid: impl Into<String>,
        rssi: i32,
        frequency: u32,
        timestamp_us: u64,
    ) -> Self {
        Self {
            ssid: ssid.into(),
            bssid: bssid.into(),
            rssi,
            frequency,
            timestamp_us,
            capabilities: String::new(),
            information_elements: Vec::new(),
        }
    }
}

/// Filtered, ordered and capped results of one completed scan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanData {
    /// Completed-scan counter for the class (0 before any scan completes)
    pub id: u32,
    /// Results ordered by descending RSSI
    pub results: Vec<ScanResult>,
}

impl ScanData {
    /// Number of results
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Check whether there are no results
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Strongest result, if any
    pub fn strongest(&self) -> Option<&ScanResult> {
        self.results.first()
    }
}
