//! Virtual radio driver
//!
//! Simulates a WiFi radio that answers scans from a configured set of
//! access points. The driver itself is handed to the scanner; a
//! [`VirtualDriverHandle`] sharing its state stays with the test or CLI to
//! script behavior and inspect what was issued.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use airscan_channels::FrequencySet;
use airscan_core::{MonotonicClock, ScanClass, ScanDriver, ScanResult};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::debug;

/// An access point visible to the virtual radio
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VirtualAccessPoint {
    /// Network name
    pub ssid: String,
    /// MAC address
    pub bssid: String,
    /// Operating frequency in MHz
    pub frequency: u32,
    /// Received signal strength in dBm
    pub rssi: i32,
    /// Security capabilities
    #[serde(default)]
    pub capabilities: String,
}

impl VirtualAccessPoint {
    /// Create an open access point
    pub fn new(ssid: impl Into<String>, bssid: impl Into<String>, frequency: u32, rssi: i32) -> Self {
        Self {
            ssid: ssid.into(),
            bssid: bssid.into(),
            frequency,
            rssi,
            capabilities: String::new(),
        }
    }

    fn observe(&self, timestamp_us: u64) -> ScanResult {
        let mut result = ScanResult::new(
            self.ssid.clone(),
            self.bssid.clone(),
            self.rssi,
            self.frequency,
            timestamp_us,
        );
        result.capabilities = self.capabilities.clone();
        result
    }
}

/// A scan command received by the virtual radio
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedScan {
    /// Request class
    pub class: ScanClass,
    /// Commanded frequencies
    pub frequencies: FrequencySet,
    /// Hidden-network identifiers
    pub hidden_network_ids: BTreeSet<i32>,
}

/// Configuration for creating a virtual driver
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VirtualDriverConfig {
    /// Interface name reported to the scanner
    pub interface: String,
    /// Access points in range
    pub access_points: Vec<VirtualAccessPoint>,
}

impl Default for VirtualDriverConfig {
    fn default() -> Self {
        Self {
            interface: "wlan0".to_string(),
            access_points: vec![
                VirtualAccessPoint::new("HomeNet", "3c:84:6a:01:02:03", 2437, -48),
                VirtualAccessPoint::new("HomeNet-5G", "3c:84:6a:01:02:04", 5180, -55),
                VirtualAccessPoint::new("CoffeeShop", "a4:2b:b0:10:20:30", 2412, -71),
                VirtualAccessPoint::new("Neighbor", "f0:9f:c2:aa:bb:cc", 2462, -83),
                VirtualAccessPoint::new("Office-DFS", "00:1a:1e:44:55:66", 5500, -67),
            ],
        }
    }
}

/// State shared between a driver and its handles
#[derive(Debug)]
struct DriverState {
    accept: bool,
    access_points: Vec<VirtualAccessPoint>,
    stale: Vec<ScanResult>,
    issued: Vec<IssuedScan>,
    last_frequencies: HashMap<ScanClass, FrequencySet>,
}

fn lock(state: &Mutex<DriverState>) -> MutexGuard<'_, DriverState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Simulated radio driver
pub struct VirtualDriver {
    interface: String,
    clock: Arc<dyn MonotonicClock>,
    state: Arc<Mutex<DriverState>>,
    issued_tx: Option<mpsc::UnboundedSender<IssuedScan>>,
}

impl VirtualDriver {
    /// Create a driver and a handle to script it
    pub fn new(config: VirtualDriverConfig, clock: Arc<dyn MonotonicClock>) -> (Self, VirtualDriverHandle) {
        let state = Arc::new(Mutex::new(DriverState {
            accept: true,
            access_points: config.access_points,
            stale: Vec::new(),
            issued: Vec::new(),
            last_frequencies: HashMap::new(),
        }));
        let driver = Self {
            interface: config.interface,
            clock,
            state: state.clone(),
            issued_tx: None,
        };
        (driver, VirtualDriverHandle { state })
    }

    /// Get a receiver notified of every accepted scan
    ///
    /// Replaces any receiver obtained earlier.
    pub fn subscribe_issued(&mut self) -> mpsc::UnboundedReceiver<IssuedScan> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.issued_tx = Some(tx);
        rx
    }
}

impl ScanDriver for VirtualDriver {
    fn interface_name(&self) -> &str {
        &self.interface
    }

    fn scan(
        &mut self,
        class: ScanClass,
        frequencies: &FrequencySet,
        hidden_network_ids: &BTreeSet<i32>,
    ) -> bool {
        let issued = IssuedScan {
            class,
            frequencies: frequencies.clone(),
            hidden_network_ids: hidden_network_ids.clone(),
        };

        let mut state = lock(&self.state);
        state.issued.push(issued.clone());
        if !state.accept {
            debug!("Virtual driver {} rejecting {} scan", self.interface, class);
            return false;
        }
        state.last_frequencies.insert(class, frequencies.clone());
        drop(state);

        debug!(
            "Virtual driver {} accepted {} scan over {} frequencies",
            self.interface,
            class,
            frequencies.len()
        );
        if let Some(tx) = &self.issued_tx {
            let _ = tx.send(issued);
        }
        true
    }

    fn scan_results(&mut self, class: ScanClass) -> Vec<ScanResult> {
        let now = self.clock.now_micros();
        let state = lock(&self.state);
        let Some(frequencies) = state.last_frequencies.get(&class) else {
            return Vec::new();
        };

        let mut results: Vec<ScanResult> = state
            .access_points
            .iter()
            .filter(|ap| frequencies.contains(&ap.frequency))
            .map(|ap| ap.observe(now))
            .collect();
        results.extend(state.stale.iter().cloned());
        results
    }
}

/// Handle for scripting a [`VirtualDriver`]
#[derive(Debug, Clone)]
pub struct VirtualDriverHandle {
    state: Arc<Mutex<DriverState>>,
}

impl VirtualDriverHandle {
    /// Make the driver accept or reject subsequent scan commands
    pub fn set_accept(&self, accept: bool) {
        lock(&self.state).accept = accept;
    }

    /// Add an access point
    pub fn add_access_point(&self, ap: VirtualAccessPoint) {
        lock(&self.state).access_points.push(ap);
    }

    /// Replace all access points
    pub fn set_access_points(&self, aps: Vec<VirtualAccessPoint>) {
        lock(&self.state).access_points = aps;
    }

    /// Add a cached result returned with every scan regardless of frequency
    pub fn inject_stale_result(&self, result: ScanResult) {
        lock(&self.state).stale.push(result);
    }

    /// Scan commands received so far, accepted or not
    pub fn issued(&self) -> Vec<IssuedScan> {
        lock(&self.state).issued.clone()
    }

    /// Number of scan commands received so far
    pub fn issued_count(&self) -> usize {
        lock(&self.state).issued.len()
    }
}
