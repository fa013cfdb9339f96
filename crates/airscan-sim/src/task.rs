//! Virtual driver completion task
//!
//! A real radio reports scan completion asynchronously. This task plays
//! that role for a [`VirtualDriver`](crate::VirtualDriver): it watches the
//! scans the driver accepts and, after a configured latency, posts the
//! matching driver event to the scanner.

use std::collections::VecDeque;
use std::time::Duration;

use airscan_core::{DriverEvent, ScannerHandle};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::driver::IssuedScan;

/// How the virtual radio ends an accepted scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanOutcome {
    /// Report that results are available
    #[default]
    Complete,
    /// Report a scan failure
    Fail,
    /// Never report anything
    Silent,
}

/// Configuration for the completion task
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VirtualDriverTaskConfig {
    /// Interface name carried by posted events
    pub interface: String,
    /// Delay between an accepted scan and its completion event (ms)
    pub latency_ms: u64,
    /// Outcomes for the next accepted scans, consumed in order
    pub scripted_outcomes: VecDeque<ScanOutcome>,
    /// Outcome once the script is exhausted
    pub default_outcome: ScanOutcome,
}

impl Default for VirtualDriverTaskConfig {
    fn default() -> Self {
        Self {
            interface: "wlan0".to_string(),
            latency_ms: 50,
            scripted_outcomes: VecDeque::new(),
            default_outcome: ScanOutcome::Complete,
        }
    }
}

/// Run the completion task
///
/// Handles accepted scans one at a time in the order they were issued.
/// Returns when the driver side of `issued_rx` is dropped or the scanner
/// stops accepting events.
pub async fn run_virtual_driver_task(
    mut issued_rx: mpsc::UnboundedReceiver<IssuedScan>,
    scanner: ScannerHandle,
    mut config: VirtualDriverTaskConfig,
) {
    info!(
        "Starting virtual driver task for {} ({} ms latency)",
        config.interface, config.latency_ms
    );
    let latency = Duration::from_millis(config.latency_ms);

    while let Some(issued) = issued_rx.recv().await {
        let outcome = config
            .scripted_outcomes
            .pop_front()
            .unwrap_or(config.default_outcome);

        tokio::time::sleep(latency).await;

        let event = match outcome {
            ScanOutcome::Complete => DriverEvent::results_available(&config.interface, issued.class),
            ScanOutcome::Fail => DriverEvent::scan_failed(&config.interface, issued.class),
            ScanOutcome::Silent => {
                debug!("Virtual driver staying silent for {} scan", issued.class);
                continue;
            }
        };

        debug!("Virtual driver posting {:?} for {} scan", event.kind, issued.class);
        if scanner.notify_driver_event(event).await.is_err() {
            debug!("Scanner stopped, ending virtual driver task");
            break;
        }
    }

    info!("Virtual driver task for {} stopped", config.interface);
}
