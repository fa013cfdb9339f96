//! Radio driver binding consumed by the orchestrator

use std::collections::BTreeSet;

use airscan_channels::FrequencySet;

use crate::result::ScanResult;
use crate::state::ScanClass;

/// Capability to run scans on one radio interface
///
/// Calls must not block: `scan` only accepts or rejects the command, and
/// completion is reported later as a [`DriverEvent`] posted to the scanner.
/// The driver tracks scan state per class, so each call names the class it
/// belongs to.
pub trait ScanDriver: Send + 'static {
    /// Interface this binding controls, used to match driver events
    fn interface_name(&self) -> &str;

    /// Start a scan over `frequencies`, returning whether the driver accepted it
    fn scan(
        &mut self,
        class: ScanClass,
        frequencies: &FrequencySet,
        hidden_network_ids: &BTreeSet<i32>,
    ) -> bool;

    /// Fetch the raw results of the last completed scan of `class`
    fn scan_results(&mut self, class: ScanClass) -> Vec<ScanResult>;
}

/// Kind of asynchronous driver notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DriverEventKind {
    /// Results of the scan are ready to be fetched
    ResultsAvailable,
    /// The scan failed
    ScanFailed,
}

/// Asynchronous notification from the driver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverEvent {
    /// Interface that produced the event
    pub interface: String,
    /// Request class the event belongs to
    pub class: ScanClass,
    /// What happened
    pub kind: DriverEventKind,
}

impl DriverEvent {
    /// Results-ready notification
    pub fn results_available(interface: impl Into<String>, class: ScanClass) -> Self {
        Self {
            interface: interface.into(),
            class,
            kind: DriverEventKind::ResultsAvailable,
        }
    }

    /// Scan-failed notification
    pub fn scan_failed(interface: impl Into<String>, class: ScanClass) -> Self {
        Self {
            interface: interface.into(),
            class,
            kind: DriverEventKind::ScanFailed,
        }
    }
}
