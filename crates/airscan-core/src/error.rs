//! Error types for the scan orchestrator

use std::fmt;

use thiserror::Error;

use crate::state::ScanClass;

/// Errors returned synchronously by scan admission and queries
///
/// Failures that happen after a request was admitted are never returned
/// here; they reach the caller as a single `ScanStatus::Failed` callback.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScanError {
    /// Settings or handler absent, or settings malformed
    #[error("invalid scan request: {0}")]
    InvalidRequest(String),

    /// A request of the same class is already in flight
    #[error("{0} scan already in progress")]
    Busy(ScanClass),

    /// The scan actor has stopped
    #[error("scan actor is not running")]
    ActorUnavailable,
}

/// Why an admitted request ended without results
///
/// Only used for logging; all of them reach the caller as `ScanStatus::Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    /// The driver refused the scan command
    DriverRejected,
    /// The driver reported a scan failure event
    DriverFailed,
    /// No driver signal arrived before the timeout
    TimedOut,
    /// The scan actor stopped with the request in flight
    ScannerStopped,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            FailureReason::DriverRejected => "driver rejected scan",
            FailureReason::DriverFailed => "driver reported scan failure",
            FailureReason::TimedOut => "scan timed out",
            FailureReason::ScannerStopped => "scanner stopped",
        };
        f.write_str(text)
    }
}
