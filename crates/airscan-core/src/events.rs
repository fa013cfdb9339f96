//! Channel-backed event handler
//!
//! Async consumers that prefer a stream over callbacks can wrap an
//! unbounded channel in a [`ChannelEventHandler`]. Every callback becomes a
//! [`ScanEvent`] on the channel, in callback order.

use tokio::sync::mpsc;

use crate::handler::{ScanEventHandler, ScanStatus};
use crate::result::ScanResult;

/// A callback delivered for a scan request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEvent {
    /// One retained result
    FullResult {
        /// The result
        result: ScanResult,
        /// Bucket the result was reported for
        bucket_index: usize,
    },
    /// Terminal status
    Status(ScanStatus),
}

impl ScanEvent {
    /// Check if this is the terminal event of a request
    pub fn is_terminal(&self) -> bool {
        matches!(self, ScanEvent::Status(_))
    }

    /// Get the status if this is a terminal event
    pub fn status(&self) -> Option<ScanStatus> {
        match self {
            ScanEvent::Status(status) => Some(*status),
            ScanEvent::FullResult { .. } => None,
        }
    }
}

/// Forwards callbacks onto an unbounded channel
#[derive(Debug, Clone)]
pub struct ChannelEventHandler {
    tx: mpsc::UnboundedSender<ScanEvent>,
}

impl ChannelEventHandler {
    /// Create a handler and the receiver for its events
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ScanEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl ScanEventHandler for ChannelEventHandler {
    fn on_full_scan_result(&self, result: &ScanResult, bucket_index: usize) {
        let _ = self.tx.send(ScanEvent::FullResult {
            result: result.clone(),
            bucket_index,
        });
    }

    fn on_scan_status(&self, status: ScanStatus) {
        let _ = self.tx.send(ScanEvent::Status(status));
    }
}
