//! Monotonic time source shared with the driver
//!
//! Result capture timestamps and the request start time must come from the
//! same clock for staleness filtering to be meaningful.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Monotonic clock in microseconds
pub trait MonotonicClock: Send + Sync {
    /// Current time in microseconds
    fn now_micros(&self) -> u64;
}

/// Clock anchored at its creation
#[derive(Debug, Clone, Copy)]
pub struct SystemMonotonicClock {
    anchor: Instant,
}

impl SystemMonotonicClock {
    /// Create a clock reading zero now
    pub fn new() -> Self {
        Self {
            anchor: Instant::now(),
        }
    }
}

impl Default for SystemMonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock for SystemMonotonicClock {
    fn now_micros(&self) -> u64 {
        self.anchor.elapsed().as_micros() as u64
    }
}

/// Manually advanced clock
///
/// Clones share the same time, so a test can keep one copy and hand
/// another to the scanner.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now_us: Arc<AtomicU64>,
}

impl ManualClock {
    /// Create a clock at the given time
    pub fn new(start_us: u64) -> Self {
        Self {
            now_us: Arc::new(AtomicU64::new(start_us)),
        }
    }

    /// Set the current time
    pub fn set(&self, now_us: u64) {
        self.now_us.store(now_us, Ordering::SeqCst);
    }

    /// Move the clock forward
    pub fn advance(&self, delta_us: u64) {
        self.now_us.fetch_add(delta_us, Ordering::SeqCst);
    }
}

impl MonotonicClock for ManualClock {
    fn now_micros(&self) -> u64 {
        self.now_us.load(Ordering::SeqCst)
    }
}
