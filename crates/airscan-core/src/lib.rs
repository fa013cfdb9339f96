//! WiFi Scan Orchestration Core
//!
//! This crate sits between scan clients and a single radio driver. It admits
//! scan requests, resolves their bands and channels into frequencies,
//! supervises each request with a timeout, and turns the driver's raw
//! results into filtered, ranked result sets delivered through callbacks.
//!
//! # Request Classes
//!
//! Two classes of request are tracked independently:
//!
//! - **Single**: one-shot scans
//! - **Background**: scans issued on behalf of background scheduling
//!
//! At most one request per class is in flight. A second request of the same
//! class is rejected as busy; the other class is unaffected.
//!
//! # Lifecycle
//!
//! Every admitted request ends in exactly one terminal status callback:
//! `ResultsAvailable` when the driver reports completion, or `Failed` when
//! the driver refuses the command, reports a failure, or stays silent past
//! the timeout. Signals arriving after a request has ended are ignored.
//!
//! # Example
//!
//! ```rust,no_run
//! use airscan_core::{ReportEvents, ScanSettings};
//! use airscan_channels::WifiBand;
//!
//! let settings = ScanSettings::builder()
//!     .with_base_period(10_000)
//!     .with_max_ap_per_scan(10)
//!     .add_bucket_with_band(10_000, ReportEvents::AFTER_EACH_SCAN, WifiBand::Band24Ghz)
//!     .build();
//! assert!(settings.validate().is_ok());
//! ```

pub mod actor;
pub mod clock;
pub mod driver;
pub mod engine;
pub mod error;
pub mod events;
pub mod filter;
pub mod handler;
pub mod result;
pub mod settings;
pub mod state;
pub mod timer;

// Re-export actor types
pub use actor::{run_scan_actor, spawn_scanner, ScanActorCommand, ScannerHandle};

// Re-export capability types
pub use clock::{ManualClock, MonotonicClock, SystemMonotonicClock};
pub use driver::{DriverEvent, DriverEventKind, ScanDriver};
pub use handler::{ScanEventHandler, ScanStatus};
pub use timer::{TimerScheduler, TokioTimerScheduler};

// Re-export event types
pub use events::{ChannelEventHandler, ScanEvent};

// Re-export engine types
pub use engine::{ScanEngine, ScanEngineConfig};
pub use error::{FailureReason, ScanError};
pub use filter::{compare_by_rssi, filter_results, FilterParams, FilteredResults};
pub use result::{ScanData, ScanResult};
pub use settings::{BucketChannels, BucketSettings, ReportEvents, ScanSettings, ScanSettingsBuilder};
pub use state::{ScanClass, ScanRequestState, TimerTag};
