//! WiFi Scan Simulation Library
//!
//! This crate provides a simulated radio for exercising the scan
//! orchestrator without hardware. It includes:
//!
//! - **VirtualDriver**: answers scans from a configured set of access points
//! - **run_virtual_driver_task**: posts completion events after a latency
//! - **fixtures**: deterministic result sets for tests
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use airscan_core::{spawn_scanner, ScanEngineConfig, SystemMonotonicClock};
//! use airscan_sim::{run_virtual_driver_task, VirtualDriver, VirtualDriverConfig, VirtualDriverTaskConfig};
//!
//! # async fn demo() {
//! let clock = Arc::new(SystemMonotonicClock::new());
//! let (mut driver, _handle) = VirtualDriver::new(VirtualDriverConfig::default(), clock.clone());
//! let issued_rx = driver.subscribe_issued();
//! let (scanner, _task) = spawn_scanner(driver, ScanEngineConfig::default(), clock);
//! tokio::spawn(run_virtual_driver_task(issued_rx, scanner.clone(), VirtualDriverTaskConfig::default()));
//! # }
//! ```

pub mod driver;
pub mod fixtures;
pub mod task;

pub use driver::{IssuedScan, VirtualAccessPoint, VirtualDriver, VirtualDriverConfig, VirtualDriverHandle};
pub use task::{run_virtual_driver_task, ScanOutcome, VirtualDriverTaskConfig};
