//! Scan Actor
//!
//! The actor owns the [`ScanEngine`] and processes every signal on a single
//! task: scan admissions from callers, notifications from the driver, and
//! timeout timers. Because all three arrive on the same queue, the engine
//! never sees two signals at once and a timeout can never race a completion.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use airscan_core::{spawn_scanner, ChannelEventHandler, ScanEngineConfig, SystemMonotonicClock};
//!
//! let (scanner, _task) = spawn_scanner(driver, ScanEngineConfig::default(), Arc::new(SystemMonotonicClock::new()));
//! let (handler, mut events) = ChannelEventHandler::new();
//! scanner.start_single_scan(Some(settings), Some(Arc::new(handler))).await?;
//! while let Some(event) = events.recv().await {
//!     if event.is_terminal() { break; }
//! }
//! ```

use std::fmt;
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::clock::MonotonicClock;
use crate::driver::{DriverEvent, ScanDriver};
use crate::engine::{ScanEngine, ScanEngineConfig};
use crate::error::{FailureReason, ScanError};
use crate::handler::ScanEventHandler;
use crate::result::ScanData;
use crate::settings::ScanSettings;
use crate::state::{ScanClass, TimerTag};
use crate::timer::{TimerScheduler, TokioTimerScheduler};

/// Depth of the actor command queue
const COMMAND_QUEUE_DEPTH: usize = 256;

/// Commands sent to the scan actor
pub enum ScanActorCommand {
    /// Admit a new scan request
    StartScan {
        /// Request class
        class: ScanClass,
        /// Scan settings
        settings: Option<ScanSettings>,
        /// Callback target
        handler: Option<Arc<dyn ScanEventHandler>>,
        /// Channel to send back the admission outcome
        response: oneshot::Sender<Result<(), ScanError>>,
    },

    /// Asynchronous notification from the driver
    DriverEvent {
        /// The event
        event: DriverEvent,
    },

    /// A timeout timer fired
    TimerFired {
        /// Tag of the request that armed it
        tag: TimerTag,
    },

    /// Query the latest completed results of a class
    QueryLatestResults {
        /// Request class
        class: ScanClass,
        /// Channel to send back a snapshot
        response: oneshot::Sender<ScanData>,
    },

    /// Query whether a class has a request in flight
    QueryScanning {
        /// Request class
        class: ScanClass,
        /// Channel to send back the answer
        response: oneshot::Sender<bool>,
    },

    /// Shutdown the actor
    Shutdown,
}

impl fmt::Debug for ScanActorCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanActorCommand::StartScan {
                class,
                settings,
                handler,
                ..
            } => f
                .debug_struct("StartScan")
                .field("class", class)
                .field("settings", settings)
                .field("has_handler", &handler.is_some())
                .finish_non_exhaustive(),
            ScanActorCommand::DriverEvent { event } => {
                f.debug_struct("DriverEvent").field("event", event).finish()
            }
            ScanActorCommand::TimerFired { tag } => {
                f.debug_struct("TimerFired").field("tag", tag).finish()
            }
            ScanActorCommand::QueryLatestResults { class, .. } => f
                .debug_struct("QueryLatestResults")
                .field("class", class)
                .finish_non_exhaustive(),
            ScanActorCommand::QueryScanning { class, .. } => f
                .debug_struct("QueryScanning")
                .field("class", class)
                .finish_non_exhaustive(),
            ScanActorCommand::Shutdown => f.write_str("Shutdown"),
        }
    }
}

/// Run the scan actor
///
/// Returns when a `Shutdown` command arrives or every sender is dropped.
/// Requests still in flight at that point receive `Failed`. Pending timers
/// belong to `timers` and are cancelled when it drops.
pub async fn run_scan_actor<D, T>(
    mut engine: ScanEngine<D>,
    mut timers: T,
    mut cmd_rx: mpsc::Receiver<ScanActorCommand>,
) where
    D: ScanDriver,
    T: TimerScheduler,
{
    info!(
        "Scan actor started on {}",
        engine.driver().interface_name()
    );

    while let Some(cmd) = cmd_rx.recv().await {
        match cmd {
            ScanActorCommand::StartScan {
                class,
                settings,
                handler,
                response,
            } => {
                let result = engine.start_scan(class, settings, handler, &mut timers);
                if let Err(e) = &result {
                    debug!("{} scan not admitted: {}", class, e);
                }
                let _ = response.send(result);
            }

            ScanActorCommand::DriverEvent { event } => {
                engine.handle_driver_event(&event, &mut timers);
            }

            ScanActorCommand::TimerFired { tag } => {
                engine.handle_timeout(tag, &mut timers);
            }

            ScanActorCommand::QueryLatestResults { class, response } => {
                let _ = response.send(engine.latest_results(class).clone());
            }

            ScanActorCommand::QueryScanning { class, response } => {
                let _ = response.send(engine.is_scanning(class));
            }

            ScanActorCommand::Shutdown => {
                info!("Scan actor shutting down");
                break;
            }
        }
    }

    engine.fail_all(FailureReason::ScannerStopped, &mut timers);
    info!("Scan actor stopped");
}

/// Spawn a scan actor over `driver`
///
/// Must be called from within a tokio runtime.
pub fn spawn_scanner<D: ScanDriver>(
    driver: D,
    config: ScanEngineConfig,
    clock: Arc<dyn MonotonicClock>,
) -> (ScannerHandle, JoinHandle<()>) {
    let (cmd_tx, cmd_rx) = mpsc::channel(COMMAND_QUEUE_DEPTH);
    let timers = TokioTimerScheduler::new(cmd_tx.downgrade());
    let engine = ScanEngine::new(driver, config, clock);
    let task = tokio::spawn(run_scan_actor(engine, timers, cmd_rx));
    (ScannerHandle { cmd_tx }, task)
}

/// Cloneable handle to a running scan actor
#[derive(Debug, Clone)]
pub struct ScannerHandle {
    cmd_tx: mpsc::Sender<ScanActorCommand>,
}

impl ScannerHandle {
    /// Wrap an existing command sender
    pub fn new(cmd_tx: mpsc::Sender<ScanActorCommand>) -> Self {
        Self { cmd_tx }
    }

    async fn send(&self, cmd: ScanActorCommand) -> Result<(), ScanError> {
        self.cmd_tx
            .send(cmd)
            .await
            .map_err(|_| ScanError::ActorUnavailable)
    }

    async fn request<R>(
        &self,
        make: impl FnOnce(oneshot::Sender<R>) -> ScanActorCommand,
    ) -> Result<R, ScanError> {
        let (tx, rx) = oneshot::channel();
        self.send(make(tx)).await?;
        rx.await.map_err(|_| ScanError::ActorUnavailable)
    }

    /// Start a request of `class`
    ///
    /// `Ok` means the request was admitted; its outcome arrives through the
    /// handler. A refusal by the driver is reported there as well.
    pub async fn start_scan(
        &self,
        class: ScanClass,
        settings: Option<ScanSettings>,
        handler: Option<Arc<dyn ScanEventHandler>>,
    ) -> Result<(), ScanError> {
        self.request(|response| ScanActorCommand::StartScan {
            class,
            settings,
            handler,
            response,
        })
        .await?
    }

    /// Start a single scan
    pub async fn start_single_scan(
        &self,
        settings: Option<ScanSettings>,
        handler: Option<Arc<dyn ScanEventHandler>>,
    ) -> Result<(), ScanError> {
        self.start_scan(ScanClass::Single, settings, handler).await
    }

    /// Start a background scan
    pub async fn start_background_scan(
        &self,
        settings: Option<ScanSettings>,
        handler: Option<Arc<dyn ScanEventHandler>>,
    ) -> Result<(), ScanError> {
        self.start_scan(ScanClass::Background, settings, handler)
            .await
    }

    /// Snapshot of the latest completed results of `class`
    pub async fn latest_results(&self, class: ScanClass) -> Result<ScanData, ScanError> {
        self.request(|response| ScanActorCommand::QueryLatestResults { class, response })
            .await
    }

    /// Snapshot of the latest completed single-scan results
    pub async fn latest_single_scan_results(&self) -> Result<ScanData, ScanError> {
        self.latest_results(ScanClass::Single).await
    }

    /// Snapshot of the latest completed background-scan results
    pub async fn latest_background_scan_results(&self) -> Result<ScanData, ScanError> {
        self.latest_results(ScanClass::Background).await
    }

    /// Check whether `class` has a request in flight
    pub async fn is_scanning(&self, class: ScanClass) -> Result<bool, ScanError> {
        self.request(|response| ScanActorCommand::QueryScanning { class, response })
            .await
    }

    /// Post a driver notification to the actor
    pub async fn notify_driver_event(&self, event: DriverEvent) -> Result<(), ScanError> {
        self.send(ScanActorCommand::DriverEvent { event }).await
    }

    /// Ask the actor to stop
    pub async fn shutdown(&self) -> Result<(), ScanError> {
        self.send(ScanActorCommand::Shutdown).await
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::sync::Mutex;
    use std::time::Duration;

    use airscan_channels::{FrequencySet, WifiBand};

    use super::*;
    use crate::clock::ManualClock;
    use crate::events::{ChannelEventHandler, ScanEvent};
    use crate::handler::ScanStatus;
    use crate::result::ScanResult;
    use crate::settings::ReportEvents;

    #[derive(Clone, Default)]
    struct SharedDriver {
        issued: Arc<Mutex<Vec<FrequencySet>>>,
        results: Arc<Mutex<Vec<ScanResult>>>,
    }

    impl ScanDriver for SharedDriver {
        fn interface_name(&self) -> &str {
            "wlan0"
        }

        fn scan(
            &mut self,
            _class: ScanClass,
            frequencies: &FrequencySet,
            _hidden_network_ids: &BTreeSet<i32>,
        ) -> bool {
            self.issued.lock().unwrap().push(frequencies.clone());
            true
        }

        fn scan_results(&mut self, _class: ScanClass) -> Vec<ScanResult> {
            self.results.lock().unwrap().clone()
        }
    }

    fn settings() -> ScanSettings {
        ScanSettings::builder()
            .with_base_period(10000)
            .with_max_ap_per_scan(10)
            .add_bucket_with_band(10000, ReportEvents::AFTER_EACH_SCAN, WifiBand::Band24Ghz)
            .build()
    }

    #[tokio::test]
    async fn test_scan_completes_through_actor() {
        let driver = SharedDriver::default();
        let clock = ManualClock::new(100);
        let (scanner, task) = spawn_scanner(
            driver.clone(),
            ScanEngineConfig::default(),
            Arc::new(clock),
        );

        let (handler, mut events) = ChannelEventHandler::new();
        let handler: Arc<dyn ScanEventHandler> = Arc::new(handler);
        scanner
            .start_single_scan(Some(settings()), Some(handler))
            .await
            .unwrap();
        assert!(scanner.is_scanning(ScanClass::Single).await.unwrap());
        assert_eq!(driver.issued.lock().unwrap().len(), 1);

        driver
            .results
            .lock()
            .unwrap()
            .push(ScanResult::new("AP", "00:00:00:00:00:01", -40, 2412, 200));
        scanner
            .notify_driver_event(DriverEvent::results_available("wlan0", ScanClass::Single))
            .await
            .unwrap();

        assert_eq!(
            events.recv().await,
            Some(ScanEvent::Status(ScanStatus::ResultsAvailable))
        );
        let latest = scanner.latest_single_scan_results().await.unwrap();
        assert_eq!(latest.id, 1);
        assert_eq!(latest.results.len(), 1);
        assert!(!scanner.is_scanning(ScanClass::Single).await.unwrap());

        scanner.shutdown().await.unwrap();
        task.await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_handler_returns_error() {
        let (scanner, _task) = spawn_scanner(
            SharedDriver::default(),
            ScanEngineConfig::default(),
            Arc::new(ManualClock::new(0)),
        );

        let result = scanner.start_background_scan(Some(settings()), None).await;
        assert!(matches!(result, Err(ScanError::InvalidRequest(_))));
        assert!(!scanner.is_scanning(ScanClass::Background).await.unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_delivers_failure() {
        let config = ScanEngineConfig {
            scan_timeout_ms: 1_000,
            ..Default::default()
        };
        let (scanner, _task) =
            spawn_scanner(SharedDriver::default(), config, Arc::new(ManualClock::new(0)));

        let (handler, mut events) = ChannelEventHandler::new();
        let handler: Arc<dyn ScanEventHandler> = Arc::new(handler);
        scanner
            .start_single_scan(Some(settings()), Some(handler))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(1_500)).await;
        assert_eq!(
            events.recv().await,
            Some(ScanEvent::Status(ScanStatus::Failed))
        );
        assert!(!scanner.is_scanning(ScanClass::Single).await.unwrap());
    }

    #[tokio::test]
    async fn test_stopped_actor_reports_unavailable() {
        let (scanner, task) = spawn_scanner(
            SharedDriver::default(),
            ScanEngineConfig::default(),
            Arc::new(ManualClock::new(0)),
        );
        scanner.shutdown().await.unwrap();
        task.await.unwrap();

        assert_eq!(
            scanner.latest_single_scan_results().await,
            Err(ScanError::ActorUnavailable)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_fails_scan_in_flight() {
        let (scanner, task) = spawn_scanner(
            SharedDriver::default(),
            ScanEngineConfig::default(),
            Arc::new(ManualClock::new(0)),
        );

        let (handler, mut events) = ChannelEventHandler::new();
        let handler: Arc<dyn ScanEventHandler> = Arc::new(handler);
        scanner
            .start_single_scan(Some(settings()), Some(handler))
            .await
            .unwrap();

        scanner.shutdown().await.unwrap();
        task.await.unwrap();

        assert_eq!(events.recv().await, Some(ScanEvent::Status(ScanStatus::Failed)));
        assert_eq!(events.recv().await, None);
    }

    #[tokio::test]
    async fn test_dropped_handles_fail_scan_in_flight() {
        let (scanner, task) = spawn_scanner(
            SharedDriver::default(),
            ScanEngineConfig::default(),
            Arc::new(ManualClock::new(0)),
        );

        let (handler, mut events) = ChannelEventHandler::new();
        let handler: Arc<dyn ScanEventHandler> = Arc::new(handler);
        scanner
            .start_background_scan(Some(settings()), Some(handler))
            .await
            .unwrap();

        drop(scanner);
        task.await.unwrap();

        assert_eq!(events.recv().await, Some(ScanEvent::Status(ScanStatus::Failed)));
        assert_eq!(events.recv().await, None);
    }
}
