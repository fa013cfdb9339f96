//! Scan engine
//!
//! The synchronous state machine behind the scan actor. It owns the driver
//! binding and at most one in-flight request per [`ScanClass`], and turns
//! admissions, driver events and timeouts into handler callbacks.
//!
//! The engine is never shared: the actor task owns it and feeds it one
//! command at a time, so no two signals are ever processed concurrently.

use std::sync::Arc;
use std::time::Duration;

use airscan_channels::{ChannelCollection, FrequencySet, FrequencyTable, ValidFrequencyPolicy};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::clock::MonotonicClock;
use crate::driver::{DriverEvent, DriverEventKind, ScanDriver};
use crate::error::{FailureReason, ScanError};
use crate::filter::{filter_results, FilterParams};
use crate::handler::{ScanEventHandler, ScanStatus};
use crate::result::ScanData;
use crate::settings::{BucketChannels, ScanSettings};
use crate::state::{ScanClass, ScanRequestState, TimerTag};
use crate::timer::TimerScheduler;

/// Scan engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanEngineConfig {
    /// Time allowed for the driver to signal completion or failure (ms)
    pub scan_timeout_ms: u64,
    /// Drop results whose frequency is outside the request's valid set
    pub filter_invalid_frequencies: bool,
    /// How the valid set is derived from a request
    pub valid_frequency_policy: ValidFrequencyPolicy,
    /// Band to frequency mapping
    pub frequency_table: FrequencyTable,
}

impl Default for ScanEngineConfig {
    fn default() -> Self {
        Self {
            scan_timeout_ms: 15_000,
            filter_invalid_frequencies: false,
            valid_frequency_policy: ValidFrequencyPolicy::MatchScan,
            frequency_table: FrequencyTable::standard(),
        }
    }
}

impl ScanEngineConfig {
    /// Timeout as a duration
    pub fn scan_timeout(&self) -> Duration {
        Duration::from_millis(self.scan_timeout_ms)
    }
}

/// Frequencies resolved from one request's settings
struct ResolvedFrequencies {
    scan: FrequencySet,
    valid: FrequencySet,
    per_bucket: Vec<FrequencySet>,
}

/// The scan engine
pub struct ScanEngine<D> {
    config: ScanEngineConfig,
    driver: D,
    clock: Arc<dyn MonotonicClock>,
    single: Option<ScanRequestState>,
    background: Option<ScanRequestState>,
    latest_single: ScanData,
    latest_background: ScanData,
    single_epoch: u64,
    background_epoch: u64,
}

impl<D: ScanDriver> ScanEngine<D> {
    /// Create an engine over a driver binding
    pub fn new(driver: D, config: ScanEngineConfig, clock: Arc<dyn MonotonicClock>) -> Self {
        Self {
            config,
            driver,
            clock,
            single: None,
            background: None,
            latest_single: ScanData::default(),
            latest_background: ScanData::default(),
            single_epoch: 0,
            background_epoch: 0,
        }
    }

    /// Get the current configuration
    pub fn config(&self) -> &ScanEngineConfig {
        &self.config
    }

    /// Get the driver binding
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Get the driver binding mutably
    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    /// Check whether a request of `class` is in flight
    pub fn is_scanning(&self, class: ScanClass) -> bool {
        self.slot(class).is_some()
    }

    /// Get the in-flight request of `class`
    pub fn request(&self, class: ScanClass) -> Option<&ScanRequestState> {
        self.slot(class).as_ref()
    }

    /// Results of the last completed scan of `class`
    pub fn latest_results(&self, class: ScanClass) -> &ScanData {
        match class {
            ScanClass::Single => &self.latest_single,
            ScanClass::Background => &self.latest_background,
        }
    }

    fn slot(&self, class: ScanClass) -> &Option<ScanRequestState> {
        match class {
            ScanClass::Single => &self.single,
            ScanClass::Background => &self.background,
        }
    }

    fn slot_mut(&mut self, class: ScanClass) -> &mut Option<ScanRequestState> {
        match class {
            ScanClass::Single => &mut self.single,
            ScanClass::Background => &mut self.background,
        }
    }

    /// Advance and return the generation counter of `class`
    fn next_epoch(&mut self, class: ScanClass) -> u64 {
        let epoch = match class {
            ScanClass::Single => &mut self.single_epoch,
            ScanClass::Background => &mut self.background_epoch,
        };
        *epoch += 1;
        *epoch
    }

    fn resolve_frequencies(&self, settings: &ScanSettings) -> ResolvedFrequencies {
        let table = &self.config.frequency_table;
        let policy = self.config.valid_frequency_policy;
        let mut all = ChannelCollection::new(table, policy);
        let mut per_bucket = Vec::with_capacity(settings.buckets.len());

        for bucket in &settings.buckets {
            let mut collection = ChannelCollection::new(table, policy);
            match &bucket.channels {
                BucketChannels::Band(band) => {
                    collection.add_band(*band);
                    all.add_band(*band);
                }
                BucketChannels::Channels(channels) => {
                    collection.add_channels(channels.iter().copied());
                    all.add_channels(channels.iter().copied());
                }
            }
            per_bucket.push(collection.scan_frequencies());
        }

        ResolvedFrequencies {
            scan: all.scan_frequencies(),
            valid: all.valid_frequencies(),
            per_bucket,
        }
    }

    /// Admit a new request of `class`
    ///
    /// Returns an error without touching any state when settings or handler
    /// are absent, the settings are malformed, or a request of the same
    /// class is already in flight. A request the driver refuses is still
    /// admitted: its handler receives a single `Failed` status before this
    /// returns.
    pub fn start_scan(
        &mut self,
        class: ScanClass,
        settings: Option<ScanSettings>,
        handler: Option<Arc<dyn ScanEventHandler>>,
        timers: &mut dyn TimerScheduler,
    ) -> Result<(), ScanError> {
        let settings =
            settings.ok_or_else(|| ScanError::InvalidRequest("missing settings".to_string()))?;
        let handler =
            handler.ok_or_else(|| ScanError::InvalidRequest("missing event handler".to_string()))?;
        settings.validate()?;

        if self.is_scanning(class) {
            warn!("Rejecting {} scan: one is already in progress", class);
            return Err(ScanError::Busy(class));
        }

        let resolved = self.resolve_frequencies(&settings);
        let epoch = self.next_epoch(class);

        let request = ScanRequestState {
            class,
            epoch,
            settings,
            handler,
            start_time_us: self.clock.now_micros(),
            scan_frequencies: resolved.scan,
            valid_frequencies: resolved.valid,
            bucket_frequencies: resolved.per_bucket,
        };

        debug!(
            "Issuing {} scan (epoch {}) on {:?} with {} hidden networks",
            class,
            request.epoch,
            request.scan_frequencies,
            request.settings.hidden_network_ids.len()
        );

        let accepted = self.driver.scan(
            class,
            &request.scan_frequencies,
            &request.settings.hidden_network_ids,
        );

        if !accepted {
            warn!(
                "{} scan (epoch {}) failed: {}",
                class,
                request.epoch,
                FailureReason::DriverRejected
            );
            request.handler.on_scan_status(ScanStatus::Failed);
            return Ok(());
        }

        timers.arm(request.timer_tag(), self.config.scan_timeout());
        info!(
            "Started {} scan (epoch {}) over {} frequencies",
            class,
            request.epoch,
            request.scan_frequencies.len()
        );
        *self.slot_mut(class) = Some(request);
        Ok(())
    }

    /// Handle an asynchronous driver notification
    ///
    /// Events from another interface, or for a class with nothing in
    /// flight, are ignored.
    pub fn handle_driver_event(&mut self, event: &DriverEvent, timers: &mut dyn TimerScheduler) {
        if event.interface != self.driver.interface_name() {
            debug!(
                "Ignoring {:?} from interface {} (bound to {})",
                event.kind,
                event.interface,
                self.driver.interface_name()
            );
            return;
        }

        match event.kind {
            DriverEventKind::ResultsAvailable => self.complete(event.class, timers),
            DriverEventKind::ScanFailed => {
                self.fail(event.class, FailureReason::DriverFailed, timers)
            }
        }
    }

    /// Handle a fired timeout timer
    ///
    /// Only a timer armed by the request currently in flight terminates it.
    pub fn handle_timeout(&mut self, tag: TimerTag, timers: &mut dyn TimerScheduler) {
        match self.slot(tag.class).as_ref().map(|r| r.epoch) {
            Some(epoch) if epoch == tag.epoch => {
                self.fail(tag.class, FailureReason::TimedOut, timers);
            }
            Some(epoch) => {
                debug!(
                    "Ignoring stale {} timer (epoch {}, current {})",
                    tag.class, tag.epoch, epoch
                );
            }
            None => {
                debug!(
                    "Ignoring {} timer (epoch {}): no scan in progress",
                    tag.class, tag.epoch
                );
            }
        }
    }

    fn complete(&mut self, class: ScanClass, timers: &mut dyn TimerScheduler) {
        let Some(request) = self.slot_mut(class).take() else {
            debug!("Ignoring results for {} scan: none in progress", class);
            return;
        };
        timers.disarm(class);

        let raw = self.driver.scan_results(class);
        let filtered = filter_results(
            &raw,
            FilterParams {
                start_time_us: request.start_time_us,
                valid_frequencies: &request.valid_frequencies,
                filter_invalid_frequencies: self.config.filter_invalid_frequencies,
                max_results: request.settings.max_ap_per_scan,
            },
        );

        debug!(
            "{} scan (epoch {}): {} raw results, {} retained, {} reported",
            class,
            request.epoch,
            raw.len(),
            filtered.discovered.len(),
            filtered.ranked.len()
        );

        if request.settings.wants_full_results() {
            for result in &filtered.discovered {
                if let Some(bucket) = full_result_bucket(&request, result.frequency) {
                    request.handler.on_full_scan_result(result, bucket);
                }
            }
        }

        let latest = match class {
            ScanClass::Single => &mut self.latest_single,
            ScanClass::Background => &mut self.latest_background,
        };
        *latest = ScanData {
            id: latest.id.wrapping_add(1),
            results: filtered.ranked,
        };

        info!(
            "{} scan (epoch {}) complete with {} results",
            class,
            request.epoch,
            latest.results.len()
        );
        request.handler.on_scan_status(ScanStatus::ResultsAvailable);
    }

    fn fail(&mut self, class: ScanClass, reason: FailureReason, timers: &mut dyn TimerScheduler) {
        let Some(request) = self.slot_mut(class).take() else {
            debug!("Ignoring failure for {} scan ({}): none in progress", class, reason);
            return;
        };
        timers.disarm(class);

        warn!("{} scan (epoch {}) failed: {}", class, request.epoch, reason);
        request.handler.on_scan_status(ScanStatus::Failed);
    }

    /// Fail every request still in flight
    ///
    /// Used when the engine is about to be dropped.
    pub fn fail_all(&mut self, reason: FailureReason, timers: &mut dyn TimerScheduler) {
        for class in ScanClass::ALL {
            if self.is_scanning(class) {
                self.fail(class, reason, timers);
            }
        }
    }
}

/// Bucket to report a full result against
///
/// The first full-result bucket whose frequencies contain the result, or
/// the first full-result bucket when none does.
fn full_result_bucket(request: &ScanRequestState, frequency: u32) -> Option<usize> {
    let mut fallback = None;
    for (index, bucket) in request.settings.buckets.iter().enumerate() {
        if !bucket.report_events.wants_full_results() {
            continue;
        }
        if request.bucket_frequencies[index].contains(&frequency) {
            return Some(index);
        }
        fallback.get_or_insert(index);
    }
    fallback
}
