//! The `scan` and `bands` commands

use std::sync::Arc;

use airscan_channels::{frequency_to_channel, FrequencyTable, WifiBand};
use airscan_core::{
    spawn_scanner, ChannelEventHandler, ReportEvents, ScanClass, ScanData, ScanEvent,
    ScanEventHandler, ScanResult, ScanSettings, ScanStatus, SystemMonotonicClock,
};
use airscan_sim::{run_virtual_driver_task, VirtualDriver};
use anyhow::{bail, Context};
use tracing::{debug, info};

use crate::cli::ScanArgs;
use crate::settings::{ScanDefaults, Settings};

/// Build request settings from the defaults and command-line overrides
pub fn build_scan_settings(defaults: &ScanDefaults, args: &ScanArgs) -> ScanSettings {
    let mut events = ReportEvents::AFTER_EACH_SCAN;
    if args.full_results || defaults.report_full_results {
        events = events | ReportEvents::FULL_SCAN_RESULT;
    }

    let builder = ScanSettings::builder()
        .with_base_period(defaults.base_period_ms)
        .with_max_ap_per_scan(args.max_ap_per_scan.unwrap_or(defaults.max_ap_per_scan))
        .with_hidden_network_ids(args.hidden.iter().copied());

    if args.channels.is_empty() {
        let band = args.band.map(WifiBand::from).unwrap_or(defaults.band);
        builder
            .add_bucket_with_band(defaults.base_period_ms, events, band)
            .build()
    } else {
        builder
            .add_bucket_with_channels(defaults.base_period_ms, events, args.channels.iter().copied())
            .build()
    }
}

/// Apply command-line overrides to the loaded settings
pub fn apply_overrides(settings: &mut Settings, args: &ScanArgs) {
    if let Some(timeout_ms) = args.timeout_ms {
        settings.engine.scan_timeout_ms = timeout_ms;
    }
    if args.filter_invalid {
        settings.engine.filter_invalid_frequencies = true;
    }
    if let Some(latency_ms) = args.latency_ms {
        settings.driver_task.latency_ms = latency_ms;
    }
    if let Some(outcome) = args.outcome {
        settings.driver_task.scripted_outcomes.clear();
        settings.driver_task.default_outcome = outcome.into();
    }
    settings.driver_task.interface = settings.driver.interface.clone();
}

/// Run one scan over the simulated radio and print the outcome
pub async fn run_scan(mut settings: Settings, args: ScanArgs) -> anyhow::Result<()> {
    apply_overrides(&mut settings, &args);
    let request = build_scan_settings(&settings.scan, &args);
    let class = if args.background {
        ScanClass::Background
    } else {
        ScanClass::Single
    };

    let clock = Arc::new(SystemMonotonicClock::new());
    let (mut driver, driver_handle) = VirtualDriver::new(settings.driver.clone(), clock.clone());
    driver_handle.set_accept(!args.reject);
    let issued_rx = driver.subscribe_issued();

    let (scanner, actor) = spawn_scanner(driver, settings.engine.clone(), clock);
    let completion = tokio::spawn(run_virtual_driver_task(
        issued_rx,
        scanner.clone(),
        settings.driver_task.clone(),
    ));

    let (handler, mut events) = ChannelEventHandler::new();
    let handler: Arc<dyn ScanEventHandler> = Arc::new(handler);
    scanner
        .start_scan(class, Some(request), Some(handler))
        .await
        .with_context(|| format!("Failed to start {} scan", class))?;
    info!("Started {} scan", class);

    let mut status = None;
    while let Some(event) = events.recv().await {
        match event {
            ScanEvent::FullResult {
                result,
                bucket_index,
            } => {
                if !args.json {
                    println!("+ [bucket {}] {}", bucket_index, format_result(&result));
                }
            }
            ScanEvent::Status(s) => {
                status = Some(s);
                break;
            }
        }
    }

    let data = scanner
        .latest_results(class)
        .await
        .context("Failed to query scan results")?;
    scanner.shutdown().await.ok();
    actor.await.context("Scan actor panicked")?;
    completion.abort();
    debug!("Issued {} scan command(s)", driver_handle.issued_count());

    match status {
        Some(ScanStatus::ResultsAvailable) => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&data)?);
            } else {
                print_scan_data(&data);
            }
            Ok(())
        }
        Some(ScanStatus::Failed) => bail!("{} scan failed", class),
        None => bail!("{} scan ended without a status", class),
    }
}

/// Print the frequencies and channels each band resolves to
pub fn print_bands(table: &FrequencyTable) {
    for band in WifiBand::ALL {
        if band == WifiBand::Unspecified {
            continue;
        }
        let channels: Vec<String> = table
            .frequencies_for_band(band)
            .iter()
            .map(|&freq| match frequency_to_channel(freq) {
                Ok(channel) => format!("{} (ch {})", freq, channel),
                Err(_) => freq.to_string(),
            })
            .collect();
        println!("{:<12} {}", band.name(), channels.join(", "));
    }
}

fn format_result(result: &ScanResult) -> String {
    let channel = frequency_to_channel(result.frequency)
        .map(|c| c.to_string())
        .unwrap_or_else(|_| "-".to_string());
    format!(
        "{:<24} {:<17} {:>5} dBm {:>5} MHz ch {:>3}",
        result.ssid, result.bssid, result.rssi, result.frequency, channel
    )
}

fn print_scan_data(data: &ScanData) {
    println!("Scan #{}: {} result(s)", data.id, data.len());
    for result in &data.results {
        println!("  {}", format_result(result));
    }
}
