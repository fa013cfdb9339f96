//! Application settings

use std::path::{Path, PathBuf};

use airscan_channels::WifiBand;
use airscan_core::ScanEngineConfig;
use airscan_sim::{VirtualDriverConfig, VirtualDriverTaskConfig};
use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Defaults for scans started from the command line
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScanDefaults {
    /// Band scanned when no channels are given
    pub band: WifiBand,
    /// Base period in milliseconds
    pub base_period_ms: u32,
    /// Maximum results kept per scan
    pub max_ap_per_scan: usize,
    /// Print every result as it is reported
    pub report_full_results: bool,
}

impl Default for ScanDefaults {
    fn default() -> Self {
        Self {
            band: WifiBand::Both,
            base_period_ms: 10_000,
            max_ap_per_scan: 32,
            report_full_results: false,
        }
    }
}

/// Application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Scan engine configuration
    pub engine: ScanEngineConfig,
    /// Simulated radio
    pub driver: VirtualDriverConfig,
    /// Simulated completion behavior
    pub driver_task: VirtualDriverTaskConfig,
    /// Scan defaults
    pub scan: ScanDefaults,
}

impl Settings {
    /// Get the XDG config directory for airscan
    /// Uses $XDG_CONFIG_HOME/airscan, falls back to ~/.config/airscan
    fn config_dir() -> Option<PathBuf> {
        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_config);
            if path.is_absolute() {
                return Some(path.join("airscan"));
            }
        }

        dirs::home_dir().map(|h| h.join(".config").join("airscan"))
    }

    /// Get the default settings file path
    pub fn default_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("settings.json"))
    }

    /// Load settings from `path`, or the default location
    ///
    /// A missing file yields the defaults; an unreadable or malformed one
    /// is an error.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path.map(Path::to_path_buf).or_else(Self::default_path) else {
            return Ok(Self::default());
        };
        if !path.exists() {
            return Ok(Self::default());
        }

        let json = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse settings in {}", path.display()))
    }

    /// Save settings to `path`, or the default location
    pub fn save(&self, path: Option<&Path>) -> anyhow::Result<PathBuf> {
        let path = path
            .map(Path::to_path_buf)
            .or_else(Self::default_path)
            .context("Could not determine settings path")?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create settings directory {}", parent.display())
            })?;
        }

        let json = serde_json::to_string_pretty(self).context("Failed to serialize settings")?;
        std::fs::write(&path, json)
            .with_context(|| format!("Failed to write settings to {}", path.display()))?;

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_fills_defaults() {
        let json = r#"{ "engine": { "scan_timeout_ms": 5000 }, "scan": { "band": "Band5Ghz" } }"#;
        let settings: Settings = serde_json::from_str(json).unwrap();

        assert_eq!(settings.engine.scan_timeout_ms, 5000);
        assert!(!settings.engine.filter_invalid_frequencies);
        assert_eq!(settings.scan.band, WifiBand::Band5Ghz);
        assert_eq!(settings.scan.max_ap_per_scan, 32);
        assert_eq!(settings.driver.interface, "wlan0");
    }

    #[test]
    fn test_save_then_load() {
        let dir = std::env::temp_dir().join(format!("airscan-settings-{}", std::process::id()));
        let path = dir.join("settings.json");

        let mut settings = Settings::default();
        settings.engine.filter_invalid_frequencies = true;
        settings.driver_task.latency_ms = 5;
        let written = settings.save(Some(&path)).unwrap();
        assert_eq!(written, path);

        let loaded = Settings::load(Some(&path)).unwrap();
        assert_eq!(loaded.engine, settings.engine);
        assert_eq!(loaded.driver_task.latency_ms, 5);
        assert_eq!(loaded.driver.access_points, settings.driver.access_points);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_file_is_default() {
        let path = std::env::temp_dir().join("airscan-does-not-exist/settings.json");
        let loaded = Settings::load(Some(&path)).unwrap();
        assert_eq!(loaded.scan, ScanDefaults::default());
    }

    #[test]
    fn test_malformed_file_is_error() {
        let dir = std::env::temp_dir().join(format!("airscan-bad-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("settings.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(Settings::load(Some(&path)).is_err());
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
