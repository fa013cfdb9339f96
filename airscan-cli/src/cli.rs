//! Command-line arguments

use std::path::PathBuf;

use airscan_channels::WifiBand;
use airscan_sim::ScanOutcome;
use clap::{Args, Parser, Subcommand, ValueEnum};

/// WiFi scan orchestrator over a simulated radio
#[derive(Parser, Debug)]
#[command(name = "airscan")]
#[command(author, version, about = "Run WiFi scans through the scan orchestrator")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Settings file (defaults to $XDG_CONFIG_HOME/airscan/settings.json)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one scan and print its results
    Scan(ScanArgs),

    /// List the frequencies each band resolves to
    Bands,

    /// Manage the settings file
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Settings file commands
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the effective settings
    Show,
    /// Write the effective settings to the settings file
    Init,
    /// Print the settings file path
    Path,
}

/// Band selection on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BandArg {
    /// 2.4 GHz
    #[value(name = "2.4")]
    Band24,
    /// 5 GHz without DFS
    #[value(name = "5")]
    Band5,
    /// 5 GHz DFS channels only
    #[value(name = "dfs")]
    Dfs,
    /// 5 GHz with DFS
    #[value(name = "5-dfs")]
    Band5WithDfs,
    /// 2.4 GHz and 5 GHz
    #[value(name = "both")]
    Both,
    /// Every band
    #[value(name = "all")]
    All,
}

impl From<BandArg> for WifiBand {
    fn from(band: BandArg) -> Self {
        match band {
            BandArg::Band24 => WifiBand::Band24Ghz,
            BandArg::Band5 => WifiBand::Band5Ghz,
            BandArg::Dfs => WifiBand::Band5GhzDfsOnly,
            BandArg::Band5WithDfs => WifiBand::Band5GhzWithDfs,
            BandArg::Both => WifiBand::Both,
            BandArg::All => WifiBand::BothWithDfs,
        }
    }
}

/// How the simulated radio ends the scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutcomeArg {
    /// Report results
    Complete,
    /// Report a failure
    Fail,
    /// Never answer, so the scan times out
    Silent,
}

impl From<OutcomeArg> for ScanOutcome {
    fn from(outcome: OutcomeArg) -> Self {
        match outcome {
            OutcomeArg::Complete => ScanOutcome::Complete,
            OutcomeArg::Fail => ScanOutcome::Fail,
            OutcomeArg::Silent => ScanOutcome::Silent,
        }
    }
}

/// Arguments of the `scan` command
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Band to scan
    #[arg(short, long, value_enum, conflicts_with = "channels")]
    pub band: Option<BandArg>,

    /// Explicit frequencies in MHz, comma separated
    #[arg(short, long, value_delimiter = ',')]
    pub channels: Vec<u32>,

    /// Run as a background scan
    #[arg(long)]
    pub background: bool,

    /// Maximum results to keep
    #[arg(short = 'n', long)]
    pub max_ap_per_scan: Option<usize>,

    /// Hidden-network identifiers to probe, comma separated
    #[arg(long, value_delimiter = ',')]
    pub hidden: Vec<i32>,

    /// Print every result as it is reported
    #[arg(long)]
    pub full_results: bool,

    /// Drop results outside the requested frequencies
    #[arg(long)]
    pub filter_invalid: bool,

    /// Scan timeout in milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Simulated completion latency in milliseconds
    #[arg(long)]
    pub latency_ms: Option<u64>,

    /// Simulated scan outcome
    #[arg(long, value_enum)]
    pub outcome: Option<OutcomeArg>,

    /// Make the simulated radio refuse the scan
    #[arg(long)]
    pub reject: bool,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,
}
