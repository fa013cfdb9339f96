//! airscan command-line entry point
//!
//! Runs scans through the scan orchestrator against a simulated radio.

mod cli;
mod scan;
mod settings;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cli::{Cli, Commands, ConfigCommand};
use settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Include all our crates in the default filter
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "airscan=info,airscan_core=info,airscan_sim=info,airscan_channels=info".into()
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Scan(args) => scan::run_scan(settings, args).await?,
        Commands::Bands => scan::print_bands(&settings.engine.frequency_table),
        Commands::Config(ConfigCommand::Show) => {
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
        Commands::Config(ConfigCommand::Init) => {
            let path = settings.save(cli.config.as_deref())?;
            println!("Wrote {}", path.display());
        }
        Commands::Config(ConfigCommand::Path) => {
            match cli.config.or_else(Settings::default_path) {
                Some(path) => println!("{}", path.display()),
                None => anyhow::bail!("Could not determine settings path"),
            }
        }
    }

    Ok(())
}
