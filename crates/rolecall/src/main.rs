//! Rolecall binary.
//!
//! - `run`: serve the role selector on Discord
//! - `migrate`: apply database migrations
//! - `hydrate-check`: verify every stored selector resolves

use clap::Parser;
use rolecall::{ObservabilityConfig, RolecallConfig, init_observability};

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, hydrate_check, migrate, run_bot};

    let cli = Cli::parse();
    let config = RolecallConfig::load(cli.config.as_deref())?;

    init_observability(
        &ObservabilityConfig::default()
            .with_log_level(config.log_level().clone())
            .with_verbose(cli.verbose)
            .with_json_logs(cli.json_logs || *config.json_logs()),
    )?;

    match cli.command {
        Commands::Run { migrate: migrate_first } => run_bot(&config, migrate_first).await?,
        Commands::Migrate => migrate(&config).await?,
        Commands::HydrateCheck => {
            let damaged = hydrate_check(&config).await?;
            if damaged > 0 {
                return Err(format!("{damaged} selector(s) reference missing entries").into());
            }
        }
    }

    Ok(())
}
