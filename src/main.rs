use anyhow::Context;
use clap::Parser;
use hackathon_registry::cli::{self, Cli, Command};
use hackathon_registry::infrastructure::logging::init_logging;
use hackathon_registry::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = AppConfig::load().context("Failed to load configuration")?;
    init_logging(&config.logging)?;

    match cli.command {
        Command::Serve => cli::serve::run(&config).await,
        Command::CreateAdmin(args) => cli::admin::run(&config, args).await,
    }
}
