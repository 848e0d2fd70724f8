// src/main.rs — wxdraft entry point

use clap::Parser;

use wxdraft::cli::{Cli, Commands};
use wxdraft::infra::config::Config;
use wxdraft::infra::logger;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Respects RUST_LOG
    logger::init_logging(if cli.verbose { "info" } else { "warn" });

    if let Err(e) = run(cli).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Falls back to defaults if no config.toml
    let config = match cli.config {
        Some(ref path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    match cli.command {
        Commands::Publish(args) => wxdraft::cli::publish::run_publish(args, &config).await,
        Commands::Draft(args) => wxdraft::cli::draft::run_draft(args, &config).await,
        Commands::Styles => wxdraft::cli::styles::run_styles(),
    }
}
