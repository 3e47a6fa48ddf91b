//! txreport main entry point

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use txreport_api::{start_server, AppState};
use txreport_config::{Config, ConfigError};
use txreport_core::{source_from_config, LoadState, ReportView};

#[derive(Parser, Debug)]
#[command(name = "txreport")]
#[command(version = "0.1.0")]
#[command(about = "Transaction report with search, type filter, sorting and pagination", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Transaction source (file path or http(s) URL), overrides the configuration
    #[arg(short, long)]
    source: Option<String>,

    /// Print the default configuration and exit
    #[arg(long)]
    print_default_config: bool,
}

/// Report config problems with their code and suggestions
fn config_error(error: ConfigError) -> anyhow::Error {
    anyhow::anyhow!(error.to_details())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.print_default_config {
        print!("{}", Config::generate_default());
        return Ok(());
    }

    let mut config = Config::load_or_default(&args.config)
        .map_err(config_error)
        .with_context(|| format!("Failed to load configuration from {}", args.config.display()))?;
    if let Some(source) = args.source {
        config.source.location = source;
        config.validate().map_err(config_error).context("Invalid --source")?;
    }

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.logging.level.as_str()))
        .init();

    log::info!("Config loaded: source={}, page_size={}", config.source.location, config.pagination.page_size);

    let base = std::env::current_dir().context("Failed to resolve working directory")?;
    let source = source_from_config(&config, &base).context("Failed to create transaction source")?;

    let mut view = ReportView::new(source).with_page_size(config.pagination.page_size);
    match view.load().await {
        LoadState::Ready => log::info!("Loaded {} transactions", view.all().len()),
        state => log::warn!("Initial load finished in state {:?}", state),
    }

    let state = AppState::new(view, config);
    start_server(state).await.context("Server error")?;

    Ok(())
}
