//! coinbar - headless crypto price ticker
//!
//! Polls the ticker, domestic and FX venues, prints the selected quotes as a
//! status line on stdout and accepts display commands on stdin
//! (`mode`, `pin <ASSET>`, `status`, `quit`). Logs go to stderr.
//!
//! # Usage
//! ```sh
//! RUST_LOG=debug cargo run -- --poll-interval 60
//! ```

use anyhow::Result;
use clap::Parser;
use coinbar::application::display::DisplaySelector;
use coinbar::application::market_data::QuoteAggregator;
use coinbar::application::polling::PollingScheduler;
use coinbar::application::preferences::{DisplayModeService, PinnedTokenService};
use coinbar::config::Config;
use coinbar::domain::ports::PreferenceStore;
use coinbar::infrastructure::core::HttpClientFactory;
use coinbar::infrastructure::{
    BinanceTickerClient, ExchangeRateClient, InMemoryPreferenceStore, SettingsPersistence,
    UpbitTickerClient,
};
use coinbar::interfaces::{CommandConsole, StatusLineRenderer, spawn_stdin_reader};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{Level, info};
use tracing_subscriber::prelude::*;

#[derive(Parser, Debug)]
#[command(name = "coinbar", version, about = "Crypto price ticker with KRW spread")]
struct Args {
    /// Seconds between polling cycles (overrides POLL_INTERVAL_SECS)
    #[arg(long)]
    poll_interval: Option<u64>,

    /// Settings file (overrides COINBAR_SETTINGS_PATH)
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Keep display preferences in memory only
    #[arg(long)]
    ephemeral: bool,
}

fn open_store(args: &Args, config: &Config) -> Result<Arc<dyn PreferenceStore>> {
    if args.ephemeral {
        info!("Preferences: in-memory (not persisted)");
        return Ok(Arc::new(InMemoryPreferenceStore::new()));
    }

    let persistence = match &config.settings_path {
        Some(path) => SettingsPersistence::at_path(path)?,
        None => SettingsPersistence::new()?,
    };
    info!("Preferences: {:?}", persistence.path());
    Ok(Arc::new(persistence))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();
    let args = Args::parse();

    // Stdout carries the status line, so logs go to stderr
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stderr_layer)
        .init();

    info!("coinbar {} starting...", env!("CARGO_PKG_VERSION"));

    let mut config = Config::from_env()?;
    if let Some(secs) = args.poll_interval.filter(|s| *s > 0) {
        config.polling.poll_interval_secs = secs;
    }
    if let Some(path) = &args.settings {
        config.settings_path = Some(path.clone());
    }
    info!(
        "Configuration loaded: Assets={:?}, Poll={:?}, Rotation={:?}",
        config.polling.tracked_assets,
        config.poll_interval(),
        config.rotation_period()
    );

    // Display side
    let store = open_store(&args, &config)?;
    let pinned = Arc::new(PinnedTokenService::load(store.clone()));
    let modes = Arc::new(DisplayModeService::load(store));
    let selector = Arc::new(DisplaySelector::new(
        pinned,
        modes,
        Arc::new(StatusLineRenderer::stdout()),
        config.rotation_period(),
    ));
    selector.refresh();

    // Quote side
    let client =
        HttpClientFactory::create_client(config.http_timeout(), config.venues.http_max_retries);
    let ticker = BinanceTickerClient::new(client.clone(), config.venues.binance_base_url.clone())
        .with_batch_requests(config.venues.binance_batch_requests);
    let domestic = UpbitTickerClient::new(client.clone(), config.venues.upbit_base_url.clone());
    let fx = ExchangeRateClient::new(
        client,
        config.venues.fx_base_url.clone(),
        config.venues.fx_quote_currency.clone(),
    );
    let aggregator = QuoteAggregator::new(
        Arc::new(ticker),
        Arc::new(domestic),
        Arc::new(fx),
        config.aggregator_settings(),
    );

    let mut scheduler = PollingScheduler::new(aggregator);
    scheduler.subscribe(selector.clone());
    scheduler.start(config.poll_interval()).await;

    info!("Running. Commands: mode | pin <ASSET> | status | quit (Ctrl+C to exit)");
    let mut console = CommandConsole::new(spawn_stdin_reader());
    tokio::select! {
        _ = console.run(&selector) => {}
        _ = tokio::signal::ctrl_c() => info!("Shutdown signal received."),
    }

    scheduler.stop().await;
    info!("Exiting...");
    Ok(())
}
