//! Scraper pipeline entry point
//!
//! Walks every configured category listing and writes one timestamped
//! snapshot file per run. Usage: `scrape [config.json]`.

use std::sync::Arc;

use anyhow::Result;
use tracing::error;
use tracing::instrument::WithSubscriber;

use shop_harvest::application::ScrapeFlow;
use shop_harvest::infrastructure::{
    ConfigManager, HttpClient, HttpClientConfig, ListingParser, init_logging_with_config,
    save_snapshot,
};

#[tokio::main]
async fn main() -> Result<()> {
    let config_manager = match std::env::args().nth(1) {
        Some(path) => ConfigManager::with_path(path.into()),
        None => ConfigManager::new()?,
    };
    // The configured subscriber needs the config, so the load itself runs
    // under a console-only default.
    let bootstrap = tracing_subscriber::fmt().with_target(false).finish();
    let config = config_manager.load_config().with_subscriber(bootstrap).await?;
    init_logging_with_config(&config.logging)?;

    let http_config = HttpClientConfig::from_scraping_config(&config.scraping);
    let fetcher = Arc::new(HttpClient::with_config(http_config)?);
    let parser = ListingParser::with_selectors(&config.scraping.selectors)?;
    let output_dir = config.scraping.output_dir.clone();

    let flow = ScrapeFlow::new(fetcher, parser, config.scraping);
    let records = flow.run().await;

    if let Err(e) = save_snapshot(&records, &output_dir).await {
        error!("❌ Failed to write snapshot: {e:#}");
        std::process::exit(1);
    }

    Ok(())
}
