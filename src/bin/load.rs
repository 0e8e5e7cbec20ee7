//! Loader pipeline entry point
//!
//! Reads a snapshot file and upserts it into the products table.
//! Usage: `load [input.json]` — the argument overrides the configured
//! input file.

use std::path::PathBuf;

use anyhow::Result;
use tracing::error;
use tracing::instrument::WithSubscriber;

use shop_harvest::application::LoadFlow;
use shop_harvest::infrastructure::{ConfigManager, DatabaseConnection, init_logging_with_config};

#[tokio::main]
async fn main() -> Result<()> {
    let config_manager = ConfigManager::new()?;
    // The configured subscriber needs the config, so the load itself runs
    // under a console-only default.
    let bootstrap = tracing_subscriber::fmt().with_target(false).finish();
    let config = config_manager.load_config().with_subscriber(bootstrap).await?;
    init_logging_with_config(&config.logging)?;

    let input_path = match std::env::args().nth(1) {
        Some(path) => PathBuf::from(path),
        None => config.loading.input_file.clone(),
    };

    // a database that cannot be reached means there is nothing to do
    let database_url = config.database.database_url();
    let db = match DatabaseConnection::new(&database_url, config.database.max_connections).await {
        Ok(db) => db,
        Err(e) => {
            error!("Connection Error: {e:#}");
            std::process::exit(1);
        }
    };

    let flow = LoadFlow::new(db, config.loading.batch_size);
    if let Err(e) = flow.run(&input_path).await {
        error!("❌ Load failed: {e:#}");
        std::process::exit(1);
    }

    Ok(())
}
