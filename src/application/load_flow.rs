//! Loader pipeline use case
//!
//! Reads an interchange snapshot, validates and normalizes every record,
//! and upserts the survivors in batches. The database connection is
//! released on every exit path, success or not.

use std::path::Path;

use anyhow::Result;
use serde_json::Value;
use tracing::{error, info};

use crate::domain::normalize::{detect_sku_key, normalize_batch};
use crate::infrastructure::database_connection::DatabaseConnection;
use crate::infrastructure::product_repository::ProductRepository;
use crate::infrastructure::snapshot::load_snapshot;

pub struct LoadFlow {
    db: DatabaseConnection,
    batch_size: usize,
}

impl LoadFlow {
    pub fn new(db: DatabaseConnection, batch_size: usize) -> Self {
        Self { db, batch_size }
    }

    /// Run the whole load. Consumes the flow so the pool is closed exactly
    /// once, after the last exit path.
    pub async fn run(self, input_path: &Path) -> Result<()> {
        let result = self.load(input_path).await;
        self.db.close().await;
        info!("Database connection closed.");
        result
    }

    async fn load(&self, input_path: &Path) -> Result<()> {
        let records = load_snapshot(input_path).await?;
        if records.is_empty() {
            error!("JSON file is empty. No data to insert.");
            return Ok(());
        }
        info!("Total products found in JSON: {}", records.len());

        // The key used for every record is decided by the first one alone.
        let sku_key = match records.first().and_then(Value::as_object).and_then(detect_sku_key) {
            Some(key) => key,
            None => {
                error!("No valid SKU key found in JSON. Please check your data.");
                return Ok(());
            }
        };
        info!("Detected SKU Key: {sku_key}");

        let rows = normalize_batch(&records, sku_key);

        // Schema bootstrap is the first statement issued against the
        // store; every halt above leaves the database untouched.
        self.db.migrate().await?;
        let repository = ProductRepository::new(self.db.pool().clone());
        repository.upsert_in_batches(&rows, self.batch_size).await?;

        info!("All data inserted successfully!");
        Ok(())
    }
}
