//! Snapshot persistence
//!
//! The scraper ends a run by serializing everything it collected to a
//! timestamped JSON file; the loader starts one by reading a fixed-name
//! file of the same shape. Records travel as a plain JSON array.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use serde_json::Value;
use tokio::fs;
use tracing::{info, warn};

use crate::domain::product::ProductRecord;

/// Write the scraped records to `extracted_products_{timestamp}.json` in
/// the output directory. An empty run writes nothing and is not an error.
pub async fn save_snapshot(
    records: &[ProductRecord],
    output_dir: &Path,
) -> Result<Option<PathBuf>> {
    if records.is_empty() {
        warn!("⚠️  No products scraped, snapshot not written");
        return Ok(None);
    }

    if !output_dir.exists() {
        fs::create_dir_all(output_dir)
            .await
            .with_context(|| format!("Failed to create output directory: {output_dir:?}"))?;
    }

    let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
    let path = output_dir.join(format!("extracted_products_{timestamp}.json"));

    let content =
        serde_json::to_string_pretty(records).context("Failed to serialize products")?;
    fs::write(&path, content)
        .await
        .with_context(|| format!("Failed to write snapshot: {path:?}"))?;

    info!("📁 Saved {} products to {:?}", records.len(), path);
    Ok(Some(path))
}

/// Read an interchange file back as raw JSON values.
///
/// A missing, unreadable, or malformed file is an error; an empty array is
/// not and is left to the caller, which halts before touching the store.
pub async fn load_snapshot(path: &Path) -> Result<Vec<Value>> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("Error loading JSON file: {path:?}"))?;

    let records: Vec<Value> = serde_json::from_str(&content)
        .with_context(|| format!("Error loading JSON file: {path:?}"))?;

    Ok(records)
}
