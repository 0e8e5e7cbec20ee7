//! End-to-end tests for the snapshot-to-database load pipeline
use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use serde_json::{Value, json};
use tempfile::tempdir;

use shop_harvest::application::LoadFlow;
use shop_harvest::infrastructure::{DatabaseConnection, ProductRepository};

async fn write_snapshot(dir: &Path, records: Value) -> Result<std::path::PathBuf> {
    let path = dir.join("extracted_products.json");
    tokio::fs::write(&path, serde_json::to_string_pretty(&records)?).await?;
    Ok(path)
}

async fn open_db(dir: &Path) -> Result<DatabaseConnection> {
    let database_url = format!("sqlite:{}", dir.join("products.db").display());
    DatabaseConnection::new(&database_url, 10).await
}

async fn run_load(dir: &Path, input: &Path) -> Result<()> {
    let db = open_db(dir).await?;
    LoadFlow::new(db, 100).run(input).await
}

async fn open_repository(dir: &Path) -> Result<ProductRepository> {
    let db = open_db(dir).await?;
    Ok(ProductRepository::new(db.pool().clone()))
}

fn record(name: &str, sku: &str, price: &str) -> Value {
    json!({
        "Product Name": name,
        "Product ID": sku,
        "Category": "shirts",
        "Price": price,
        "Availability": "In Stock",
        "Product Images": ["https://cdn.example.com/a.jpg"],
        "Additional Attributes": {"fabric": "cotton"}
    })
}

#[tokio::test]
async fn double_load_is_idempotent_and_refreshes_last_updated() -> Result<()> {
    let temp_dir = tempdir()?;
    let input = write_snapshot(
        temp_dir.path(),
        json!([
            record("Oxford Shirt", "SHIRT-001", "PKR 2,450"),
            record("Linen Pants", "PANTS-002", "PKR 3,100"),
        ]),
    )
    .await?;

    run_load(temp_dir.path(), &input).await?;

    let repo = open_repository(temp_dir.path()).await?;
    assert_eq!(repo.count_products().await?, 2);
    let first_pass = repo.find_by_sku("SHIRT-001").await?.unwrap();

    tokio::time::sleep(Duration::from_millis(25)).await;
    run_load(temp_dir.path(), &input).await?;

    let repo = open_repository(temp_dir.path()).await?;
    assert_eq!(repo.count_products().await?, 2);
    let second_pass = repo.find_by_sku("SHIRT-001").await?.unwrap();
    assert_eq!(second_pass.product_name, "Oxford Shirt");
    assert!(second_pass.last_updated > first_pass.last_updated);
    Ok(())
}

#[tokio::test]
async fn large_snapshots_load_across_batch_boundaries() -> Result<()> {
    let temp_dir = tempdir()?;
    let records: Vec<Value> = (0..250)
        .map(|i| record(&format!("Shirt {i}"), &format!("SKU-{i:04}"), "PKR 1,000"))
        .collect();
    let input = write_snapshot(temp_dir.path(), Value::Array(records)).await?;

    run_load(temp_dir.path(), &input).await?;

    let repo = open_repository(temp_dir.path()).await?;
    assert_eq!(repo.count_products().await?, 250);
    let last = repo.find_by_sku("SKU-0249").await?.unwrap();
    assert_eq!(last.price, 1000.0);
    Ok(())
}

#[tokio::test]
async fn colliding_and_blank_skus_get_placeholder_rows() -> Result<()> {
    let temp_dir = tempdir()?;
    let input = write_snapshot(
        temp_dir.path(),
        json!([
            record("First", "ABC-1", "100"),
            record("Second", "ABC-1", "200"),
            record("Third", "", "300"),
        ]),
    )
    .await?;

    run_load(temp_dir.path(), &input).await?;

    let repo = open_repository(temp_dir.path()).await?;
    assert_eq!(repo.count_products().await?, 3);
    // the first holder keeps the raw SKU; the rest walk to free placeholders
    assert_eq!(repo.find_by_sku("ABC-1").await?.unwrap().product_name, "First");
    assert_eq!(repo.find_by_sku("UnknownSKU_3").await?.unwrap().product_name, "Second");
    assert_eq!(repo.find_by_sku("UnknownSKU_4").await?.unwrap().product_name, "Third");
    Ok(())
}

#[tokio::test]
async fn invalid_records_are_skipped_but_valid_ones_land() -> Result<()> {
    let temp_dir = tempdir()?;
    let input = write_snapshot(
        temp_dir.path(),
        json!([
            record("Kept One", "K-1", "100"),
            {"Product Name": "No Price", "Product ID": "K-2"},
            "not an object at all",
            record("Kept Two", "K-4", "400"),
        ]),
    )
    .await?;

    run_load(temp_dir.path(), &input).await?;

    let repo = open_repository(temp_dir.path()).await?;
    assert_eq!(repo.count_products().await?, 2);
    assert!(repo.find_by_sku("K-1").await?.is_some());
    assert!(repo.find_by_sku("K-4").await?.is_some());
    Ok(())
}

#[tokio::test]
async fn empty_strings_are_kept_while_missing_keys_get_defaults() -> Result<()> {
    let temp_dir = tempdir()?;
    let input = write_snapshot(
        temp_dir.path(),
        json!([
            // Description present but empty: kept as-is
            {"Product Name": "Blank Description", "Product ID": "B-1",
             "Price": "100", "Description": ""},
            // Description missing entirely: placeholder applies
            {"Product Name": "No Description", "Product ID": "B-2", "Price": "100"}
        ]),
    )
    .await?;

    run_load(temp_dir.path(), &input).await?;

    let repo = open_repository(temp_dir.path()).await?;
    assert_eq!(repo.find_by_sku("B-1").await?.unwrap().description, "");
    assert_eq!(
        repo.find_by_sku("B-2").await?.unwrap().description,
        "No description available"
    );
    // fields the loader never saw fall back to their documented defaults
    let second = repo.find_by_sku("B-2").await?.unwrap();
    assert_eq!(second.category, "Uncategorized");
    assert_eq!(second.availability_status, "Out of Stock");
    assert_eq!(second.product_images, "[]");
    assert_eq!(second.additional_attributes, "{}");
    Ok(())
}
