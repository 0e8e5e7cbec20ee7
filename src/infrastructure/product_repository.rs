//! Repository for the products table
//!
//! All writes go through the batched upsert: rows are inserted in fixed
//! size batches, each batch in its own transaction. A failing batch aborts
//! the remaining ones; batches already committed stay committed.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use tracing::info;

use crate::domain::product::NormalizedProduct;

/// One row as stored, timestamp included. Read back by tests and tooling.
#[derive(Debug, Clone)]
pub struct StoredProduct {
    pub product_sku: String,
    pub product_name: String,
    pub category: String,
    pub price: f64,
    pub description: String,
    pub availability_status: String,
    pub product_images: String,
    pub additional_attributes: String,
    pub last_updated: DateTime<Utc>,
}

#[derive(Clone)]
pub struct ProductRepository {
    pool: Arc<SqlitePool>,
}

impl ProductRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool: Arc::new(pool) }
    }

    /// Upsert the whole row set in fixed-size chunks, committing after
    /// each chunk. Returns the number of rows written. The first failing
    /// chunk aborts everything that follows it.
    pub async fn upsert_in_batches(
        &self,
        rows: &[NormalizedProduct],
        batch_size: usize,
    ) -> Result<usize> {
        let batch_size = batch_size.max(1);

        for (index, batch) in rows.chunks(batch_size).enumerate() {
            let batch_number = index + 1;
            self.upsert_batch(batch)
                .await
                .with_context(|| format!("Error during insert (batch {batch_number})"))?;
            info!("Inserted batch {batch_number}");
        }

        Ok(rows.len())
    }

    /// Upsert one batch inside a single transaction
    async fn upsert_batch(&self, batch: &[NormalizedProduct]) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        let now = Utc::now();

        for row in batch {
            sqlx::query(
                r#"
                INSERT INTO products
                (product_sku, product_name, category, price, description,
                 availability_status, product_images, additional_attributes, last_updated)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
                ON CONFLICT(product_sku) DO UPDATE SET
                    product_name = excluded.product_name,
                    category = excluded.category,
                    price = excluded.price,
                    description = excluded.description,
                    availability_status = excluded.availability_status,
                    product_images = excluded.product_images,
                    additional_attributes = excluded.additional_attributes,
                    last_updated = excluded.last_updated
                "#,
            )
            .bind(&row.product_sku)
            .bind(&row.product_name)
            .bind(&row.category)
            .bind(row.price)
            .bind(&row.description)
            .bind(&row.availability_status)
            .bind(&row.product_images)
            .bind(&row.additional_attributes)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Count rows in the products table
    pub async fn count_products(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) as cnt FROM products")
            .fetch_one(&*self.pool)
            .await?;
        Ok(row.get("cnt"))
    }

    /// Fetch one stored row by SKU
    pub async fn find_by_sku(&self, sku: &str) -> Result<Option<StoredProduct>> {
        let row = sqlx::query(
            r#"
            SELECT product_sku, product_name, category, price, description,
                   availability_status, product_images, additional_attributes, last_updated
            FROM products
            WHERE product_sku = ?
            "#,
        )
        .bind(sku)
        .fetch_optional(&*self.pool)
        .await?;

        Ok(row.map(|row| StoredProduct {
            product_sku: row.get("product_sku"),
            product_name: row.get("product_name"),
            category: row.get("category"),
            price: row.get("price"),
            description: row.get("description"),
            availability_status: row.get("availability_status"),
            product_images: row.get("product_images"),
            additional_attributes: row.get("additional_attributes"),
            last_updated: row.get("last_updated"),
        }))
    }
}
