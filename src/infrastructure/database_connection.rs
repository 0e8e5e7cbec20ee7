// Database connection and pool management
// This module handles SQLite database connections using sqlx

use std::path::Path;

use anyhow::Result;
use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};
use tracing::info;

pub struct DatabaseConnection {
    pool: SqlitePool,
}

impl DatabaseConnection {
    /// Open a pool against the given database URL, creating the database
    /// file and its parent directory when they do not exist yet.
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let db_path = if database_url.starts_with("sqlite://") {
            database_url.trim_start_matches("sqlite://")
        } else if database_url.starts_with("sqlite:") {
            database_url.trim_start_matches("sqlite:")
        } else {
            database_url
        };

        if let Some(parent) = Path::new(db_path).parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        if !Path::new(db_path).exists() {
            std::fs::File::create(db_path)?;
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        info!("Connected to SQLite!");
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create the products table if it is missing so a first run against a
    /// fresh database file works.
    pub async fn migrate(&self) -> Result<()> {
        let create_products_sql = r#"
            CREATE TABLE IF NOT EXISTS products (
                product_sku TEXT PRIMARY KEY,
                product_name TEXT NOT NULL,
                category TEXT NOT NULL,
                price REAL NOT NULL,
                description TEXT NOT NULL,
                availability_status TEXT NOT NULL,
                product_images TEXT NOT NULL,
                additional_attributes TEXT NOT NULL,
                last_updated DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
        "#;

        sqlx::query(create_products_sql).execute(&self.pool).await?;

        Ok(())
    }

    /// Close the pool, releasing the underlying connections.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
