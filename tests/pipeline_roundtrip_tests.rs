//! Full pipeline test: scraped listings feed the loader unchanged
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tempfile::tempdir;

use shop_harvest::application::{LoadFlow, ScrapeFlow};
use shop_harvest::domain::PageFetcher;
use shop_harvest::infrastructure::config::ScrapingConfig;
use shop_harvest::infrastructure::{
    DatabaseConnection, ListingParser, ProductRepository, save_snapshot,
};

struct CannedFetcher {
    bodies: HashMap<String, String>,
}

#[async_trait]
impl PageFetcher for CannedFetcher {
    async fn fetch_page(&self, url: &str) -> Result<String> {
        Ok(self
            .bodies
            .get(url)
            .cloned()
            .unwrap_or_else(|| "<html><body></body></html>".to_string()))
    }
}

async fn open_db(dir: &Path) -> Result<DatabaseConnection> {
    let database_url = format!("sqlite:{}", dir.join("products.db").display());
    DatabaseConnection::new(&database_url, 10).await
}

#[tokio::test]
async fn scraped_listing_lands_in_the_products_table() -> Result<()> {
    let temp_dir = tempdir()?;
    let category = "https://shop.example.com/collections/shirts.html";

    let listing = r#"
        <html><body>
          <div class="t4s-product" data-sku="SHIRT-001">
            <h3 class="t4s-product-title">Oxford Shirt</h3>
            <div class="t4s-product-price">PKR 2,450</div>
            <img src="https://cdn.example.com/oxford.jpg">
          </div>
          <div class="t4s-product">
            <h3 class="t4s-product-title">Linen Shirt</h3>
            <div class="t4s-product-price">PKR 3,100</div>
            <img src="https://cdn.example.com/linen.jpg">
            <span class="t4s-badge-soldout">Sold Out</span>
          </div>
        </body></html>
    "#;

    let mut bodies = HashMap::new();
    bodies.insert(format!("{category}?p=1"), listing.to_string());
    let fetcher = Arc::new(CannedFetcher { bodies });

    let config = ScrapingConfig {
        category_urls: vec![category.to_string()],
        page_delay_ms: 0,
        category_delay_ms: 0,
        ..ScrapingConfig::default()
    };
    let parser = ListingParser::with_selectors(&config.selectors)?;

    let records = ScrapeFlow::new(fetcher, parser, config).run().await;
    assert_eq!(records.len(), 2);

    let snapshot_path = save_snapshot(&records, temp_dir.path()).await?.unwrap();

    let db = open_db(temp_dir.path()).await?;
    LoadFlow::new(db, 100).run(&snapshot_path).await?;

    let db = open_db(temp_dir.path()).await?;
    let repo = ProductRepository::new(db.pool().clone());
    assert_eq!(repo.count_products().await?, 2);

    let shirt = repo.find_by_sku("SHIRT-001").await?.unwrap();
    assert_eq!(shirt.product_name, "Oxford Shirt");
    assert_eq!(shirt.category, "shirts");
    assert_eq!(shirt.price, 2450.0);
    assert_eq!(shirt.availability_status, "In Stock");
    assert_eq!(shirt.description, "No description available");
    assert_eq!(shirt.product_images, r#"["https://cdn.example.com/oxford.jpg"]"#);

    // the second card had no SKU attribute; the page position fills in
    let linen = repo.find_by_sku("UnknownSKU_2").await?.unwrap();
    assert_eq!(linen.product_name, "Linen Shirt");
    assert_eq!(linen.availability_status, "Out of Stock");
    Ok(())
}
