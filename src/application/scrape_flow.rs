//! Scraper pipeline use case
//!
//! Walks every configured category, paginating with `?p=N` until a page
//! yields no product cards, the page cap is reached, or the transport
//! fails. Failures end the current category only; records collected so
//! far are kept and the run moves on to the next category.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{error, info};

use crate::domain::normalize::SkuAllocator;
use crate::domain::product::ProductRecord;
use crate::domain::services::PageFetcher;
use crate::infrastructure::config::{ScrapingConfig, storefront};
use crate::infrastructure::listing_parser::{ListingParser, category_from_url};

pub struct ScrapeFlow {
    fetcher: Arc<dyn PageFetcher>,
    parser: ListingParser,
    config: ScrapingConfig,
}

impl ScrapeFlow {
    pub fn new(fetcher: Arc<dyn PageFetcher>, parser: ListingParser, config: ScrapingConfig) -> Self {
        Self {
            fetcher,
            parser,
            config,
        }
    }

    /// Harvest every configured category and return all extracted records.
    pub async fn run(&self) -> Vec<ProductRecord> {
        let category_count = self.config.category_urls.len();
        info!("🚀 Starting scrape of {category_count} categories");

        let mut collected = Vec::new();
        for (index, category_url) in self.config.category_urls.iter().enumerate() {
            let records = self.harvest_category(category_url).await;
            collected.extend(records);

            if index + 1 < category_count {
                sleep(Duration::from_millis(self.config.category_delay_ms)).await;
            }
        }

        info!(
            "✅ Scraping finished: {} products across {category_count} categories",
            collected.len()
        );
        collected
    }

    /// Paginate one category. Synthetic SKU numbering restarts here, so
    /// collision handling stays local to the category being walked.
    async fn harvest_category(&self, category_url: &str) -> Vec<ProductRecord> {
        let category = category_from_url(category_url);
        info!("Scraping category: {category} ({category_url})");

        let mut skus = SkuAllocator::new();
        let mut records = Vec::new();

        for page in 1..=self.config.page_limit {
            let url = storefront::page_url(category_url, page);
            let body = match self.fetcher.fetch_page(&url).await {
                Ok(body) => body,
                Err(e) => {
                    error!("❌ Error fetching {url}: {e:#}");
                    break;
                }
            };

            let page_records = self.parser.parse_listing(&body, &category, &mut skus);
            if page_records.is_empty() {
                info!("No products found on page {page}. Moving to next category.");
                break;
            }

            info!("Page {page}: collected {} products", page_records.len());
            records.extend(page_records);

            if page < self.config.page_limit {
                sleep(Duration::from_millis(self.config.page_delay_ms)).await;
            }
        }

        info!("✅ Category {category} complete: {} products", records.len());
        records
    }
}
