//! Configuration infrastructure
//!
//! Loading and management of scrape/load settings. Both binaries share one
//! config file; the scraper reads the `scraping` section, the loader reads
//! the `loading` and `database` sections.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::{info, warn};

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Scraper settings (categories, pacing, selectors)
    pub scraping: ScrapingConfig,

    /// Loader settings (interchange file, batching)
    pub loading: LoadingConfig,

    /// Destination database settings
    pub database: DatabaseConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Scraper settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapingConfig {
    /// Category listing URLs to paginate through
    pub category_urls: Vec<String>,

    /// Hard cap on pages fetched per category
    pub page_limit: u32,

    /// Pause between page fetches in milliseconds
    pub page_delay_ms: u64,

    /// Pause between categories in milliseconds
    pub category_delay_ms: u64,

    /// Timeout for a single page request in seconds
    pub request_timeout_seconds: u64,

    /// User-Agent header sent with every request
    pub user_agent: String,

    /// Directory the timestamped snapshot is written to
    pub output_dir: PathBuf,

    /// CSS selectors for the listing markup
    pub selectors: ListingSelectors,
}

/// CSS selectors for product listing pages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingSelectors {
    /// One product card in the listing grid
    pub product_card: String,

    /// Display name inside a card
    pub name: String,

    /// Price text inside a card
    pub price: String,

    /// Product image inside a card (first match wins)
    pub image: String,

    /// Marker element present only on sold-out cards
    pub sold_out_badge: String,

    /// Attribute on the card carrying the SKU
    pub sku_attribute: String,
}

/// Loader settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadingConfig {
    /// Interchange file the loader reads
    pub input_file: PathBuf,

    /// Rows per upsert batch
    pub batch_size: usize,
}

/// Destination database settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite database file
    pub path: PathBuf,

    /// Pool size; the loader only ever uses one connection
    pub max_connections: u32,
}

impl DatabaseConfig {
    /// Connection URL for sqlx
    pub fn database_url(&self) -> String {
        format!("sqlite:{}", self.path.display())
    }
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace"
    pub level: String,

    /// Enable console output
    pub console_output: bool,

    /// Enable file output
    pub file_output: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            scraping: ScrapingConfig::default(),
            loading: LoadingConfig::default(),
            database: DatabaseConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ScrapingConfig {
    fn default() -> Self {
        Self {
            category_urls: storefront::default_category_urls(),
            page_limit: defaults::PAGE_LIMIT,
            page_delay_ms: defaults::PAGE_DELAY_MS,
            category_delay_ms: defaults::CATEGORY_DELAY_MS,
            request_timeout_seconds: defaults::REQUEST_TIMEOUT_SECONDS,
            user_agent: defaults::USER_AGENT.to_string(),
            output_dir: PathBuf::from(defaults::OUTPUT_DIR),
            selectors: ListingSelectors::default(),
        }
    }
}

impl Default for ListingSelectors {
    fn default() -> Self {
        Self {
            product_card: defaults::SELECTOR_PRODUCT_CARD.to_string(),
            name: defaults::SELECTOR_NAME.to_string(),
            price: defaults::SELECTOR_PRICE.to_string(),
            image: defaults::SELECTOR_IMAGE.to_string(),
            sold_out_badge: defaults::SELECTOR_SOLD_OUT_BADGE.to_string(),
            sku_attribute: defaults::SKU_ATTRIBUTE.to_string(),
        }
    }
}

impl Default for LoadingConfig {
    fn default() -> Self {
        Self {
            input_file: PathBuf::from(defaults::INPUT_FILE),
            batch_size: defaults::DB_BATCH_SIZE,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(defaults::DATABASE_FILE),
            max_connections: defaults::MAX_DB_CONNECTIONS,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::LOG_LEVEL.to_string(),
            console_output: defaults::LOG_CONSOLE_OUTPUT,
            file_output: defaults::LOG_FILE_OUTPUT,
        }
    }
}

/// Configuration manager for loading and saving settings
pub struct ConfigManager {
    pub config_path: PathBuf,
}

impl ConfigManager {
    /// Get the application configuration directory
    pub fn get_config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get user config directory")?
            .join("shop-harvest");

        Ok(config_dir)
    }

    /// Get application data directory (log files live under here)
    pub fn get_app_data_dir() -> Result<PathBuf> {
        let data_dir = dirs::data_local_dir()
            .context("Failed to get user data directory")?
            .join("shop-harvest");

        Ok(data_dir)
    }

    /// Create a manager pointing at the default config location
    pub fn new() -> Result<Self> {
        let config_path = Self::get_config_dir()?.join("config.json");
        Ok(Self { config_path })
    }

    /// Create a manager pointing at an explicit config file
    pub fn with_path(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    /// Load configuration from file, creating the default if it doesn't exist.
    /// An unreadable or unparsable file falls back to defaults with a warning
    /// instead of stopping a batch run.
    pub async fn load_config(&self) -> Result<AppConfig> {
        if !self.config_path.exists() {
            info!("Configuration file not found, creating default: {:?}", self.config_path);
            let default_config = AppConfig::default();
            self.save_config(&default_config).await?;
            return Ok(default_config);
        }

        let content = fs::read_to_string(&self.config_path)
            .await
            .context("Failed to read configuration file")?;

        match serde_json::from_str::<AppConfig>(&content) {
            Ok(config) => {
                info!("Loaded configuration from: {:?}", self.config_path);
                Ok(config)
            }
            Err(parse_error) => {
                warn!("⚠️  Configuration file could not be parsed: {parse_error}");
                warn!("⚠️  Continuing with default configuration");
                Ok(AppConfig::default())
            }
        }
    }

    /// Save configuration, creating the parent directory on first use
    pub async fn save_config(&self, config: &AppConfig) -> Result<()> {
        if let Some(config_dir) = self.config_path.parent() {
            if !config_dir.exists() {
                fs::create_dir_all(config_dir)
                    .await
                    .context("Failed to create config directory")?;
                info!("📁 Created configuration directory: {:?}", config_dir);
            }
        }

        let content =
            serde_json::to_string_pretty(config).context("Failed to serialize configuration")?;
        fs::write(&self.config_path, content)
            .await
            .context("Failed to write configuration file")?;

        Ok(())
    }
}

/// Storefront URLs and pagination layout
pub mod storefront {
    /// Base URL of the source shop
    pub const BASE_URL: &str = "https://shop.example.com";

    /// Category slugs crawled by default. The slug (minus ".html" once in
    /// URL form) doubles as the category label.
    pub const CATEGORY_SLUGS: &[&str] = &["shirts", "trousers", "accessories"];

    /// Listing URL for one category slug.
    pub fn category_url(slug: &str) -> String {
        format!("{BASE_URL}/collections/{slug}.html")
    }

    /// Category listing URLs crawled by default.
    pub fn default_category_urls() -> Vec<String> {
        CATEGORY_SLUGS.iter().copied().map(category_url).collect()
    }

    /// Build the URL for one listing page. Pagination is a plain `p` query
    /// parameter counted from 1; page 1 is requested explicitly.
    pub fn page_url(category_url: &str, page: u32) -> String {
        format!("{category_url}?p={page}")
    }
}

/// Default configuration values
pub mod defaults {
    /// Hard cap on pages fetched per category
    pub const PAGE_LIMIT: u32 = 20;

    /// Default pause between page fetches in milliseconds
    pub const PAGE_DELAY_MS: u64 = 2000;

    /// Default pause between categories in milliseconds
    pub const CATEGORY_DELAY_MS: u64 = 5000;

    /// Default request timeout in seconds
    pub const REQUEST_TIMEOUT_SECONDS: u64 = 30;

    /// Default User-Agent header
    pub const USER_AGENT: &str =
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

    /// Default snapshot output directory (current working directory)
    pub const OUTPUT_DIR: &str = ".";

    /// Default batch size for database operations
    pub const DB_BATCH_SIZE: usize = 100;

    /// Default connection pool cap
    pub const MAX_DB_CONNECTIONS: u32 = 10;

    /// Interchange file the loader reads by default
    pub const INPUT_FILE: &str = "extracted_products.json";

    /// Default SQLite database file
    pub const DATABASE_FILE: &str = "products.db";

    /// Default log level
    pub const LOG_LEVEL: &str = "info";

    /// Default console output
    pub const LOG_CONSOLE_OUTPUT: bool = true;

    /// Default file output
    pub const LOG_FILE_OUTPUT: bool = true;

    // Listing selectors for the storefront theme
    /// One product card
    pub const SELECTOR_PRODUCT_CARD: &str = "div.t4s-product";

    /// Display name inside a card
    pub const SELECTOR_NAME: &str = ".t4s-product-title";

    /// Price text inside a card
    pub const SELECTOR_PRICE: &str = "div.t4s-product-price";

    /// Product image inside a card
    pub const SELECTOR_IMAGE: &str = "img";

    /// Sold-out badge element
    pub const SELECTOR_SOLD_OUT_BADGE: &str = ".t4s-badge-soldout";

    /// Card attribute carrying the SKU
    pub const SKU_ATTRIBUTE: &str = "data-sku";
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_cover_the_documented_limits() {
        let config = AppConfig::default();
        assert_eq!(config.scraping.page_limit, 20);
        assert_eq!(config.loading.batch_size, 100);
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.loading.input_file, PathBuf::from("extracted_products.json"));
        assert!(!config.scraping.category_urls.is_empty());
    }

    #[test]
    fn page_urls_count_from_one() {
        let url = storefront::page_url("https://shop.example.com/collections/shirts.html", 1);
        assert_eq!(url, "https://shop.example.com/collections/shirts.html?p=1");

        let url = storefront::page_url("https://shop.example.com/collections/shirts.html", 7);
        assert_eq!(url, "https://shop.example.com/collections/shirts.html?p=7");
    }

    #[test]
    fn default_category_urls_hang_off_the_base_url() {
        let urls = storefront::default_category_urls();
        assert_eq!(urls.len(), storefront::CATEGORY_SLUGS.len());
        for url in &urls {
            assert!(url.starts_with(storefront::BASE_URL));
            assert!(url.ends_with(".html"));
        }
        assert_eq!(urls[0], "https://shop.example.com/collections/shirts.html");
    }

    #[tokio::test]
    async fn load_config_creates_default_file_on_first_run() {
        let temp_dir = TempDir::new().unwrap();
        let manager = ConfigManager::with_path(temp_dir.path().join("config.json"));

        let config = manager.load_config().await.unwrap();
        assert_eq!(config.scraping.page_limit, 20);
        assert!(manager.config_path.exists());
    }

    #[tokio::test]
    async fn saved_config_round_trips() {
        let temp_dir = TempDir::new().unwrap();
        let manager = ConfigManager::with_path(temp_dir.path().join("config.json"));

        let mut config = AppConfig::default();
        config.scraping.page_limit = 5;
        config.scraping.category_urls = vec!["https://shop.example.com/c/sale.html".to_string()];
        manager.save_config(&config).await.unwrap();

        let loaded = manager.load_config().await.unwrap();
        assert_eq!(loaded.scraping.page_limit, 5);
        assert_eq!(loaded.scraping.category_urls.len(), 1);
    }

    #[tokio::test]
    async fn unparsable_config_falls_back_to_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        tokio::fs::write(&config_path, "{ not json").await.unwrap();

        let manager = ConfigManager::with_path(config_path);
        let config = manager.load_config().await.unwrap();
        assert_eq!(config.scraping.page_limit, 20);
    }

    #[derive(Clone, Default)]
    struct MemoryWriter(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl MemoryWriter {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl std::io::Write for MemoryWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for MemoryWriter {
        type Writer = MemoryWriter;

        fn make_writer(&'a self) -> MemoryWriter {
            self.clone()
        }
    }

    // The binaries give load_config a bootstrap subscriber; its first-run
    // notice must come through rather than be dropped pre-init.
    #[tokio::test]
    async fn first_run_notice_reaches_a_bootstrap_subscriber() {
        use tracing::instrument::WithSubscriber;

        let temp_dir = TempDir::new().unwrap();
        let manager = ConfigManager::with_path(temp_dir.path().join("config.json"));

        let writer = MemoryWriter::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(writer.clone())
            .with_ansi(false)
            .finish();
        manager.load_config().with_subscriber(subscriber).await.unwrap();

        assert!(writer.contents().contains("Configuration file not found, creating default"));
    }
}
