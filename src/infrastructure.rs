//! Infrastructure layer for database access, parsing, and external integrations
//!
//! This module provides the SQLite connection and repository, the HTTP
//! client, HTML listing parsing, snapshot files, configuration, and logging.

pub mod config; // Configuration constants and helpers
pub mod database_connection;
pub mod http_client;
pub mod listing_parser; // Listing page extraction
pub mod logging; // Logging infrastructure
pub mod parse_error;
pub mod product_repository;
pub mod snapshot; // JSON interchange files

// Re-export commonly used items
pub use config::{AppConfig, ConfigManager, storefront};
pub use database_connection::DatabaseConnection;
pub use http_client::{HttpClient, HttpClientConfig};
pub use listing_parser::ListingParser;
pub use logging::{get_log_directory, init_logging_with_config};
pub use parse_error::{ParseError, ParseResult};
pub use product_repository::{ProductRepository, StoredProduct};
pub use snapshot::{load_snapshot, save_snapshot};
