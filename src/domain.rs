//! Domain module - product records and the rules that shape them.
//!
//! Modern Rust module organization (Rust 2018+ style):
//! - Each module is its own file in the domain/ directory
//! - Public exports are defined here for convenience

pub mod normalize;
pub mod product;
pub mod services;

pub use normalize::{SkuAllocator, detect_sku_key, normalize_batch, parse_price};
pub use product::{NormalizedProduct, ProductRecord};
pub use services::PageFetcher;
