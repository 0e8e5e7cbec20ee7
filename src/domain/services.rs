//! Domain service traits.

pub mod page_fetcher;

pub use page_fetcher::PageFetcher;
