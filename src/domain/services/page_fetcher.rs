//! Transport seam for the pagination loop.

use anyhow::Result;
use async_trait::async_trait;

/// Fetches one listing page as HTML.
///
/// The pagination loop only needs "give me the body of this URL or fail";
/// keeping that behind a trait lets the loop be driven by a scripted
/// fetcher in tests.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch the page and return its HTML body. Errors are not retried;
    /// a failure ends pagination for the current category.
    async fn fetch_page(&self, url: &str) -> Result<String>;
}
