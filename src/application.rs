//! Application layer module
//!
//! Use cases that orchestrate the domain logic: one flow per pipeline.

pub mod load_flow;
pub mod scrape_flow;

pub use load_flow::LoadFlow;
pub use scrape_flow::ScrapeFlow;
