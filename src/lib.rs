//! Shop Harvest - E-commerce Product Scraping and Loading
//!
//! Two batch pipelines sharing one JSON interchange format: a scraper that
//! walks storefront category listings into snapshot files, and a loader
//! that validates snapshots and upserts them into a relational store.

// Module declarations
pub mod application;
pub mod domain;
pub mod infrastructure;
