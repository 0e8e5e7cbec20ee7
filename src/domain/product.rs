//! Product records as they travel through the pipeline.
//!
//! `ProductRecord` is the interchange unit written by the scraper and read
//! back by the loader (Title Case JSON keys, matching the snapshot format).
//! `NormalizedProduct` is the flattened row form produced by validation,
//! field-for-field in destination column order.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One product as extracted from a listing page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductRecord {
    #[serde(rename = "Product Name")]
    pub name: String,
    #[serde(rename = "Product ID")]
    pub sku: String,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Price")]
    pub price: String,
    /// Listing pages carry no description; the loader fills in its
    /// placeholder when the key is absent.
    #[serde(rename = "Description", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "Availability")]
    pub availability: String,
    #[serde(rename = "Product Images")]
    pub images: Vec<String>,
    #[serde(rename = "Additional Attributes")]
    pub attributes: Map<String, Value>,
}

/// One validated product ready for the `products` table.
///
/// Fields are named after their destination columns; `last_updated` is not
/// carried here because the store stamps it at write time.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedProduct {
    pub product_sku: String,
    pub product_name: String,
    pub category: String,
    pub price: f64,
    pub description: String,
    pub availability_status: String,
    pub product_images: String,
    pub additional_attributes: String,
}
