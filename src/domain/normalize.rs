//! Validation and normalization of raw interchange records.
//!
//! The loader treats its input as arbitrary JSON: records may be missing
//! fields, carry any of three SKU key names, or not be objects at all.
//! This module turns that input into `NormalizedProduct` rows, skipping
//! what cannot be salvaged and defaulting what can.

use std::collections::HashSet;

use serde_json::{Map, Value};
use tracing::{error, info, warn};

use crate::domain::product::NormalizedProduct;

/// Candidate SKU key names, checked in order against the first
/// well-formed record of a batch.
pub const SKU_KEY_PRECEDENCE: [&str; 3] = ["Product ID", "SKU", "ID"];

/// Pick the SKU key for a whole batch from its first well-formed record.
pub fn detect_sku_key(first: &Map<String, Value>) -> Option<&'static str> {
    SKU_KEY_PRECEDENCE
        .iter()
        .find(|key| first.contains_key(**key))
        .copied()
}

/// Parse a free-text price such as `"PKR 12,500"` into a numeric value.
/// Returns `None` when nothing numeric remains after stripping markers.
pub fn parse_price(raw: &str) -> Option<f64> {
    raw.replace("PKR", "").replace(',', "").trim().parse().ok()
}

/// Hands out unique SKUs for one run.
///
/// The first holder of a raw SKU keeps it; collisions and blank SKUs get
/// `UnknownSKU_{n}` placeholders, where `n` starts at the record's 1-based
/// position and increments until an unused name is found. Placeholder
/// numbers can therefore skip values; that is expected.
#[derive(Debug, Default)]
pub struct SkuAllocator {
    used: HashSet<String>,
}

impl SkuAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assign(&mut self, raw: &str, position: usize) -> String {
        let mut counter = position;
        let trimmed = raw.trim();
        let mut sku = if trimmed.is_empty() {
            format!("UnknownSKU_{counter}")
        } else {
            trimmed.to_string()
        };
        while self.used.contains(&sku) {
            counter += 1;
            sku = format!("UnknownSKU_{counter}");
        }
        self.used.insert(sku.clone());
        sku
    }
}

/// String field lookup with a default for missing or non-string values.
/// A present-but-empty string is kept as-is, not defaulted.
fn field_str<'a>(obj: &'a Map<String, Value>, key: &str, default: &'a str) -> &'a str {
    obj.get(key).and_then(Value::as_str).unwrap_or(default)
}

/// Validate and normalize a single record at its 1-based batch position.
///
/// Returns `None` for records that must be skipped: non-objects, records
/// without a non-empty name or price, and records whose image/attribute
/// sub-structures cannot be re-serialized.
pub fn normalize_record(
    value: &Value,
    position: usize,
    sku_key: &str,
    skus: &mut SkuAllocator,
) -> Option<NormalizedProduct> {
    let Some(obj) = value.as_object() else {
        warn!("Skipping invalid product at index {position}: {value}");
        return None;
    };

    let name = obj
        .get("Product Name")
        .and_then(Value::as_str)
        .map(str::trim)
        .unwrap_or("");
    let price_raw = obj
        .get("Price")
        .and_then(Value::as_str)
        .map(str::trim)
        .unwrap_or("");
    if name.is_empty() || price_raw.is_empty() {
        warn!("Skipping product at index {position} due to missing required fields: {value}");
        return None;
    }

    let raw_sku = obj.get(sku_key).and_then(Value::as_str).unwrap_or("");
    let product_sku = skus.assign(raw_sku, position);

    let price = match parse_price(price_raw) {
        Some(value) => value,
        None => {
            warn!("Invalid price for product {product_sku}. Setting price to 0.0.");
            0.0
        }
    };

    let images = obj
        .get("Product Images")
        .cloned()
        .unwrap_or_else(|| Value::Array(Vec::new()));
    let attributes = obj
        .get("Additional Attributes")
        .cloned()
        .unwrap_or_else(|| Value::Object(Map::new()));
    let (product_images, additional_attributes) =
        match (serde_json::to_string(&images), serde_json::to_string(&attributes)) {
            (Ok(images_json), Ok(attributes_json)) => (images_json, attributes_json),
            _ => {
                error!("Invalid JSON data for product {product_sku}. Skipping this product.");
                return None;
            }
        };

    Some(NormalizedProduct {
        product_sku,
        product_name: field_str(obj, "Product Name", "Unknown Product").trim().to_string(),
        category: field_str(obj, "Category", "Uncategorized").trim().to_string(),
        price,
        description: field_str(obj, "Description", "No description available")
            .trim()
            .to_string(),
        availability_status: field_str(obj, "Availability", "Out of Stock").trim().to_string(),
        product_images,
        additional_attributes,
    })
}

/// Normalize a whole batch, deduplicating SKUs across it.
pub fn normalize_batch(records: &[Value], sku_key: &str) -> Vec<NormalizedProduct> {
    let total = records.len();
    let mut skus = SkuAllocator::new();
    let mut rows = Vec::with_capacity(total);

    for (position, value) in records.iter().enumerate() {
        let position = position + 1;
        if let Some(row) = normalize_record(value, position, sku_key, &mut skus) {
            info!(
                "Processing {position}/{total}: {} | {}",
                row.product_sku, row.product_name
            );
            rows.push(row);
        }
    }

    rows
}
