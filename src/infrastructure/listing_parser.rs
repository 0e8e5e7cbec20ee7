//! Listing page parser
//!
//! Extracts product records from category listing HTML. Every field has a
//! fallback, so a sparse card still yields a record; only the complete
//! absence of card nodes means an empty page, which is the pagination
//! loop's stop signal.

use scraper::{ElementRef, Html, Selector};
use serde_json::Map;
use tracing::debug;
use url::Url;

use crate::domain::normalize::SkuAllocator;
use crate::domain::product::ProductRecord;
use crate::infrastructure::config::ListingSelectors;
use crate::infrastructure::parse_error::{ParseError, ParseResult};

/// Parser for product listing pages with compiled selectors
pub struct ListingParser {
    card_selector: Selector,
    name_selector: Selector,
    price_selector: Selector,
    image_selector: Selector,
    sold_out_selector: Selector,
    sku_attribute: String,
}

impl ListingParser {
    /// Create a parser with the default storefront selectors
    pub fn new() -> ParseResult<Self> {
        Self::with_selectors(&ListingSelectors::default())
    }

    /// Create a parser with custom selector configuration
    pub fn with_selectors(selectors: &ListingSelectors) -> ParseResult<Self> {
        Ok(Self {
            card_selector: compile_selector(&selectors.product_card)?,
            name_selector: compile_selector(&selectors.name)?,
            price_selector: compile_selector(&selectors.price)?,
            image_selector: compile_selector(&selectors.image)?,
            sold_out_selector: compile_selector(&selectors.sold_out_badge)?,
            sku_attribute: selectors.sku_attribute.clone(),
        })
    }

    /// Extract one record per product card on the page.
    ///
    /// The SKU allocator spans the whole category so records stay unique
    /// across pages; cards without a SKU attribute (or with one already
    /// taken) get counter-based placeholders.
    pub fn parse_listing(
        &self,
        html: &str,
        category: &str,
        skus: &mut SkuAllocator,
    ) -> Vec<ProductRecord> {
        let document = Html::parse_document(html);
        let cards: Vec<ElementRef> = document.select(&self.card_selector).collect();
        debug!("Found {} product cards", cards.len());

        let mut records = Vec::with_capacity(cards.len());
        for (index, card) in cards.iter().enumerate() {
            records.push(self.extract_record(card, index + 1, category, skus));
        }

        records
    }

    /// Extract a single product card, falling back field by field
    fn extract_record(
        &self,
        card: &ElementRef,
        position: usize,
        category: &str,
        skus: &mut SkuAllocator,
    ) -> ProductRecord {
        let name = extract_text(card, &self.name_selector)
            .unwrap_or_else(|| "Unknown Product".to_string());

        let raw_sku = card.value().attr(&self.sku_attribute).unwrap_or("");
        let sku = skus.assign(raw_sku, position);

        let price =
            extract_text(card, &self.price_selector).unwrap_or_else(|| "N/A".to_string());

        let image = card
            .select(&self.image_selector)
            .next()
            .and_then(|img| img.value().attr("src"))
            .map(str::to_string)
            .unwrap_or_else(|| "No Image".to_string());

        let sold_out = card.select(&self.sold_out_selector).next().is_some();
        let availability = if sold_out { "Out of Stock" } else { "In Stock" };

        ProductRecord {
            name,
            sku,
            category: category.to_string(),
            price,
            description: None,
            availability: availability.to_string(),
            images: vec![image],
            attributes: Map::new(),
        }
    }
}

/// Compile a single CSS selector string
fn compile_selector(selector: &str) -> ParseResult<Selector> {
    Selector::parse(selector).map_err(|e| ParseError::invalid_selector(selector, e))
}

/// Extract trimmed text for the first match of a selector, if non-empty
fn extract_text(element: &ElementRef, selector: &Selector) -> Option<String> {
    element
        .select(selector)
        .next()
        .map(|e| e.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
}

/// Derive the category label from the trailing path segment of a category
/// URL, with a ".html" suffix stripped.
pub fn category_from_url(category_url: &str) -> String {
    let Ok(url) = Url::parse(category_url) else {
        return "Uncategorized".to_string();
    };

    url.path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
        .map(|segment| segment.strip_suffix(".html").unwrap_or(segment).to_string())
        .filter(|label| !label.is_empty())
        .unwrap_or_else(|| "Uncategorized".to_string())
}
