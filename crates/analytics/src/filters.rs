//! Row selection over sales and products. Every filter is stable: the kept rows
//! appear in their input order.

use chrono::NaiveDate;
use core_types::{EnrichedProduct, Product, SaleRecord, StockStatus};

/// Rows that belong to a product category.
pub trait Categorized {
    fn category(&self) -> &str;
}

impl Categorized for Product {
    fn category(&self) -> &str {
        &self.category
    }
}

impl Categorized for EnrichedProduct {
    fn category(&self) -> &str {
        &self.product.category
    }
}

/// Sales dated within `[start, end]` at one of the given locations.
pub fn sales_between_dates<S: AsRef<str>>(
    sales: &[SaleRecord],
    start: NaiveDate,
    end: NaiveDate,
    locations: &[S],
) -> Vec<SaleRecord> {
    sales
        .iter()
        .filter(|s| start <= s.sale_date && s.sale_date <= end)
        .filter(|s| locations.iter().any(|l| l.as_ref() == s.location))
        .cloned()
        .collect()
}

/// Products whose category is one of `categories`.
pub fn products_in_categories<T, S>(products: &[T], categories: &[S]) -> Vec<T>
where
    T: Categorized + Clone,
    S: AsRef<str>,
{
    products
        .iter()
        .filter(|p| categories.iter().any(|c| c.as_ref() == p.category()))
        .cloned()
        .collect()
}

/// Enriched products classified as understocked.
///
/// Taking `EnrichedProduct` rows means the enrichment has already run.
pub fn understocked_products(products: &[EnrichedProduct]) -> Vec<EnrichedProduct> {
    products
        .iter()
        .filter(|p| p.stock_status == StockStatus::Understocked)
        .cloned()
        .collect()
}
