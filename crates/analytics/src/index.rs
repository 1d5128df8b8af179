use crate::error::AnalyticsError;
use core_types::{DateWindow, Product, ProductId, PurchaseRecord, SaleRecord};
use std::collections::HashMap;

/// Units sold per product, aggregated in a single pass over the sales table.
#[derive(Debug, Clone, Default)]
pub struct SalesIndex {
    sold: HashMap<ProductId, i64>,
    sold_in_window: HashMap<ProductId, i64>,
}

impl SalesIndex {
    /// Aggregates `sales` by product. When `window` is given, the units sold inside
    /// it are tracked as well.
    pub fn build(sales: &[SaleRecord], window: Option<DateWindow>) -> Self {
        let mut index = Self::default();
        for sale in sales {
            let quantity = i64::from(sale.quantity_sold);
            *index.sold.entry(sale.product_id.clone()).or_default() += quantity;
            if window.is_some_and(|w| w.contains(sale.sale_date)) {
                *index
                    .sold_in_window
                    .entry(sale.product_id.clone())
                    .or_default() += quantity;
            }
        }
        index
    }

    /// Total units sold. Zero for a product without sales.
    pub fn total_sold(&self, product_id: &ProductId) -> i64 {
        self.sold.get(product_id).copied().unwrap_or(0)
    }

    /// Units sold inside the window the index was built with.
    pub fn sold_in_window(&self, product_id: &ProductId) -> i64 {
        self.sold_in_window.get(product_id).copied().unwrap_or(0)
    }
}

/// Units purchased per product.
#[derive(Debug, Clone, Default)]
pub struct PurchaseIndex {
    purchased: HashMap<ProductId, i64>,
}

impl PurchaseIndex {
    pub fn build(purchases: &[PurchaseRecord]) -> Self {
        let mut purchased: HashMap<ProductId, i64> = HashMap::new();
        for purchase in purchases {
            *purchased.entry(purchase.product_id.clone()).or_default() +=
                i64::from(purchase.quantity_purchased);
        }
        Self { purchased }
    }

    /// Total units purchased. Zero for a product without purchases.
    pub fn total_purchased(&self, product_id: &ProductId) -> i64 {
        self.purchased.get(product_id).copied().unwrap_or(0)
    }
}

/// O(1) lookup of product rows by id.
///
/// When the table holds several rows for one id, the first one wins.
#[derive(Debug, Clone)]
pub struct ProductCatalog<'a> {
    by_id: HashMap<&'a ProductId, &'a Product>,
}

impl<'a> ProductCatalog<'a> {
    pub fn new<I>(products: I) -> Self
    where
        I: IntoIterator<Item = &'a Product>,
    {
        let mut by_id = HashMap::new();
        for product in products {
            by_id.entry(&product.product_id).or_insert(product);
        }
        Self { by_id }
    }

    pub fn get(&self, product_id: &ProductId) -> Result<&'a Product, AnalyticsError> {
        self.by_id
            .get(product_id)
            .copied()
            .ok_or_else(|| AnalyticsError::NotFound(product_id.clone()))
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
