//! Single-product metrics over the raw tables.
//!
//! These functions scan the tables they are given and are meant for ad-hoc
//! lookups. The enrichment pipeline computes the same values through the
//! pre-aggregated indexes in [`crate::index`].

use crate::error::AnalyticsError;
use core_types::{
    AnalyticsParams, EnrichedProduct, Product, ProductId, PurchaseRecord, SaleRecord, StockStatus,
};
use rust_decimal::Decimal;

/// Total units sold of a product. Zero when it has no sales.
pub fn total_sold(sales: &[SaleRecord], product_id: &ProductId) -> i64 {
    sales
        .iter()
        .filter(|s| &s.product_id == product_id)
        .map(|s| i64::from(s.quantity_sold))
        .sum()
}

/// Total units purchased of a product. Zero when it has no purchases.
pub fn total_purchased(purchases: &[PurchaseRecord], product_id: &ProductId) -> i64 {
    purchases
        .iter()
        .filter(|p| &p.product_id == product_id)
        .map(|p| i64::from(p.quantity_purchased))
        .sum()
}

/// Units purchased minus units sold. Negative when the product is oversold.
pub fn current_stock(
    sales: &[SaleRecord],
    purchases: &[PurchaseRecord],
    product_id: &ProductId,
) -> i64 {
    total_purchased(purchases, product_id) - total_sold(sales, product_id)
}

/// The first product row with the given id.
fn find_product<'a>(
    products: &'a [Product],
    product_id: &ProductId,
) -> Result<&'a Product, AnalyticsError> {
    products
        .iter()
        .find(|p| &p.product_id == product_id)
        .ok_or_else(|| AnalyticsError::NotFound(product_id.clone()))
}

/// The unit margin of a product row.
pub(crate) fn checked_margin(product: &Product) -> Result<Decimal, AnalyticsError> {
    product.unit_margin().ok_or_else(|| {
        AnalyticsError::Calculation(format!(
            "unit margin of product '{}' overflows",
            product.product_id
        ))
    })
}

/// `per_unit * units` for one product.
pub(crate) fn checked_amount(
    per_unit: Decimal,
    units: i64,
    product_id: &ProductId,
) -> Result<Decimal, AnalyticsError> {
    per_unit.checked_mul(Decimal::from(units)).ok_or_else(|| {
        AnalyticsError::Calculation(format!("amount for product '{product_id}' overflows"))
    })
}

/// Sums fallible amounts, stopping at the first error or overflow.
pub(crate) fn checked_sum<I>(amounts: I, metric: &str) -> Result<Decimal, AnalyticsError>
where
    I: IntoIterator<Item = Result<Decimal, AnalyticsError>>,
{
    amounts.into_iter().try_fold(Decimal::ZERO, |total, amount| {
        total
            .checked_add(amount?)
            .ok_or_else(|| AnalyticsError::Calculation(format!("{metric} overflows")))
    })
}

/// Total profit of a product: unit margin times units sold.
pub fn profit(
    products: &[Product],
    sales: &[SaleRecord],
    product_id: &ProductId,
) -> Result<Decimal, AnalyticsError> {
    let product = find_product(products, product_id)?;
    checked_amount(checked_margin(product)?, total_sold(sales, product_id), product_id)
}

/// Total revenue of a product: selling price times units sold.
pub fn revenue(
    products: &[Product],
    sales: &[SaleRecord],
    product_id: &ProductId,
) -> Result<Decimal, AnalyticsError> {
    let product = find_product(products, product_id)?;
    checked_amount(product.selling_price, total_sold(sales, product_id), product_id)
}

/// True when fewer than `slow_moving_threshold` units sold in the trailing window
/// ending at the reference date.
pub fn is_slow_moving(sales: &[SaleRecord], product_id: &ProductId, params: &AnalyticsParams) -> bool {
    let window = params.slow_moving_window();
    let recent: i64 = sales
        .iter()
        .filter(|s| &s.product_id == product_id && window.contains(s.sale_date))
        .map(|s| i64::from(s.quantity_sold))
        .sum();
    recent < i64::from(params.slow_moving_threshold)
}

/// Classifies a stock level against a reorder level.
///
/// The understocked check runs first, so a product with a reorder level of zero
/// is only understocked when its stock is negative.
pub fn classify_stock(current_stock: i64, reorder_level: u32, overstock_multiplier: u32) -> StockStatus {
    let reorder_level = i64::from(reorder_level);
    if current_stock < reorder_level {
        StockStatus::Understocked
    } else if current_stock > reorder_level * i64::from(overstock_multiplier) {
        StockStatus::Overstocked
    } else {
        StockStatus::ProperlyStocked
    }
}

/// Stock status of an already enriched product, read from its own row.
pub fn stock_status(
    products: &[EnrichedProduct],
    product_id: &ProductId,
    params: &AnalyticsParams,
) -> Result<StockStatus, AnalyticsError> {
    let product = products
        .iter()
        .find(|p| p.product_id() == product_id)
        .ok_or_else(|| AnalyticsError::NotFound(product_id.clone()))?;
    Ok(classify_stock(
        product.current_stock,
        product.product.reorder_level,
        params.overstock_multiplier,
    ))
}
