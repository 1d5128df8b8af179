use crate::enums::StockStatus;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// The identity of a product. Sales and purchases refer to products by this key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for ProductId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// A row of the product table as loaded from the source data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub product_id: ProductId,
    pub product_name: String,
    pub category: String,
    pub cost_price: Decimal,
    pub selling_price: Decimal,
    /// Stock below this level means the product must be reordered.
    pub reorder_level: u32,
}

impl Product {
    /// Profit earned on a single unit sold. `None` when the difference overflows.
    pub fn unit_margin(&self) -> Option<Decimal> {
        self.selling_price.checked_sub(self.cost_price)
    }
}

/// A single sale. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleRecord {
    pub product_id: ProductId,
    pub quantity_sold: u32,
    pub sale_date: NaiveDate,
    pub location: String,
}

/// A single stock purchase. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseRecord {
    pub product_id: ProductId,
    pub quantity_purchased: u32,
    pub purchase_date: NaiveDate,
}

/// A product row with the derived columns attached by the enrichment pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedProduct {
    #[serde(flatten)]
    pub product: Product,
    /// Units purchased minus units sold. Negative when oversold.
    pub current_stock: i64,
    pub profit: Decimal,
    pub slow_moving: bool,
    pub stock_status: StockStatus,
}

impl EnrichedProduct {
    pub fn product_id(&self) -> &ProductId {
        &self.product.product_id
    }

    /// Units needed to lift an understocked product back to its reorder level.
    pub fn suggested_reorder(&self) -> i64 {
        match self.stock_status {
            StockStatus::Understocked => {
                (i64::from(self.product.reorder_level) - self.current_stock).max(0)
            }
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn product(reorder_level: u32) -> Product {
        Product {
            product_id: ProductId::new("P-1"),
            product_name: "Rice 5kg".into(),
            category: "Groceries".into(),
            cost_price: dec!(5),
            selling_price: dec!(10.50),
            reorder_level,
        }
    }

    fn enriched(current_stock: i64, stock_status: StockStatus) -> EnrichedProduct {
        EnrichedProduct {
            product: product(20),
            current_stock,
            profit: dec!(0),
            slow_moving: false,
            stock_status,
        }
    }

    #[test]
    fn unit_margin_is_price_minus_cost() {
        assert_eq!(product(20).unit_margin(), Some(dec!(5.50)));
    }

    #[test]
    fn suggested_reorder_only_for_understocked() {
        assert_eq!(enriched(5, StockStatus::Understocked).suggested_reorder(), 15);
        assert_eq!(enriched(-4, StockStatus::Understocked).suggested_reorder(), 24);
        assert_eq!(enriched(500, StockStatus::Overstocked).suggested_reorder(), 0);
        assert_eq!(enriched(20, StockStatus::ProperlyStocked).suggested_reorder(), 0);
    }

    #[test]
    fn enriched_product_serializes_flat() {
        let value = serde_json::to_value(enriched(70, StockStatus::ProperlyStocked)).unwrap();
        assert_eq!(value["product_id"], "P-1");
        assert_eq!(value["current_stock"], 70);
        assert_eq!(value["stock_status"], "Properly Stocked");
    }
}
