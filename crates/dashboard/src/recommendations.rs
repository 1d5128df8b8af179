use core_types::{EnrichedProduct, StockStatus};
use serde::{Deserialize, Serialize};

/// How many product names a recommendation quotes as examples.
const EXAMPLE_NAMES: usize = 2;

/// A short piece of business advice derived from the filtered products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub title: String,
    pub detail: String,
}

impl Recommendation {
    fn new(title: &str, detail: String) -> Self {
        Self {
            title: title.to_string(),
            detail,
        }
    }
}

fn examples<'a>(products: impl Iterator<Item = &'a EnrichedProduct>) -> String {
    products
        .take(EXAMPLE_NAMES)
        .map(|p| p.product.product_name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn subject(count: usize) -> String {
    if count == 1 {
        "1 product is".to_string()
    } else {
        format!("{count} products are")
    }
}

/// Restock, discontinue and clearance advice, followed by a standing inventory
/// strategy note. Sections with no matching products are omitted.
pub fn recommend(products: &[EnrichedProduct]) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();

    let understocked = || products.iter().filter(|p| p.stock_status == StockStatus::Understocked);
    let n = understocked().count();
    if n > 0 {
        recommendations.push(Recommendation::new(
            "Restock Urgently",
            format!(
                "{} understocked. Prioritize restocking {}.",
                subject(n),
                examples(understocked())
            ),
        ));
    }

    let slow_moving = || products.iter().filter(|p| p.slow_moving);
    let n = slow_moving().count();
    if n > 0 {
        recommendations.push(Recommendation::new(
            "Consider Discontinuing",
            format!(
                "{} slow-moving (e.g., {}) with low recent sales.",
                subject(n),
                examples(slow_moving())
            ),
        ));
    }

    let overstocked = || products.iter().filter(|p| p.stock_status == StockStatus::Overstocked);
    let n = overstocked().count();
    if n > 0 {
        recommendations.push(Recommendation::new(
            "Clear Overstock",
            format!(
                "{} overstocked. Consider promotions for {} to reduce inventory costs.",
                subject(n),
                examples(overstocked())
            ),
        ));
    }

    recommendations.push(Recommendation::new(
        "Inventory Strategy",
        "Implement just-in-time restocking for perishables and high-demand items \
         to minimize waste and improve ROI."
            .to_string(),
    ));

    recommendations
}
