use serde::{Deserialize, Serialize};

/// The four headline KPIs of the dashboard.
///
/// Money and unit totals are scaled down by the configured KPI scale (thousands by
/// default) and truncated toward zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KpiSummary {
    pub total_revenue_k: i64,
    pub total_profit_k: i64,
    pub total_units_sold_k: i64,
    pub total_understocked_products: usize,
}

impl KpiSummary {
    /// Display labels paired with values, in dashboard order.
    pub fn labelled(&self) -> [(&'static str, i64); 4] {
        [
            ("Total Revenue (K)", self.total_revenue_k),
            ("Total Profit (K)", self.total_profit_k),
            ("Total Units Sold (K)", self.total_units_sold_k),
            (
                "Total Understocked Products",
                i64::try_from(self.total_understocked_products).unwrap_or(i64::MAX),
            ),
        ]
    }
}
