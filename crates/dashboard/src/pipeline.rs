use crate::error::DashboardError;
use crate::query::{DashboardQuery, QueryOverrides};
use crate::recommendations::recommend;
use crate::view::{
    CategoryProfit, DashboardView, ProductMetrics, ProductSummaryRow, StockIssueRow, TopProduct,
};
use analytics::{
    metrics, products_in_categories, sales_between_dates, understocked_products, AnalyticsEngine,
    AnalyticsError,
};
use configuration::{Config, DashboardSettings};
use core_types::{AnalyticsParams, EnrichedProduct, ProductId};
use dataset::Dataset;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::time::Instant;

/// The request pipeline behind every dashboard page.
#[derive(Debug, Clone)]
pub struct Dashboard {
    engine: AnalyticsEngine,
    settings: DashboardSettings,
}

impl Dashboard {
    pub fn new(params: AnalyticsParams, settings: DashboardSettings) -> Result<Self, DashboardError> {
        Ok(Self {
            engine: AnalyticsEngine::new(params)?,
            settings,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, DashboardError> {
        Self::new(config.analytics.clone(), config.dashboard.clone())
    }

    pub fn settings(&self) -> &DashboardSettings {
        &self.settings
    }

    pub fn params(&self) -> &AnalyticsParams {
        self.engine.params()
    }

    /// Fills unset selections from the configured defaults and validates the result.
    pub fn resolve_query(&self, overrides: QueryOverrides) -> Result<DashboardQuery, DashboardError> {
        overrides.resolve(&self.settings)
    }

    /// Sale locations outside the configured options. Empty when no options are configured.
    pub fn unknown_locations(&self, dataset: &Dataset) -> Vec<String> {
        if self.settings.location_options.is_empty() {
            return Vec::new();
        }
        dataset.unknown_locations(self.settings.location_options.as_slice())
    }

    /// Logs a warning for every sale location outside the configured options.
    pub fn warn_unknown_locations(&self, dataset: &Dataset) {
        for location in self.unknown_locations(dataset) {
            tracing::warn!(%location, "Sales reference a location outside the configured options.");
        }
    }

    /// Runs the enrichment pipeline over the whole snapshot.
    pub fn enrich(&self, dataset: &Dataset) -> Result<Vec<EnrichedProduct>, DashboardError> {
        Ok(self
            .engine
            .enrich(dataset.products(), dataset.sales(), dataset.purchases())?)
    }

    /// Looks up one product and computes its metrics over every sale and purchase.
    pub fn product_metrics(
        &self,
        dataset: &Dataset,
        product_id: &ProductId,
    ) -> Result<ProductMetrics, DashboardError> {
        let (products, sales, purchases) = (dataset.products(), dataset.sales(), dataset.purchases());
        let profit = metrics::profit(products, sales, product_id)?;
        let revenue = metrics::revenue(products, sales, product_id)?;
        let enriched = self.enrich(dataset)?;
        let stock_status = metrics::stock_status(&enriched, product_id, self.params())?;
        let product_name = enriched
            .iter()
            .find(|p| p.product_id() == product_id)
            .map(|p| p.product.product_name.clone())
            .unwrap_or_default();

        Ok(ProductMetrics {
            product_id: product_id.clone(),
            product_name,
            total_sold: metrics::total_sold(sales, product_id),
            total_purchased: metrics::total_purchased(purchases, product_id),
            current_stock: metrics::current_stock(sales, purchases, product_id),
            revenue,
            profit,
            slow_moving: metrics::is_slow_moving(sales, product_id, self.params()),
            stock_status,
        })
    }

    /// Computes the full dashboard for one query.
    ///
    /// Enrichment sees every sale, so `profit` and `slow_moving` do not depend on the
    /// selected date range or locations. Revenue and units sold do.
    pub fn build_view(
        &self,
        dataset: &Dataset,
        query: &DashboardQuery,
    ) -> Result<DashboardView, DashboardError> {
        query.validate()?;
        let started = Instant::now();

        // 1. Enrich
        let enriched = self.enrich(dataset)?;

        // 2. Filter
        let sales = sales_between_dates(
            dataset.sales(),
            query.start,
            query.end,
            query.locations.as_slice(),
        );
        let products = products_in_categories(&enriched, query.categories.as_slice());
        let understocked = understocked_products(&products);

        // 3. Aggregate
        let kpis = self.engine.summary_kpis(&sales, &products)?;

        // 4. Derive the presentation tables
        let view = DashboardView {
            query: query.clone(),
            kpis,
            top_products_by_profit: top_by_profit(&products, self.settings.top_products),
            profit_by_category: profit_by_category(&products)?,
            product_summary: products.iter().map(ProductSummaryRow::from).collect(),
            stock_issues: products
                .iter()
                .filter(|p| p.stock_status.is_stock_issue())
                .map(StockIssueRow::from)
                .collect(),
            recommendations: recommend(&products),
            understocked,
            products,
        };

        tracing::info!(
            products = view.products.len(),
            filtered_sales = sales.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Dashboard view computed."
        );
        Ok(view)
    }
}

/// The `limit` most profitable products, highest first. Ties keep input order.
fn top_by_profit(products: &[EnrichedProduct], limit: usize) -> Vec<TopProduct> {
    let mut ranked: Vec<&EnrichedProduct> = products.iter().collect();
    ranked.sort_by(|a, b| b.profit.cmp(&a.profit));
    ranked
        .into_iter()
        .take(limit)
        .map(|p| TopProduct {
            product_name: p.product.product_name.clone(),
            profit: p.profit,
        })
        .collect()
}

/// Total profit per category, ordered by category name.
fn profit_by_category(products: &[EnrichedProduct]) -> Result<Vec<CategoryProfit>, AnalyticsError> {
    let mut totals: BTreeMap<&str, Decimal> = BTreeMap::new();
    for p in products {
        let total = totals.entry(p.product.category.as_str()).or_default();
        *total = total.checked_add(p.profit).ok_or_else(|| {
            AnalyticsError::Calculation(format!("profit of category '{}' overflows", p.product.category))
        })?;
    }
    Ok(totals
        .into_iter()
        .map(|(category, profit)| CategoryProfit {
            category: category.to_string(),
            profit,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::{Product, StockStatus};
    use rust_decimal_macros::dec;

    fn product(name: &str, category: &str, profit: Decimal) -> EnrichedProduct {
        EnrichedProduct {
            product: Product {
                product_id: name.into(),
                product_name: name.into(),
                category: category.into(),
                cost_price: dec!(1),
                selling_price: dec!(2),
                reorder_level: 10,
            },
            current_stock: 10,
            profit,
            slow_moving: false,
            stock_status: StockStatus::ProperlyStocked,
        }
    }

    #[test]
    fn top_by_profit_is_descending_and_stable() {
        let products = vec![
            product("A", "Groceries", dec!(10)),
            product("B", "Groceries", dec!(30)),
            product("C", "Clothing", dec!(10)),
            product("D", "Clothing", dec!(-5)),
        ];
        let names: Vec<_> = top_by_profit(&products, 3)
            .into_iter()
            .map(|t| t.product_name)
            .collect();
        assert_eq!(names, vec!["B", "A", "C"]);
    }

    #[test]
    fn profit_by_category_sums_and_sorts() {
        let products = vec![
            product("A", "Groceries", dec!(10)),
            product("B", "Clothing", dec!(2.5)),
            product("C", "Groceries", dec!(-4)),
        ];
        let totals = profit_by_category(&products).unwrap();
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].category, "Clothing");
        assert_eq!(totals[0].profit, dec!(2.5));
        assert_eq!(totals[1].profit, dec!(6));
    }

    #[test]
    fn category_profit_overflow_is_an_error() {
        let products = vec![
            product("A", "Groceries", Decimal::MAX),
            product("B", "Groceries", dec!(1)),
        ];
        assert!(matches!(
            profit_by_category(&products),
            Err(AnalyticsError::Calculation(_))
        ));
    }

    #[test]
    fn invalid_parameters_are_rejected_at_construction() {
        let params = AnalyticsParams {
            kpi_scale: 0,
            ..AnalyticsParams::default()
        };
        assert!(matches!(
            Dashboard::new(params, DashboardSettings::default()),
            Err(DashboardError::Analytics(_))
        ));
    }
}
