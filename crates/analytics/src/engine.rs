use crate::error::AnalyticsError;
use crate::filters::understocked_products;
use crate::index::{ProductCatalog, PurchaseIndex, SalesIndex};
use crate::metrics::{checked_amount, checked_margin, checked_sum, classify_stock};
use crate::report::KpiSummary;
use core_types::{AnalyticsParams, EnrichedProduct, Product, PurchaseRecord, SaleRecord};
use rust_decimal::prelude::*;
use rust_decimal::Decimal;

/// A stateless calculator for deriving inventory metrics and KPIs.
#[derive(Debug, Clone)]
pub struct AnalyticsEngine {
    params: AnalyticsParams,
}

impl AnalyticsEngine {
    /// Creates a new `AnalyticsEngine`, rejecting parameters that make no sense.
    pub fn new(params: AnalyticsParams) -> Result<Self, AnalyticsError> {
        if params.slow_moving_window_days == 0 {
            return Err(AnalyticsError::InvalidParameters(
                "slow_moving_window_days must be greater than 0".to_string(),
            ));
        }
        if params.kpi_scale == 0 {
            return Err(AnalyticsError::InvalidParameters(
                "kpi_scale must be greater than 0".to_string(),
            ));
        }
        Ok(Self { params })
    }

    pub fn params(&self) -> &AnalyticsParams {
        &self.params
    }

    /// The enrichment pipeline.
    ///
    /// Attaches `current_stock`, `profit`, `slow_moving` and `stock_status` to every
    /// product row, in that order, and returns a new table. Sales and purchases are
    /// aggregated by product once up front.
    ///
    /// # Arguments
    ///
    /// * `products` - The product table. Duplicate ids resolve to their first row.
    /// * `sales` - All sales. Profit and slow-moving status are computed over all of them.
    /// * `purchases` - All purchases.
    pub fn enrich(
        &self,
        products: &[Product],
        sales: &[SaleRecord],
        purchases: &[PurchaseRecord],
    ) -> Result<Vec<EnrichedProduct>, AnalyticsError> {
        let sold = SalesIndex::build(sales, Some(self.params.slow_moving_window()));
        let purchased = PurchaseIndex::build(purchases);
        let catalog = ProductCatalog::new(products);
        let slow_threshold = i64::from(self.params.slow_moving_threshold);

        let enriched = products
            .iter()
            .map(|row| {
                let product_id = &row.product_id;
                let first = catalog.get(product_id)?;

                let current_stock = purchased.total_purchased(product_id) - sold.total_sold(product_id);
                let profit =
                    checked_amount(checked_margin(first)?, sold.total_sold(product_id), product_id)?;
                let slow_moving = sold.sold_in_window(product_id) < slow_threshold;
                let stock_status = classify_stock(
                    current_stock,
                    first.reorder_level,
                    self.params.overstock_multiplier,
                );

                Ok(EnrichedProduct {
                    product: row.clone(),
                    current_stock,
                    profit,
                    slow_moving,
                    stock_status,
                })
            })
            .collect::<Result<Vec<_>, AnalyticsError>>()?;

        tracing::debug!(
            products = enriched.len(),
            sales = sales.len(),
            purchases = purchases.len(),
            "Enriched product table."
        );
        Ok(enriched)
    }

    /// The KPI aggregator.
    ///
    /// Revenue sums the revenue of every row in `products` over `sales`, priced by the
    /// first row of its product id like [`crate::metrics::revenue`]. Profit sums the
    /// already computed `profit` column; units sold sums every sale. Overflowing
    /// totals fail with `Calculation`.
    pub fn summary_kpis(
        &self,
        sales: &[SaleRecord],
        products: &[EnrichedProduct],
    ) -> Result<KpiSummary, AnalyticsError> {
        let sold = SalesIndex::build(sales, None);
        let catalog = ProductCatalog::new(products.iter().map(|p| &p.product));

        let total_revenue = checked_sum(
            products.iter().map(|p| {
                let product_id = p.product_id();
                let first = catalog.get(product_id)?;
                checked_amount(first.selling_price, sold.total_sold(product_id), product_id)
            }),
            "total_revenue",
        )?;
        let total_profit = checked_sum(products.iter().map(|p| Ok(p.profit)), "total_profit")?;
        let total_units_sold: i64 = sales.iter().map(|s| i64::from(s.quantity_sold)).sum();

        Ok(KpiSummary {
            total_revenue_k: self.scale_money(total_revenue, "total_revenue")?,
            total_profit_k: self.scale_money(total_profit, "total_profit")?,
            total_units_sold_k: total_units_sold / i64::from(self.params.kpi_scale),
            total_understocked_products: understocked_products(products).len(),
        })
    }

    /// Divides by the KPI scale and truncates toward zero: 1999 -> 1, -1999 -> -1.
    fn scale_money(&self, value: Decimal, metric: &str) -> Result<i64, AnalyticsError> {
        (value / Decimal::from(self.params.kpi_scale))
            .trunc()
            .to_i64()
            .ok_or_else(|| AnalyticsError::Calculation(format!("{metric} does not fit in an i64")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use core_types::StockStatus;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn engine() -> AnalyticsEngine {
        AnalyticsEngine::new(AnalyticsParams::default()).unwrap()
    }

    fn product(id: &str, cost: Decimal, price: Decimal, reorder_level: u32) -> Product {
        Product {
            product_id: id.into(),
            product_name: format!("Product {id}"),
            category: "Groceries".into(),
            cost_price: cost,
            selling_price: price,
            reorder_level,
        }
    }

    fn sale(id: &str, quantity_sold: u32) -> SaleRecord {
        SaleRecord {
            product_id: id.into(),
            quantity_sold,
            sale_date: date(2024, 12, 1),
            location: "Dhaka".into(),
        }
    }

    fn purchase(id: &str, quantity_purchased: u32) -> PurchaseRecord {
        PurchaseRecord {
            product_id: id.into(),
            quantity_purchased,
            purchase_date: date(2024, 1, 1),
        }
    }

    fn enriched(price: Decimal, profit: Decimal, stock_status: StockStatus) -> EnrichedProduct {
        EnrichedProduct {
            product: product("A", dec!(0), price, 10),
            current_stock: 0,
            profit,
            slow_moving: false,
            stock_status,
        }
    }

    #[test]
    fn rejects_invalid_parameters() {
        let zero_window = AnalyticsParams {
            slow_moving_window_days: 0,
            ..AnalyticsParams::default()
        };
        assert!(matches!(
            AnalyticsEngine::new(zero_window),
            Err(AnalyticsError::InvalidParameters(_))
        ));

        let zero_scale = AnalyticsParams {
            kpi_scale: 0,
            ..AnalyticsParams::default()
        };
        assert!(AnalyticsEngine::new(zero_scale).is_err());
    }

    #[test]
    fn enrich_properly_stocked_scenario() {
        let products = vec![product("1", dec!(5), dec!(10), 20)];
        let enriched = engine()
            .enrich(&products, &[sale("1", 30)], &[purchase("1", 100)])
            .unwrap();

        assert_eq!(enriched.len(), 1);
        assert_eq!(enriched[0].current_stock, 70);
        assert_eq!(enriched[0].profit, dec!(150));
        assert!(enriched[0].slow_moving);
        assert_eq!(enriched[0].stock_status, StockStatus::ProperlyStocked);
    }

    #[test]
    fn enrich_understocked_scenario() {
        let products = vec![product("1", dec!(5), dec!(10), 80)];
        let enriched = engine()
            .enrich(&products, &[sale("1", 30)], &[purchase("1", 100)])
            .unwrap();
        assert_eq!(enriched[0].stock_status, StockStatus::Understocked);
    }

    #[test]
    fn enrich_does_not_touch_inputs_and_is_idempotent() {
        let products = vec![
            product("1", dec!(5), dec!(10), 20),
            product("2", dec!(2), dec!(3), 0),
        ];
        let sales = vec![sale("1", 30), sale("2", 45)];
        let purchases = vec![purchase("1", 100), purchase("2", 40)];
        let snapshot = products.clone();

        let first = engine().enrich(&products, &sales, &purchases).unwrap();
        let second = engine().enrich(&products, &sales, &purchases).unwrap();

        assert_eq!(first, second);
        assert_eq!(products, snapshot);
        assert_eq!(first[1].current_stock, -5);
        assert_eq!(first[1].stock_status, StockStatus::Understocked);
        assert!(!first[1].slow_moving);
    }

    #[test]
    fn duplicate_rows_share_the_first_rows_pricing() {
        let products = vec![
            product("1", dec!(5), dec!(10), 20),
            product("1", dec!(9), dec!(10), 500),
        ];
        let enriched = engine()
            .enrich(&products, &[sale("1", 10)], &[purchase("1", 100)])
            .unwrap();
        assert_eq!(enriched.len(), 2);
        assert_eq!(enriched[1].profit, dec!(50));
        assert_eq!(enriched[1].stock_status, StockStatus::ProperlyStocked);
        assert_eq!(enriched[1].product.reorder_level, 500);
    }

    #[test]
    fn kpis_truncate_toward_zero() {
        let products = vec![enriched(dec!(1999), dec!(-1999), StockStatus::Understocked)];
        let kpis = engine().summary_kpis(&[sale("A", 1)], &products).unwrap();
        assert_eq!(kpis.total_revenue_k, 1);
        assert_eq!(kpis.total_profit_k, -1);
        assert_eq!(kpis.total_units_sold_k, 0);
        assert_eq!(kpis.total_understocked_products, 1);

        let products = vec![enriched(dec!(999), dec!(-500), StockStatus::ProperlyStocked)];
        let kpis = engine().summary_kpis(&[sale("A", 1)], &products).unwrap();
        assert_eq!(kpis.total_revenue_k, 0);
        assert_eq!(kpis.total_profit_k, 0);
        assert_eq!(kpis.total_understocked_products, 0);
    }

    #[test]
    fn kpi_revenue_ignores_sales_of_unlisted_products() {
        let products = vec![enriched(dec!(100), dec!(0), StockStatus::ProperlyStocked)];
        let sales = vec![sale("A", 20), sale("B", 1500)];
        let kpis = engine().summary_kpis(&sales, &products).unwrap();
        assert_eq!(kpis.total_revenue_k, 2);
        assert_eq!(kpis.total_units_sold_k, 1);
    }

    #[test]
    fn kpi_revenue_prices_duplicate_rows_like_the_revenue_metric() {
        let engine = AnalyticsEngine::new(AnalyticsParams {
            kpi_scale: 1,
            ..AnalyticsParams::default()
        })
        .unwrap();
        let products = vec![
            product("1", dec!(0), dec!(10), 20),
            product("1", dec!(0), dec!(1000), 20),
        ];
        let sales = vec![sale("1", 100)];
        let enriched = engine.enrich(&products, &sales, &[purchase("1", 500)]).unwrap();

        let expected: Decimal = products
            .iter()
            .map(|p| crate::metrics::revenue(&products, &sales, &p.product_id).unwrap())
            .sum();
        let kpis = engine.summary_kpis(&sales, &enriched).unwrap();
        assert_eq!(expected, dec!(2000));
        assert_eq!(kpis.total_revenue_k, 2000);
    }

    #[test]
    fn overflow_is_reported_instead_of_panicking() {
        let products = vec![product("1", dec!(0), Decimal::MAX - dec!(10), 20)];
        let result = engine().enrich(&products, &[sale("1", 2)], &[purchase("1", 5)]);
        assert!(matches!(result, Err(AnalyticsError::Calculation(_))));

        let products = vec![
            enriched(dec!(1), Decimal::MAX, StockStatus::ProperlyStocked),
            enriched(dec!(1), dec!(1), StockStatus::ProperlyStocked),
        ];
        let result = engine().summary_kpis(&[], &products);
        assert!(matches!(result, Err(AnalyticsError::Calculation(_))));

        let products = vec![enriched(Decimal::MAX, dec!(0), StockStatus::ProperlyStocked)];
        let result = engine().summary_kpis(&[sale("A", 2)], &products);
        assert!(matches!(result, Err(AnalyticsError::Calculation(_))));
    }

    #[test]
    fn kpis_of_empty_tables_are_zero() {
        assert_eq!(engine().summary_kpis(&[], &[]).unwrap(), KpiSummary::default());
    }
}
