use crate::error::DashboardError;
use crate::query::DashboardQuery;
use crate::recommendations::Recommendation;
use analytics::KpiSummary;
use core_types::{EnrichedProduct, ProductId, StockStatus};
use dataset::export::{to_csv_bytes, write_csv_file, CsvTable, EnrichedProductRow};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Everything one dashboard page shows for a query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub query: DashboardQuery,
    pub kpis: KpiSummary,
    pub top_products_by_profit: Vec<TopProduct>,
    pub profit_by_category: Vec<CategoryProfit>,
    pub product_summary: Vec<ProductSummaryRow>,
    pub stock_issues: Vec<StockIssueRow>,
    pub understocked: Vec<EnrichedProduct>,
    pub recommendations: Vec<Recommendation>,
    /// The enriched rows of the selected categories.
    pub products: Vec<EnrichedProduct>,
}

/// A bar of the "top products by profit" chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopProduct {
    pub product_name: String,
    pub profit: Decimal,
}

/// A slice of the "profit by category" chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryProfit {
    pub category: String,
    pub profit: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSummaryRow {
    pub product_name: String,
    pub category: String,
    pub current_stock: i64,
    pub reorder_level: u32,
    pub profit: Decimal,
    pub stock_status: StockStatus,
}

impl CsvTable for ProductSummaryRow {
    const COLUMNS: &'static [&'static str] = &[
        "product_name",
        "category",
        "current_stock",
        "reorder_level",
        "profit",
        "stock_status",
    ];
}

impl From<&EnrichedProduct> for ProductSummaryRow {
    fn from(p: &EnrichedProduct) -> Self {
        Self {
            product_name: p.product.product_name.clone(),
            category: p.product.category.clone(),
            current_stock: p.current_stock,
            reorder_level: p.product.reorder_level,
            profit: p.profit,
            stock_status: p.stock_status,
        }
    }
}

/// The single-product metrics, computed over the whole snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductMetrics {
    pub product_id: ProductId,
    pub product_name: String,
    pub total_sold: i64,
    pub total_purchased: i64,
    pub current_stock: i64,
    pub revenue: Decimal,
    pub profit: Decimal,
    pub slow_moving: bool,
    pub stock_status: StockStatus,
}

/// An understocked or overstocked product with the quantity to reorder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockIssueRow {
    pub product_name: String,
    pub category: String,
    pub current_stock: i64,
    pub reorder_level: u32,
    pub stock_status: StockStatus,
    pub suggested_reorder: i64,
}

impl CsvTable for StockIssueRow {
    const COLUMNS: &'static [&'static str] = &[
        "product_name",
        "category",
        "current_stock",
        "reorder_level",
        "stock_status",
        "suggested_reorder",
    ];
}

impl From<&EnrichedProduct> for StockIssueRow {
    fn from(p: &EnrichedProduct) -> Self {
        Self {
            product_name: p.product.product_name.clone(),
            category: p.product.category.clone(),
            current_stock: p.current_stock,
            reorder_level: p.product.reorder_level,
            stock_status: p.stock_status,
            suggested_reorder: p.suggested_reorder(),
        }
    }
}

/// The downloadable tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportTable {
    ProductSummary,
    StockIssues,
    EnrichedProducts,
}

impl ExportTable {
    pub const ALL: [ExportTable; 3] = [
        ExportTable::ProductSummary,
        ExportTable::StockIssues,
        ExportTable::EnrichedProducts,
    ];

    pub fn file_name(&self) -> &'static str {
        match self {
            ExportTable::ProductSummary => "product_summary.csv",
            ExportTable::StockIssues => "stock_issues.csv",
            ExportTable::EnrichedProducts => "enriched_products.csv",
        }
    }

    pub fn from_file_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.file_name() == name)
    }
}

impl DashboardView {
    /// Renders one of the downloadable tables as CSV.
    pub fn export_csv(&self, table: ExportTable) -> Result<Vec<u8>, DashboardError> {
        let bytes = match table {
            ExportTable::ProductSummary => to_csv_bytes(&self.product_summary)?,
            ExportTable::StockIssues => to_csv_bytes(&self.stock_issues)?,
            ExportTable::EnrichedProducts => {
                let rows: Vec<EnrichedProductRow> =
                    self.products.iter().map(EnrichedProductRow::from).collect();
                to_csv_bytes(&rows)?
            }
        };
        Ok(bytes)
    }

    /// Writes one of the downloadable tables into `dir` under its export file name.
    pub fn write_export(&self, table: ExportTable, dir: &Path) -> Result<PathBuf, DashboardError> {
        let path = dir.join(table.file_name());
        match table {
            ExportTable::ProductSummary => write_csv_file(&self.product_summary, &path)?,
            ExportTable::StockIssues => write_csv_file(&self.stock_issues, &path)?,
            ExportTable::EnrichedProducts => {
                let rows: Vec<EnrichedProductRow> =
                    self.products.iter().map(EnrichedProductRow::from).collect();
                write_csv_file(&rows, &path)?
            }
        }
        Ok(path)
    }
}
