//! # Retail Dashboard
//!
//! Turns a dataset snapshot and a set of filter selections into everything a
//! dashboard page shows: KPIs, chart series, tables, recommendations and CSV
//! downloads.
//!
//! Every request is handled by a full recomputation over an immutable snapshot:
//! enrichment, then filtering, then KPI aggregation, then the derived tables.

pub mod error;
pub mod pipeline;
pub mod query;
pub mod recommendations;
pub mod view;
pub mod workspace;

pub use error::DashboardError;
pub use pipeline::Dashboard;
pub use query::{DashboardQuery, QueryOverrides};
pub use recommendations::Recommendation;
pub use view::{DashboardView, ExportTable, ProductMetrics, ProductSummaryRow, StockIssueRow};
pub use workspace::Workspace;
