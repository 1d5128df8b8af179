//! # Retail Analytics Engine
//!
//! This crate derives inventory and profitability metrics from the three raw
//! tables of a retail business: products, sales and purchases.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of files,
//!   HTTP or configuration sources. It depends only on `core-types` (Layer 0).
//! - **Stateless Calculation:** Every call recomputes its output from the tables it
//!   is given. Nothing is cached between calls and inputs are never mutated, so the
//!   same inputs always produce the same enriched table and KPIs.
//!
//! ## Public API
//!
//! - `metrics`: single-product metric functions (stock, profit, revenue, slow-moving,
//!   stock status).
//! - `AnalyticsEngine`: the enrichment pipeline and the KPI aggregator.
//! - `filters`: row selection over sales and products.
//! - `SalesIndex`, `PurchaseIndex`, `ProductCatalog`: per-product pre-aggregation.
//! - `KpiSummary`: the four headline totals.
//! - `AnalyticsError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod error;
pub mod filters;
pub mod index;
pub mod metrics;
pub mod report;

// Re-export the key components to create a clean, public-facing API.
pub use engine::AnalyticsEngine;
pub use error::AnalyticsError;
pub use filters::{products_in_categories, sales_between_dates, understocked_products};
pub use index::{ProductCatalog, PurchaseIndex, SalesIndex};
pub use report::KpiSummary;
