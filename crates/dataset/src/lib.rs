//! # Retail Dataset Crate
//!
//! This crate is the boundary between raw CSV files and the typed tables the
//! analytics work on.
//!
//! ## Architectural Principles
//!
//! - **Layer 2 Adapter:** All file-format knowledge lives here. Malformed dates,
//!   negative quantities, missing columns and duplicate product ids are rejected
//!   while loading, before any analytics run.
//! - **Immutable Snapshots:** A loaded `Dataset` is never modified. Replacing a table
//!   produces a new snapshot.
//!
//! ## Public API
//!
//! - `TableKind`: the three source tables and their required columns.
//! - `loader`: CSV parsing from readers, byte buffers and files.
//! - `Dataset` / `DatasetDraft`: complete and partially uploaded snapshots.
//! - `export`: writing any `CsvTable` rows back to CSV.
//! - `DatasetError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod error;
pub mod export;
pub mod loader;
pub mod snapshot;
pub mod table;

// Re-export the key components to create a clean, public-facing API.
pub use error::DatasetError;
pub use export::{write_csv, CsvTable, EnrichedProductRow};
pub use loader::{load_dataset, load_products, load_purchases, load_sales, load_upload};
pub use snapshot::{Dataset, DatasetDraft};
pub use table::TableKind;
