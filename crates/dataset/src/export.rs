use crate::error::DatasetError;
use core_types::{EnrichedProduct, StockStatus};
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// A row type that can be exported as a CSV table.
///
/// `COLUMNS` must list the struct's fields in declaration order. The header is
/// written from it so that an empty table still carries its columns.
pub trait CsvTable: Serialize {
    const COLUMNS: &'static [&'static str];
}

/// Writes a header row followed by every row.
pub fn write_csv<T: CsvTable, W: Write>(rows: &[T], writer: W) -> Result<(), DatasetError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv_writer.write_record(T::COLUMNS)?;
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Renders the table to an in-memory CSV document.
pub fn to_csv_bytes<T: CsvTable>(rows: &[T]) -> Result<Vec<u8>, DatasetError> {
    let mut buffer = Vec::new();
    write_csv(rows, &mut buffer)?;
    Ok(buffer)
}

/// Writes the table to a file, replacing it if it exists.
pub fn write_csv_file<T: CsvTable>(rows: &[T], path: &Path) -> Result<(), DatasetError> {
    let file = std::fs::File::create(path).map_err(|source| DatasetError::Io {
        path: path.display().to_string(),
        source,
    })?;
    write_csv(rows, file)?;
    tracing::info!(path = %path.display(), rows = rows.len(), "CSV table written.");
    Ok(())
}

/// The enriched product table flattened for CSV.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedProductRow {
    pub product_id: String,
    pub product_name: String,
    pub category: String,
    pub cost_price: Decimal,
    pub selling_price: Decimal,
    pub reorder_level: u32,
    pub current_stock: i64,
    pub profit: Decimal,
    pub slow_moving: bool,
    pub stock_status: StockStatus,
}

impl CsvTable for EnrichedProductRow {
    const COLUMNS: &'static [&'static str] = &[
        "product_id",
        "product_name",
        "category",
        "cost_price",
        "selling_price",
        "reorder_level",
        "current_stock",
        "profit",
        "slow_moving",
        "stock_status",
    ];
}

impl From<&EnrichedProduct> for EnrichedProductRow {
    fn from(row: &EnrichedProduct) -> Self {
        Self {
            product_id: row.product.product_id.to_string(),
            product_name: row.product.product_name.clone(),
            category: row.product.category.clone(),
            cost_price: row.product.cost_price,
            selling_price: row.product.selling_price,
            reorder_level: row.product.reorder_level,
            current_stock: row.current_stock,
            profit: row.profit,
            slow_moving: row.slow_moving,
            stock_status: row.stock_status,
        }
    }
}
