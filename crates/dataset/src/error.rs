use crate::table::TableKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error in {table} table: {source}")]
    Csv {
        table: TableKind,
        #[source]
        source: csv::Error,
    },

    #[error("The {table} table is missing required columns: {}", .columns.join(", "))]
    MissingColumns {
        table: TableKind,
        columns: Vec<String>,
    },

    #[error("Invalid row at line {line} of the {table} table: {message}")]
    InvalidRow {
        table: TableKind,
        line: u64,
        message: String,
    },

    #[error("Product id '{product_id}' appears more than once in the products table (line {line})")]
    DuplicateProductId { product_id: String, line: u64 },

    #[error("Unrecognized file '{0}': expected products.csv, sales.csv or purchases.csv")]
    UnknownFile(String),

    #[error("Failed to write CSV: {0}")]
    Write(#[from] csv::Error),
}
