//! CSV table loader.
//!
//! Parses the three source tables into typed rows. Expected CSV columns:
//!   products:  product_id, product_name, category, cost_price, selling_price, reorder_level
//!   sales:     product_id, quantity_sold, sale_date, location
//!   purchases: product_id, quantity_purchased, purchase_date
//!
//! Dates are `YYYY-MM-DD`; a full timestamp is accepted and truncated to its date.

use crate::error::DatasetError;
use crate::snapshot::Dataset;
use crate::table::TableKind;
use chrono::{NaiveDate, NaiveDateTime};
use core_types::{Product, ProductId, PurchaseRecord, SaleRecord};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

/// A fully parsed source table.
#[derive(Debug, Clone, PartialEq)]
pub enum Table {
    Products(Vec<Product>),
    Sales(Vec<SaleRecord>),
    Purchases(Vec<PurchaseRecord>),
}

impl Table {
    pub fn kind(&self) -> TableKind {
        match self {
            Table::Products(_) => TableKind::Products,
            Table::Sales(_) => TableKind::Sales,
            Table::Purchases(_) => TableKind::Purchases,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Table::Products(rows) => rows.len(),
            Table::Sales(rows) => rows.len(),
            Table::Purchases(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// Raw CSV records. Every field is read as text and converted by hand so that
// errors name the offending column and value.

#[derive(Debug, Deserialize)]
struct RawProduct {
    product_id: String,
    product_name: String,
    category: String,
    cost_price: String,
    selling_price: String,
    reorder_level: String,
}

#[derive(Debug, Deserialize)]
struct RawSale {
    product_id: String,
    quantity_sold: String,
    sale_date: String,
    location: String,
}

#[derive(Debug, Deserialize)]
struct RawPurchase {
    product_id: String,
    quantity_purchased: String,
    purchase_date: String,
}

/// Load the products table. Duplicate product ids are rejected.
pub fn load_products<R: Read>(reader: R) -> Result<Vec<Product>, DatasetError> {
    let rows = parse_rows(TableKind::Products, reader, |raw: RawProduct| {
        Ok(Product {
            product_id: parse_id(&raw.product_id)?,
            product_name: raw.product_name,
            category: raw.category,
            cost_price: parse_money("cost_price", &raw.cost_price)?,
            selling_price: parse_money("selling_price", &raw.selling_price)?,
            reorder_level: parse_quantity("reorder_level", &raw.reorder_level)?,
        })
    })?;

    let mut seen = HashSet::with_capacity(rows.len());
    for (line, product) in &rows {
        if !seen.insert(&product.product_id) {
            return Err(DatasetError::DuplicateProductId {
                product_id: product.product_id.to_string(),
                line: *line,
            });
        }
    }

    Ok(rows.into_iter().map(|(_, product)| product).collect())
}

/// Load the sales table.
pub fn load_sales<R: Read>(reader: R) -> Result<Vec<SaleRecord>, DatasetError> {
    let rows = parse_rows(TableKind::Sales, reader, |raw: RawSale| {
        Ok(SaleRecord {
            product_id: parse_id(&raw.product_id)?,
            quantity_sold: parse_quantity("quantity_sold", &raw.quantity_sold)?,
            sale_date: parse_date("sale_date", &raw.sale_date)?,
            location: raw.location,
        })
    })?;
    Ok(rows.into_iter().map(|(_, sale)| sale).collect())
}

/// Load the purchases table.
pub fn load_purchases<R: Read>(reader: R) -> Result<Vec<PurchaseRecord>, DatasetError> {
    let rows = parse_rows(TableKind::Purchases, reader, |raw: RawPurchase| {
        Ok(PurchaseRecord {
            product_id: parse_id(&raw.product_id)?,
            quantity_purchased: parse_quantity("quantity_purchased", &raw.quantity_purchased)?,
            purchase_date: parse_date("purchase_date", &raw.purchase_date)?,
        })
    })?;
    Ok(rows.into_iter().map(|(_, purchase)| purchase).collect())
}

/// Load any of the three tables.
pub fn load_table<R: Read>(kind: TableKind, reader: R) -> Result<Table, DatasetError> {
    Ok(match kind {
        TableKind::Products => Table::Products(load_products(reader)?),
        TableKind::Sales => Table::Sales(load_sales(reader)?),
        TableKind::Purchases => Table::Purchases(load_purchases(reader)?),
    })
}

/// Load an uploaded file, routed to its table by file name.
pub fn load_upload<R: Read>(file_name: &str, reader: R) -> Result<Table, DatasetError> {
    load_table(TableKind::from_file_name(file_name)?, reader)
}

/// Load a table from a file on disk.
pub fn load_table_file(kind: TableKind, path: &Path) -> Result<Table, DatasetError> {
    let file = std::fs::File::open(path).map_err(|source| DatasetError::Io {
        path: path.display().to_string(),
        source,
    })?;
    load_table(kind, file)
}

/// Load all three tables from disk into a snapshot.
pub fn load_dataset(
    products_path: &Path,
    sales_path: &Path,
    purchases_path: &Path,
) -> Result<Dataset, DatasetError> {
    let mut dataset = Dataset::default();
    for (kind, path) in [
        (TableKind::Products, products_path),
        (TableKind::Sales, sales_path),
        (TableKind::Purchases, purchases_path),
    ] {
        dataset = dataset.with_table(load_table_file(kind, path)?);
    }

    tracing::info!(
        products = dataset.products().len(),
        sales = dataset.sales().len(),
        purchases = dataset.purchases().len(),
        "Dataset loaded from disk."
    );
    Ok(dataset)
}

/// Reads every record of `reader`, checking the header first, and converts it with
/// `convert`. Returns the converted rows paired with their 1-based line numbers.
fn parse_rows<R, Raw, T, F>(
    table: TableKind,
    reader: R,
    mut convert: F,
) -> Result<Vec<(u64, T)>, DatasetError>
where
    R: Read,
    Raw: DeserializeOwned,
    F: FnMut(Raw) -> Result<T, String>,
{
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: csv::StringRecord = csv_reader
        .headers()
        .map_err(|source| DatasetError::Csv { table, source })?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}'))
        .collect();
    check_columns(table, &headers)?;

    let mut rows = Vec::new();
    for result in csv_reader.records() {
        let record = result.map_err(|source| DatasetError::Csv { table, source })?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let invalid = |message: String| DatasetError::InvalidRow {
            table,
            line,
            message,
        };

        let raw: Raw = record
            .deserialize(Some(&headers))
            .map_err(|e| invalid(e.to_string()))?;
        rows.push((line, convert(raw).map_err(invalid)?));
    }

    tracing::debug!(%table, rows = rows.len(), "Parsed CSV table.");
    Ok(rows)
}

fn check_columns(table: TableKind, headers: &csv::StringRecord) -> Result<(), DatasetError> {
    let missing: Vec<String> = table
        .required_columns()
        .iter()
        .filter(|column| !headers.iter().any(|h| h == **column))
        .map(|column| column.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(DatasetError::MissingColumns {
            table,
            columns: missing,
        })
    }
}

fn parse_id(value: &str) -> Result<ProductId, String> {
    if value.is_empty() {
        return Err("product_id is empty".to_string());
    }
    Ok(ProductId::new(value))
}

fn parse_money(field: &str, value: &str) -> Result<Decimal, String> {
    Decimal::from_str(value).map_err(|e| format!("{field} '{value}' is not a number: {e}"))
}

fn parse_quantity(field: &str, value: &str) -> Result<u32, String> {
    value
        .parse::<u32>()
        .map_err(|_| format!("{field} '{value}' is not a non-negative integer"))
}

fn parse_date(field: &str, value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S").map(|dt| dt.date()))
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S").map(|dt| dt.date()))
        .map_err(|_| format!("{field} '{value}' is not a YYYY-MM-DD date"))
}
