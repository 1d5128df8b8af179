use crate::loader::Table;
use crate::table::TableKind;
use core_types::{Product, PurchaseRecord, SaleRecord};
use std::collections::BTreeSet;

/// An immutable, complete snapshot of the three source tables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    products: Vec<Product>,
    sales: Vec<SaleRecord>,
    purchases: Vec<PurchaseRecord>,
}

impl Dataset {
    pub fn new(products: Vec<Product>, sales: Vec<SaleRecord>, purchases: Vec<PurchaseRecord>) -> Self {
        Self {
            products,
            sales,
            purchases,
        }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn sales(&self) -> &[SaleRecord] {
        &self.sales
    }

    pub fn purchases(&self) -> &[PurchaseRecord] {
        &self.purchases
    }

    /// Returns a snapshot with one table replaced.
    pub fn with_table(mut self, table: Table) -> Self {
        match table {
            Table::Products(rows) => self.products = rows,
            Table::Sales(rows) => self.sales = rows,
            Table::Purchases(rows) => self.purchases = rows,
        }
        self
    }

    /// Distinct sale locations that are not among `known`, sorted.
    pub fn unknown_locations<S: AsRef<str>>(&self, known: &[S]) -> Vec<String> {
        self.sales
            .iter()
            .map(|s| s.location.as_str())
            .filter(|location| !known.iter().any(|k| k.as_ref() == *location))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }
}

/// Tables received so far, for sources that deliver them one at a time (uploads).
#[derive(Debug, Clone, Default)]
pub struct DatasetDraft {
    products: Option<Vec<Product>>,
    sales: Option<Vec<SaleRecord>>,
    purchases: Option<Vec<PurchaseRecord>>,
}

impl DatasetDraft {
    /// Stores a table, replacing any earlier table of the same kind.
    pub fn insert(&mut self, table: Table) {
        match table {
            Table::Products(rows) => self.products = Some(rows),
            Table::Sales(rows) => self.sales = Some(rows),
            Table::Purchases(rows) => self.purchases = Some(rows),
        }
    }

    pub fn has(&self, kind: TableKind) -> bool {
        self.row_count(kind).is_some()
    }

    pub fn row_count(&self, kind: TableKind) -> Option<usize> {
        match kind {
            TableKind::Products => self.products.as_ref().map(Vec::len),
            TableKind::Sales => self.sales.as_ref().map(Vec::len),
            TableKind::Purchases => self.purchases.as_ref().map(Vec::len),
        }
    }

    /// Tables that have not been received yet.
    pub fn missing(&self) -> Vec<TableKind> {
        TableKind::ALL.into_iter().filter(|kind| !self.has(*kind)).collect()
    }

    /// A complete snapshot, once all three tables are present.
    pub fn to_dataset(&self) -> Option<Dataset> {
        match (&self.products, &self.sales, &self.purchases) {
            (Some(products), Some(sales), Some(purchases)) => Some(Dataset::new(
                products.clone(),
                sales.clone(),
                purchases.clone(),
            )),
            _ => None,
        }
    }
}
