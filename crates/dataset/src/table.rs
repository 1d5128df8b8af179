use crate::error::DatasetError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The three source tables of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableKind {
    Products,
    Sales,
    Purchases,
}

impl TableKind {
    pub const ALL: [TableKind; 3] = [TableKind::Products, TableKind::Sales, TableKind::Purchases];

    /// Columns every file of this kind must carry. Extra columns are ignored.
    pub fn required_columns(&self) -> &'static [&'static str] {
        match self {
            TableKind::Products => &[
                "product_id",
                "product_name",
                "category",
                "cost_price",
                "selling_price",
                "reorder_level",
            ],
            TableKind::Sales => &["product_id", "quantity_sold", "sale_date", "location"],
            TableKind::Purchases => &["product_id", "quantity_purchased", "purchase_date"],
        }
    }

    /// The upload file name that maps to this table.
    pub fn file_name(&self) -> &'static str {
        match self {
            TableKind::Products => "products.csv",
            TableKind::Sales => "sales.csv",
            TableKind::Purchases => "purchases.csv",
        }
    }

    /// Routes an uploaded file to its table by name, ignoring any directory part.
    pub fn from_file_name(name: &str) -> Result<Self, DatasetError> {
        let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
        Self::ALL
            .into_iter()
            .find(|kind| kind.file_name() == base)
            .ok_or_else(|| DatasetError::UnknownFile(name.to_string()))
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TableKind::Products => "products",
            TableKind::Sales => "sales",
            TableKind::Purchases => "purchases",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_known_file_names() {
        assert_eq!(TableKind::from_file_name("products.csv").unwrap(), TableKind::Products);
        assert_eq!(TableKind::from_file_name("uploads/sales.csv").unwrap(), TableKind::Sales);
        assert_eq!(
            TableKind::from_file_name("C:\\data\\purchases.csv").unwrap(),
            TableKind::Purchases
        );
    }

    #[test]
    fn rejects_other_file_names() {
        assert!(matches!(
            TableKind::from_file_name("inventory.csv"),
            Err(DatasetError::UnknownFile(_))
        ));
        assert!(TableKind::from_file_name("Products.CSV").is_err());
    }
}
