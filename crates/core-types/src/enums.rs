use serde::{Deserialize, Serialize};
use std::fmt;

/// Three-way classification of a product's stock relative to its reorder level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StockStatus {
    Understocked,
    #[serde(rename = "Properly Stocked")]
    ProperlyStocked,
    Overstocked,
}

impl StockStatus {
    /// The label used in tables and CSV exports.
    pub fn as_str(&self) -> &'static str {
        match self {
            StockStatus::Understocked => "Understocked",
            StockStatus::ProperlyStocked => "Properly Stocked",
            StockStatus::Overstocked => "Overstocked",
        }
    }

    /// Understocked and overstocked products both need attention.
    pub fn is_stock_issue(&self) -> bool {
        !matches!(self, StockStatus::ProperlyStocked)
    }
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
