pub mod enums;
pub mod params;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::StockStatus;
pub use params::{AnalyticsParams, DateWindow};
pub use structs::{EnrichedProduct, Product, ProductId, PurchaseRecord, SaleRecord};
