use core_types::ProductId;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalyticsError {
    #[error("Product '{0}' was not found in the product table")]
    NotFound(ProductId),

    #[error("Missing precondition: {0}")]
    MissingPrecondition(String),

    #[error("Invalid analytics parameters: {0}")]
    InvalidParameters(String),

    #[error("Error in calculation: {0}")]
    Calculation(String),
}
