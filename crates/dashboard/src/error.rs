use analytics::AnalyticsError;
use dataset::DatasetError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Analytics error: {0}")]
    Analytics(#[from] AnalyticsError),

    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),

    #[error("Invalid dashboard query: {0}")]
    InvalidQuery(String),
}
