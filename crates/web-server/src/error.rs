use analytics::AnalyticsError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use dashboard::DashboardError;
use dataset::DatasetError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Dashboard error: {0}")]
    Dashboard(#[from] DashboardError),
    #[error("Upload error: {0}")]
    Upload(#[from] axum::extract::multipart::MultipartError),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("The request did not finish within {0} seconds")]
    Timeout(u64),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DatasetError> for AppError {
    fn from(err: DatasetError) -> Self {
        AppError::Dashboard(DashboardError::Dataset(err))
    }
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Dashboard(DashboardError::Analytics(AnalyticsError::NotFound(_))) => {
                StatusCode::NOT_FOUND
            }
            AppError::Dashboard(DashboardError::Analytics(AnalyticsError::MissingPrecondition(_))) => {
                StatusCode::CONFLICT
            }
            AppError::Dashboard(DashboardError::Analytics(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Dashboard(DashboardError::Dataset(DatasetError::Io { .. })) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Dashboard(DashboardError::Dataset(DatasetError::Write(_))) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Dashboard(DashboardError::Dataset(_)) => StatusCode::BAD_REQUEST,
            AppError::Dashboard(DashboardError::InvalidQuery(_)) => StatusCode::BAD_REQUEST,
            AppError::Upload(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Converts our custom `AppError` into an HTTP response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_message = if status.is_server_error() {
            tracing::error!(error = ?self, "Request failed.");
            if matches!(self, AppError::Timeout(_)) {
                self.to_string()
            } else {
                "An internal error occurred while building the dashboard".to_string()
            }
        } else {
            tracing::warn!(error = %self, "Request rejected.");
            self.to_string()
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
