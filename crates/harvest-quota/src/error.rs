use crate::config::ConfigError;
use crate::quota::{CapacityImportError, QuotaServiceError};
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Failures surfaced by the service binary and the read-only quota endpoints.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("capacity import error: {0}")]
    CapacityImport(#[from] CapacityImportError),
    #[error(transparent)]
    Quota(#[from] QuotaServiceError),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::CapacityImport(_) => StatusCode::BAD_REQUEST,
            AppError::Quota(QuotaServiceError::Projection(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Quota(QuotaServiceError::Store(_)) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Config(_) | AppError::Telemetry(_) | AppError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
