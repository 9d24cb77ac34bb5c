use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use service::errors::ServiceError;
use thiserror::Error;
use tracing::error;

use crate::observability::STORAGE_FAILURES_TOTAL;

/// JSON error body returned by the persons API.
#[derive(Debug, Serialize)]
pub struct JsonApiError {
    #[serde(skip)]
    pub status: StatusCode,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, error: &str, detail: Option<String>) -> Self {
        Self { status, error: error.to_string(), detail }
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Model(models::errors::ModelError::Validation(msg)) => {
                JsonApiError::new(StatusCode::BAD_REQUEST, "Validation Error", Some(msg))
            }
            ServiceError::Storage { .. } | ServiceError::Serialize(_) | ServiceError::Corrupt { .. } => {
                STORAGE_FAILURES_TOTAL.inc();
                error!(error = %e, code = e.code(), "persistence failure");
                JsonApiError::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Storage Error",
                    Some("the change could not be persisted".into()),
                )
            }
            ServiceError::IdsExhausted { .. } => {
                error!(error = %e, code = e.code(), "create refused: id space exhausted");
                JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Id Exhausted", Some(e.to_string()))
            }
        }
    }
}

impl From<models::errors::ModelError> for JsonApiError {
    fn from(e: models::errors::ModelError) -> Self {
        ServiceError::from(e).into()
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("storage unavailable: {0}")]
    Storage(#[from] ServiceError),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}
