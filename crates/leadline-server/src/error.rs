use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use leadline_core::CoreError;
use leadline_store::StoreError;
use serde_json::json;
use thiserror::Error;

pub const INTERNAL_MESSAGE: &str = "Internal Server Error";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized: Invalid API Key")]
    Unauthorized,
    #[error("{0}")]
    Validation(String),
    #[error("storage failure: {0}")]
    Storage(#[from] StoreError),
    #[error("internal failure: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Storage(StoreError::Core(_)) => StatusCode::BAD_REQUEST,
            ApiError::Storage(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn public_message(&self) -> String {
        match self {
            ApiError::Storage(StoreError::Core(CoreError::EmptyName)) => {
                "Name is required".to_string()
            }
            ApiError::Storage(StoreError::Core(err)) => err.to_string(),
            ApiError::Storage(_) | ApiError::Internal(_) => INTERNAL_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "lead ingestion failed");
        }
        (status, Json(json!({ "error": self.public_message() }))).into_response()
    }
}
