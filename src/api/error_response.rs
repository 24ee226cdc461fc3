//! HTTP error response handling for the API
//!
//! Errors map to two generic responses: 404 for `NotFound`, 500 for
//! everything else. The detail is logged and never sent to the client.

use crate::HarvestError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// JSON error body: `{"error": {"code": ..., "message": ...}}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl HarvestError {
    /// HTTP status this error is reported with
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<&HarvestError> for ApiError {
    fn from(err: &HarvestError) -> Self {
        let (code, message) = match err {
            HarvestError::NotFound(_) => ("not_found", "Not found"),
            _ => ("server_error", "Internal server error"),
        };
        ApiError {
            error: ErrorDetail {
                code: code.to_string(),
                message: message.to_string(),
            },
        }
    }
}

impl IntoResponse for HarvestError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status == StatusCode::NOT_FOUND {
            tracing::debug!("Request failed: {}", self);
        } else {
            tracing::error!("Request failed: {}", self);
        }

        (status, Json(ApiError::from(&self))).into_response()
    }
}
