use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::warn;

use crate::dataset::DatasetError;

/// Error envelope every failed request carries: `{"detail": <message>}`.
#[derive(Debug, Serialize)]
struct ErrorBody {
    detail: String,
}

impl IntoResponse for DatasetError {
    fn into_response(self) -> Response {
        let status = match &self {
            DatasetError::UnsupportedFileType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            DatasetError::FileNotFound => StatusCode::NOT_FOUND,
            DatasetError::InvalidStructure { .. } | DatasetError::DataIntegrity => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            DatasetError::InternalProcessing => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let detail = self.to_string();
        warn!("Request rejected with {status}: {detail}");

        (status, Json(ErrorBody { detail })).into_response()
    }
}
