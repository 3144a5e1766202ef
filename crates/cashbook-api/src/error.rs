//! Error types for cashbook-api

use axum::{http::StatusCode, response::IntoResponse, Json};
use cashbook_core::{CoreError, ErrorCode, ErrorDetails};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Bad request: {message}")]
    BadRequest { message: String },

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest { message: message.into() }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::Core(e) => status_for(e.code()),
        }
    }

    pub fn to_details(&self) -> ErrorDetails {
        match self {
            ApiError::BadRequest { message } => {
                ErrorDetails::new(ErrorCode::ValidationError, message.clone())
            }
            ApiError::Core(e) => e.to_details(),
        }
    }
}

/// HTTP status for a core error code
pub fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::ValidationError => StatusCode::BAD_REQUEST,
        ErrorCode::UnresolvedAccount | ErrorCode::UnmappableCategory => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorCode::DuplicateAccount | ErrorCode::AggregationInconsistency => StatusCode::CONFLICT,
        ErrorCode::JournalEntryNotFound | ErrorCode::PayableNotFound => StatusCode::NOT_FOUND,
        ErrorCode::ImbalancedEntry | ErrorCode::InvalidRecord | ErrorCode::StorageError => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        if status.is_server_error() {
            log::error!("{}", self);
        } else {
            log::debug!("Request rejected ({}): {}", status, self);
        }
        (status, Json(self.to_details())).into_response()
    }
}
