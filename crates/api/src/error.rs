//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use usecase::UseCaseError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Bad request from the client, caught before reaching a use case.
    BadRequest(String),
    /// A use-case failure, mapped by its code.
    UseCase(UseCaseError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::UseCase(err) => (use_case_status(&err), err.code(), err.to_string()),
        };

        if status.is_server_error() {
            tracing::error!(%code, error = %message, "internal server error");
        }

        let body = serde_json::json!({ "error": message, "code": code });
        (status, axum::Json(body)).into_response()
    }
}

fn use_case_status(err: &UseCaseError) -> StatusCode {
    match err {
        UseCaseError::CustomerNotFound(_)
        | UseCaseError::ProductNotFound(_)
        | UseCaseError::OrderNotFound(_) => StatusCode::NOT_FOUND,
        UseCaseError::InsufficientStock { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        UseCaseError::StockConflict(_) | UseCaseError::DuplicateEmail(_) => StatusCode::CONFLICT,
        UseCaseError::Validation(domain::DomainError::InvalidTransition { .. }) => {
            StatusCode::CONFLICT
        }
        UseCaseError::Validation(_) => StatusCode::BAD_REQUEST,
        UseCaseError::CorruptRecord { .. } | UseCaseError::Storage(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl From<UseCaseError> for ApiError {
    fn from(err: UseCaseError) -> Self {
        ApiError::UseCase(err)
    }
}
