//! API error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use core_kernel::PortError;
use domain_billing::BillingError;
use domain_catalog::CatalogError;
use domain_fieldlog::FieldLogError;
use domain_rental::RentalError;

use crate::auth::AuthError;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized", "Unauthorized".to_string()),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg),
            ApiError::Internal(msg) => {
                error!(message = %msg, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg)
            }
            ApiError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, "validation_error", msg),
        };

        let body = ErrorResponse {
            error: error_type.to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<PortError> for ApiError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            PortError::Validation { message, .. } => ApiError::Validation(message),
            PortError::Conflict { message } => ApiError::Conflict(message),
            PortError::Unauthorized { .. } => ApiError::Unauthorized,
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            CatalogError::MissingField(_) => ApiError::BadRequest(err.to_string()),
            other => ApiError::Validation(other.to_string()),
        }
    }
}

impl From<RentalError> for ApiError {
    fn from(err: RentalError) -> Self {
        match err {
            RentalError::MissingFields(_) => ApiError::BadRequest(err.to_string()),
            RentalError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            RentalError::Conflict(msg) => ApiError::Conflict(msg),
            RentalError::InvalidTransition { .. } => ApiError::Conflict(err.to_string()),
            RentalError::Persistence { .. } => ApiError::Internal(err.to_string()),
            other => ApiError::Validation(other.to_string()),
        }
    }
}

impl From<FieldLogError> for ApiError {
    fn from(err: FieldLogError) -> Self {
        match err {
            FieldLogError::MissingFields(_) => ApiError::BadRequest(err.to_string()),
            FieldLogError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            FieldLogError::Conflict(msg) => ApiError::Conflict(msg),
            FieldLogError::Persistence { .. } => ApiError::Internal(err.to_string()),
            other => ApiError::Validation(other.to_string()),
        }
    }
}

impl From<BillingError> for ApiError {
    fn from(err: BillingError) -> Self {
        match err {
            BillingError::MissingFields(_) => ApiError::BadRequest(err.to_string()),
            BillingError::Validation(msg) => ApiError::Validation(msg),
            BillingError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            BillingError::Conflict(msg) => ApiError::Conflict(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors
            .field_errors()
            .keys()
            .map(|field| field.to_string())
            .collect();
        fields.sort();
        ApiError::Validation(format!("invalid fields: {}", fields.join(", ")))
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingPermission(role) => ApiError::Forbidden(format!("requires role {}", role)),
            _ => ApiError::Unauthorized,
        }
    }
}
