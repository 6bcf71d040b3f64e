//! Catalog domain errors

use core_kernel::PortError;
use thiserror::Error;

/// Errors raised while validating catalog records
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{entity} not found: {id}")]
    NotFound {
        entity: &'static str,
        id: String,
    },

    /// A required field is missing or empty
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// A rate is negative or otherwise unusable
    #[error("Invalid rate for {field}: {message}")]
    InvalidRate {
        field: String,
        message: String,
    },

    #[error("Unknown billing unit: {0}")]
    UnknownUnit(String),

    #[error("Catalog validation failed: {0}")]
    ValidationFailed(String),
}

impl CatalogError {
    pub fn invalid_rate(field: impl Into<String>, message: impl Into<String>) -> Self {
        CatalogError::InvalidRate {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Collects `validator` errors into a single message
    pub fn from_validation(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors
            .field_errors()
            .keys()
            .map(|field| field.to_string())
            .collect();
        fields.sort();
        CatalogError::ValidationFailed(format!("invalid fields: {}", fields.join(", ")))
    }
}

impl From<CatalogError> for PortError {
    fn from(error: CatalogError) -> Self {
        match error {
            CatalogError::NotFound { entity, id } => PortError::not_found(entity, id),
            CatalogError::MissingField(field) => {
                PortError::validation_field(format!("{} is required", field), field)
            }
            CatalogError::InvalidRate { field, message } => PortError::validation_field(
                format!("Invalid rate for {}: {}", field, message),
                field,
            ),
            other => PortError::validation(other.to_string()),
        }
    }
}
