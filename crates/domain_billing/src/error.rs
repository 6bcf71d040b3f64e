//! Billing domain errors

use core_kernel::PortError;
use thiserror::Error;

/// Failures of the document rendering step
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    /// The print service answered with a non-success status
    #[error("Print service returned {status}: {message}")]
    Service { status: u16, message: String },

    #[error("Print service unreachable: {0}")]
    Transport(String),

    #[error("Expected a PDF document, got {0}")]
    UnexpectedContentType(String),

    #[error("Print service returned an empty document")]
    EmptyDocument,
}

impl From<reqwest::Error> for RenderError {
    fn from(error: reqwest::Error) -> Self {
        match error.status() {
            Some(status) => RenderError::Service {
                status: status.as_u16(),
                message: error.to_string(),
            },
            None => RenderError::Transport(error.to_string()),
        }
    }
}

/// Errors that can occur in the billing domain
#[derive(Debug, Error)]
pub enum BillingError {
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("{0}")]
    Validation(String),

    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    #[error("{0}")]
    Conflict(String),

    #[error("Failed to generate invoice: {0}")]
    Render(#[from] RenderError),

    #[error("Failed to {operation}: {source}")]
    Persistence {
        operation: &'static str,
        #[source]
        source: PortError,
    },
}

impl BillingError {
    pub fn is_validation(&self) -> bool {
        matches!(self, BillingError::MissingFields(_) | BillingError::Validation(_))
    }

    /// Wraps a port failure with the operation that hit it
    pub fn from_port(operation: &'static str, error: PortError) -> Self {
        match error {
            PortError::NotFound { entity_type, id } => BillingError::NotFound {
                entity: entity_type,
                id,
            },
            PortError::Validation { message, .. } => BillingError::Validation(message),
            PortError::Conflict { message } => BillingError::Conflict(message),
            source => BillingError::Persistence { operation, source },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_message() {
        let err = BillingError::MissingFields(vec!["client_name", "price"]);
        assert_eq!(err.to_string(), "Missing required fields: client_name, price");
        assert!(err.is_validation());
    }

    #[test]
    fn test_render_failure_is_prefixed() {
        let err = BillingError::from(RenderError::Service {
            status: 502,
            message: "bad gateway".to_string(),
        });
        assert_eq!(
            err.to_string(),
            "Failed to generate invoice: Print service returned 502: bad gateway"
        );
    }

    #[test]
    fn test_backend_failure_keeps_operation() {
        let err = BillingError::from_port("store invoice document", PortError::internal("disk full"));
        assert!(err.to_string().starts_with("Failed to store invoice document"));
        assert!(!err.is_validation());
    }
}
