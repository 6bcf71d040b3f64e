//! Field log domain errors

use core_kernel::PortError;
use domain_catalog::BillingUnit;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FieldLogError {
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    /// The chosen unit has no rate on the action
    #[error("Unit {unit} is not available for action {action}")]
    UnitUnavailable {
        unit: BillingUnit,
        action: String,
    },

    #[error("{0}")]
    Validation(String),

    #[error("{entity} not found: {id}")]
    NotFound {
        entity: String,
        id: String,
    },

    #[error("{0}")]
    Conflict(String),

    #[error("Failed to {operation}: {source}")]
    Persistence {
        operation: &'static str,
        #[source]
        source: PortError,
    },
}

impl FieldLogError {
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            FieldLogError::MissingFields(_)
                | FieldLogError::UnitUnavailable { .. }
                | FieldLogError::Validation(_)
        )
    }

    /// Wraps a port failure with the operation that hit it
    pub fn from_port(operation: &'static str, error: PortError) -> Self {
        match error {
            PortError::NotFound { entity_type, id } => FieldLogError::NotFound {
                entity: entity_type,
                id,
            },
            PortError::Validation { message, .. } => FieldLogError::Validation(message),
            PortError::Conflict { message } => FieldLogError::Conflict(message),
            source => FieldLogError::Persistence { operation, source },
        }
    }
}
