//! Rental domain errors

use chrono::{DateTime, Utc};
use core_kernel::PortError;
use thiserror::Error;

use crate::order::OrderStatus;

#[derive(Debug, Error)]
pub enum RentalError {
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("Start date {start_date} is in the past")]
    StartDateInPast {
        start_date: DateTime<Utc>,
        earliest_start: DateTime<Utc>,
    },

    #[error("Completed date {completed} precedes pending date {pending}")]
    CompletedBeforePending {
        pending: DateTime<Utc>,
        completed: DateTime<Utc>,
    },

    #[error("Cannot move order from {from} to {to}")]
    InvalidTransition {
        from: OrderStatus,
        to: OrderStatus,
    },

    /// Only equipment-man jobs can be attached to an order
    #[error("Job {0} cannot be assigned to rental orders")]
    JobNotOrderable(String),

    #[error("{0}")]
    Validation(String),

    #[error("{entity} not found: {id}")]
    NotFound {
        entity: String,
        id: String,
    },

    #[error("{0}")]
    Conflict(String),

    /// A storage or lookup failure, prefixed with what was being attempted
    #[error("Failed to {operation}: {source}")]
    Persistence {
        operation: &'static str,
        #[source]
        source: PortError,
    },
}

impl RentalError {
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            RentalError::MissingFields(_)
                | RentalError::StartDateInPast { .. }
                | RentalError::CompletedBeforePending { .. }
                | RentalError::JobNotOrderable(_)
                | RentalError::Validation(_)
        )
    }

    /// Wraps a port failure with the operation that hit it
    ///
    /// Not-found, validation and conflict errors keep their own meaning; only
    /// backend failures are prefixed.
    pub fn from_port(operation: &'static str, error: PortError) -> Self {
        match error {
            PortError::NotFound { entity_type, id } => RentalError::NotFound {
                entity: entity_type,
                id,
            },
            PortError::Validation { message, .. } => RentalError::Validation(message),
            PortError::Conflict { message } => RentalError::Conflict(message),
            source => RentalError::Persistence { operation, source },
        }
    }
}
