//! Driver log DTOs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use core_kernel::Money;

/// `GET /logs` query string
#[derive(Debug, Default, Deserialize)]
pub struct LogListParams {
    /// Only honoured for admins
    pub driver_id: Option<Uuid>,
    /// Calendar day in the business timezone
    pub day: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct LogQuoteResponse {
    pub total_price: Money,
}
