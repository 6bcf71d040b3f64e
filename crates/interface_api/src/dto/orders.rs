//! Order DTOs

use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use core_kernel::{EquipmentId, JobId};
use domain_rental::OrderStatus;

/// `GET /orders` query string
#[derive(Debug, Default, Deserialize)]
pub struct OrderListParams {
    /// Only honoured for admins; everyone else sees their own orders
    pub user_id: Option<Uuid>,
    pub status: Option<OrderStatus>,
    pub start_from: Option<DateTime<Utc>>,
    pub start_to: Option<DateTime<Utc>>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: OrderStatus,
}

#[derive(Debug, Default, Deserialize)]
pub struct OrderQuoteRequest {
    pub equipment_id: Option<EquipmentId>,
    pub job_id: Option<JobId>,
    pub pending_date: Option<DateTime<Utc>>,
    pub completed_date: Option<DateTime<Utc>>,
}
