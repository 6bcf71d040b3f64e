//! Rental order aggregate
//!
//! # Invariants
//!
//! - An order is priced only when it is completed; otherwise its price is zero
//! - A completed order has both a pending and a completed date, and the
//!   completed date does not precede the pending date
//! - The computed price never exceeds the equipment's total cost, when set
//! - Cancelled orders cannot be completed

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use core_kernel::{EquipmentId, JobId, Money, OrderId, UserId};
use domain_catalog::{Equipment, Job};

use crate::error::RentalError;
use crate::pricing::{OrderPriceEngine, OrderPricingInput};

/// Order lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OrderStatus {
    #[default]
    Pending,
    Active,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Active => "Active",
            OrderStatus::Completed => "Completed",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    /// Whether an order in this status may move to `next`
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        !matches!((self, next), (OrderStatus::Cancelled, OrderStatus::Completed))
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = RentalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(OrderStatus::Pending),
            "active" => Ok(OrderStatus::Active),
            "completed" => Ok(OrderStatus::Completed),
            "cancelled" | "canceled" => Ok(OrderStatus::Cancelled),
            other => Err(RentalError::Validation(format!("unknown order status: {}", other))),
        }
    }
}

/// The editable fields of an order, as submitted by a client
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderDraft {
    pub client_name: String,
    pub equipment_id: Option<EquipmentId>,
    pub job_id: Option<JobId>,
    pub description: String,
    pub start_date: Option<DateTime<Utc>>,
    pub approximate_end_date: Option<DateTime<Utc>>,
    pub status: Option<OrderStatus>,
    pub pending_date: Option<DateTime<Utc>>,
    pub completed_date: Option<DateTime<Utc>>,
}

impl OrderDraft {
    /// Lists every required field that is missing or blank
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.client_name.trim().is_empty() {
            missing.push("client_name");
        }
        if self.equipment_id.is_none() {
            missing.push("equipment_id");
        }
        if self.job_id.is_none() {
            missing.push("job_id");
        }
        if self.description.trim().is_empty() {
            missing.push("description");
        }
        if self.start_date.is_none() {
            missing.push("start_date");
        }
        missing
    }

    pub fn ensure_complete(&self) -> Result<(), RentalError> {
        let missing = self.missing_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(RentalError::MissingFields(missing))
        }
    }
}

/// A rental order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub equipment_id: EquipmentId,
    pub equipment_name: String,
    pub job_id: JobId,
    pub job_name: String,
    pub client_name: String,
    pub description: String,
    pub price: Money,
    pub start_date: DateTime<Utc>,
    pub approximate_end_date: Option<DateTime<Utc>>,
    pub status: OrderStatus,
    pub pending_date: Option<DateTime<Utc>>,
    pub completed_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Creates an order from a draft
    ///
    /// `earliest_start` is the first instant of the current business day; the
    /// start date may not fall before it.
    pub fn create(
        user_id: UserId,
        draft: OrderDraft,
        equipment: &Equipment,
        job: &Job,
        engine: &OrderPriceEngine,
        now: DateTime<Utc>,
        earliest_start: DateTime<Utc>,
    ) -> Result<Self, RentalError> {
        draft.ensure_complete()?;
        let start_date = draft
            .start_date
            .ok_or_else(|| RentalError::MissingFields(vec!["start_date"]))?;
        if start_date < earliest_start {
            return Err(RentalError::StartDateInPast {
                start_date,
                earliest_start,
            });
        }
        if !job.roles.is_equipment_man {
            return Err(RentalError::JobNotOrderable(job.name.clone()));
        }

        let mut order = Order {
            id: OrderId::new_v7(),
            user_id,
            equipment_id: equipment.id,
            equipment_name: equipment.name.clone(),
            job_id: job.id,
            job_name: job.name.clone(),
            client_name: String::new(),
            description: String::new(),
            price: Money::zero(engine.currency()),
            start_date,
            approximate_end_date: None,
            status: OrderStatus::Pending,
            pending_date: None,
            completed_date: None,
            created_at: now,
            updated_at: now,
        };
        order.apply(draft, equipment, job, engine, now)?;
        Ok(order)
    }

    /// Replaces the editable fields with `draft` and reprices the order
    pub fn apply(
        &mut self,
        draft: OrderDraft,
        equipment: &Equipment,
        job: &Job,
        engine: &OrderPriceEngine,
        now: DateTime<Utc>,
    ) -> Result<(), RentalError> {
        draft.ensure_complete()?;
        if draft.equipment_id != Some(equipment.id) || draft.job_id != Some(job.id) {
            return Err(RentalError::Validation(
                "draft does not match the supplied equipment and job".to_string(),
            ));
        }

        let status = draft.status.unwrap_or(self.status);
        if !self.status.can_transition_to(status) {
            return Err(RentalError::InvalidTransition {
                from: self.status,
                to: status,
            });
        }

        let mut next = self.clone();
        next.client_name = draft.client_name.trim().to_string();
        next.description = draft.description;
        next.equipment_id = equipment.id;
        next.equipment_name = equipment.name.clone();
        next.job_id = job.id;
        next.job_name = job.name.clone();
        if let Some(start_date) = draft.start_date {
            next.start_date = start_date;
        }
        next.approximate_end_date = draft.approximate_end_date;
        next.pending_date = draft.pending_date.or(self.pending_date);
        next.completed_date = draft.completed_date.or(self.completed_date);
        next.enter_status(status, now)?;
        next.reprice(equipment, job, engine);
        next.updated_at = now;

        *self = next;
        Ok(())
    }

    /// Moves to `status`, stamping the lifecycle dates it requires
    pub fn transition(
        &mut self,
        status: OrderStatus,
        equipment: &Equipment,
        job: &Job,
        engine: &OrderPriceEngine,
        now: DateTime<Utc>,
    ) -> Result<(), RentalError> {
        if !self.status.can_transition_to(status) {
            return Err(RentalError::InvalidTransition {
                from: self.status,
                to: status,
            });
        }
        let mut next = self.clone();
        next.enter_status(status, now)?;
        next.reprice(equipment, job, engine);
        next.updated_at = now;
        *self = next;
        Ok(())
    }

    fn enter_status(&mut self, status: OrderStatus, now: DateTime<Utc>) -> Result<(), RentalError> {
        match status {
            OrderStatus::Pending => {
                self.pending_date.get_or_insert(now);
            }
            OrderStatus::Completed => {
                self.completed_date.get_or_insert(now);
                let (Some(pending), Some(completed)) = (self.pending_date, self.completed_date) else {
                    return Err(RentalError::MissingFields(vec!["pending_date"]));
                };
                if completed < pending {
                    return Err(RentalError::CompletedBeforePending { pending, completed });
                }
            }
            OrderStatus::Active | OrderStatus::Cancelled => {}
        }
        self.status = status;
        Ok(())
    }

    fn reprice(&mut self, equipment: &Equipment, job: &Job, engine: &OrderPriceEngine) {
        self.price = if self.status == OrderStatus::Completed {
            engine.price(&OrderPricingInput {
                prices: Some(&equipment.prices),
                roles: Some(&job.roles),
                pending_date: self.pending_date,
                completed_date: self.completed_date,
            })
        } else {
            Money::zero(engine.currency())
        };
    }

    /// The draft that reproduces this order's editable fields
    pub fn to_draft(&self) -> OrderDraft {
        OrderDraft {
            client_name: self.client_name.clone(),
            equipment_id: Some(self.equipment_id),
            job_id: Some(self.job_id),
            description: self.description.clone(),
            start_date: Some(self.start_date),
            approximate_end_date: self.approximate_end_date,
            status: Some(self.status),
            pending_date: self.pending_date,
            completed_date: self.completed_date,
        }
    }
}
