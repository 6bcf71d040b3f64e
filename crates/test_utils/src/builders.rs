//! Test Data Builders
//!
//! Builders for the requests clients submit. Every builder starts from a
//! complete, valid request so a test only spells out the field it is about.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use domain_billing::InvoiceRequest;
use domain_catalog::{Action, BillingUnit, Contact, Equipment, Job};
use domain_fieldlog::LogEntryRequest;
use domain_rental::{OrderDraft, OrderStatus};

use crate::fixtures::TemporalFixtures;

/// Builder for order drafts
pub struct OrderDraftBuilder {
    draft: OrderDraft,
}

impl OrderDraftBuilder {
    pub fn new(equipment: &Equipment, job: &Job) -> Self {
        Self {
            draft: OrderDraft {
                client_name: "Riverbend Builders".to_string(),
                equipment_id: Some(equipment.id),
                job_id: Some(job.id),
                description: "Foundation trenching".to_string(),
                start_date: Some(TemporalFixtures::tomorrow()),
                ..OrderDraft::default()
            },
        }
    }

    pub fn client(mut self, name: impl Into<String>) -> Self {
        self.draft.client_name = name.into();
        self
    }

    pub fn start_date(mut self, start: DateTime<Utc>) -> Self {
        self.draft.start_date = Some(start);
        self
    }

    pub fn status(mut self, status: OrderStatus) -> Self {
        self.draft.status = Some(status);
        self
    }

    /// Marks the draft completed over the given span
    pub fn completed_between(mut self, pending: DateTime<Utc>, completed: DateTime<Utc>) -> Self {
        self.draft.status = Some(OrderStatus::Completed);
        self.draft.pending_date = Some(pending);
        self.draft.completed_date = Some(completed);
        self
    }

    pub fn build(self) -> OrderDraft {
        self.draft
    }
}

/// Builder for driver log entries
pub struct LogEntryBuilder {
    request: LogEntryRequest,
}

impl LogEntryBuilder {
    /// A trip entry against the given catalog records
    pub fn new(contact: &Contact, action: &Action, job: &Job) -> Self {
        Self {
            request: LogEntryRequest {
                contact_id: Some(contact.id),
                action_id: Some(action.id),
                job_id: Some(job.id),
                unit: Some(BillingUnit::Trip),
                description: "Delivered fill".to_string(),
                signature: "data:image/png;base64,iVBORw0KGgo=".to_string(),
                ..LogEntryRequest::default()
            },
        }
    }

    pub fn quantity(mut self, unit: BillingUnit, quantity: &str) -> Self {
        self.request.unit = Some(unit);
        self.request.quantity = Some(quantity.to_string());
        self
    }

    pub fn timed(mut self, unit: BillingUnit, start: DateTime<Utc>, end: Option<DateTime<Utc>>) -> Self {
        self.request.unit = Some(unit);
        self.request.start_time = Some(start);
        self.request.end_time = end;
        self
    }

    pub fn build(self) -> LogEntryRequest {
        self.request
    }
}

/// Builder for invoice requests
pub struct InvoiceRequestBuilder {
    request: InvoiceRequest,
}

impl Default for InvoiceRequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl InvoiceRequestBuilder {
    pub fn new() -> Self {
        Self {
            request: InvoiceRequest {
                client_name: "Riverbend Builders".to_string(),
                job_name: "Operator".to_string(),
                equipment_name: "Excavator 20t".to_string(),
                description: "Site preparation".to_string(),
                price: Some(dec!(840)),
                invoice_date: NaiveDate::from_ymd_opt(2024, 5, 1),
                ..InvoiceRequest::default()
            },
        }
    }

    pub fn price(mut self, price: Option<Decimal>) -> Self {
        self.request.price = price;
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.request.notes = Some(notes.into());
        self
    }

    pub fn build(self) -> InvoiceRequest {
        self.request
    }
}
