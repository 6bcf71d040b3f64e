//! Invoice records
//!
//! This module handles invoice requests, numbering and the stored record.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{Currency, EquipmentId, JobId, Money, UserId};

use crate::error::BillingError;

/// Invoice status
///
/// Invoices are immutable once generated, so there is a single state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    #[default]
    Generated,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Generated => "generated",
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Human-readable invoice identity, `INV-{unix millis}`
///
/// Numbers are unique across users. When two invoices land on the same
/// millisecond the later one takes the next free millisecond.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvoiceNumber(String);

impl InvoiceNumber {
    const PREFIX: &'static str = "INV-";

    /// Numbers an invoice generated at `at`
    pub fn generate(at: DateTime<Utc>) -> Self {
        Self(format!("{}{}", Self::PREFIX, at.timestamp_millis()))
    }

    /// Accepts a stored number, checking its shape
    pub fn parse(raw: &str) -> Result<Self, BillingError> {
        let valid = raw
            .strip_prefix(Self::PREFIX)
            .is_some_and(|millis| !millis.is_empty() && millis.bytes().all(|b| b.is_ascii_digit()));
        if valid {
            Ok(Self(raw.to_string()))
        } else {
            Err(BillingError::Validation(format!("Invalid invoice number: {}", raw)))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvoiceNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Storage path of an invoice PDF
pub fn document_path(user_id: UserId, number: &InvoiceNumber) -> String {
    format!("invoices/{}/{}.pdf", user_id.as_uuid(), number)
}

/// The fields a user submits to generate an invoice
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InvoiceRequest {
    pub client_name: String,
    pub job_name: String,
    pub equipment_name: String,
    pub description: String,
    pub price: Option<Decimal>,
    pub invoice_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub job_id: Option<JobId>,
    pub equipment_id: Option<EquipmentId>,
}

impl InvoiceRequest {
    /// Lists the required fields that are missing
    ///
    /// A zero price counts as missing.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        for (name, value) in [
            ("client_name", &self.client_name),
            ("job_name", &self.job_name),
            ("equipment_name", &self.equipment_name),
            ("description", &self.description),
        ] {
            if value.trim().is_empty() {
                missing.push(name);
            }
        }
        if self.price.map_or(true, |price| price.is_zero()) {
            missing.push("price");
        }
        if self.invoice_date.is_none() {
            missing.push("invoice_date");
        }
        missing
    }

    pub fn validate(&self) -> Result<(), BillingError> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(BillingError::MissingFields(missing));
        }
        if self.price.is_some_and(|price| price.is_sign_negative()) {
            return Err(BillingError::Validation("Invoice price must be positive".to_string()));
        }
        Ok(())
    }
}

/// A generated invoice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub invoice_number: InvoiceNumber,
    pub user_id: UserId,
    pub client_name: String,
    pub job_name: String,
    pub equipment_name: String,
    pub description: String,
    pub price: Money,
    pub invoice_date: NaiveDate,
    pub notes: Option<String>,
    pub job_id: Option<JobId>,
    pub equipment_id: Option<EquipmentId>,
    /// Where the rendered PDF is stored
    pub pdf_path: String,
    pub status: InvoiceStatus,
    pub created_at: DateTime<Utc>,
}

impl Invoice {
    /// Builds the record for a validated request generated at `now`
    pub fn issue(
        user_id: UserId,
        request: InvoiceRequest,
        currency: Currency,
        now: DateTime<Utc>,
    ) -> Result<Self, BillingError> {
        request.validate()?;
        let (Some(price), Some(invoice_date)) = (request.price, request.invoice_date) else {
            return Err(BillingError::MissingFields(vec!["price", "invoice_date"]));
        };

        let price = Money::rounded(price, currency);
        if price.ensure_storable().is_err() {
            return Err(BillingError::Validation("Invoice price is too large".to_string()));
        }
        if !price.is_positive() {
            return Err(BillingError::Validation("Invoice price must be at least one cent".to_string()));
        }

        let invoice_number = InvoiceNumber::generate(now);
        let pdf_path = document_path(user_id, &invoice_number);
        let notes = request.notes.filter(|notes| !notes.trim().is_empty());

        Ok(Self {
            invoice_number,
            user_id,
            client_name: request.client_name.trim().to_string(),
            job_name: request.job_name.trim().to_string(),
            equipment_name: request.equipment_name.trim().to_string(),
            description: request.description.trim().to_string(),
            price,
            invoice_date,
            notes,
            job_id: request.job_id,
            equipment_id: request.equipment_id,
            pdf_path,
            status: InvoiceStatus::Generated,
            created_at: now,
        })
    }

    /// Gives the invoice another number and the matching storage path
    pub fn renumber(&mut self, number: InvoiceNumber) {
        self.pdf_path = document_path(self.user_id, &number);
        self.invoice_number = number;
    }
}
