//! Invoice DTOs

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use core_kernel::Money;
use domain_billing::{Invoice, InvoiceStatus};

/// An invoice as listed to its owner; the PDF is fetched separately
#[derive(Debug, Serialize)]
pub struct InvoiceSummary {
    pub invoice_number: String,
    pub client_name: String,
    pub job_name: String,
    pub equipment_name: String,
    pub description: String,
    pub price: Money,
    pub invoice_date: NaiveDate,
    pub notes: Option<String>,
    pub status: InvoiceStatus,
    pub created_at: DateTime<Utc>,
}

impl From<Invoice> for InvoiceSummary {
    fn from(invoice: Invoice) -> Self {
        Self {
            invoice_number: invoice.invoice_number.to_string(),
            client_name: invoice.client_name,
            job_name: invoice.job_name,
            equipment_name: invoice.equipment_name,
            description: invoice.description,
            price: invoice.price,
            invoice_date: invoice.invoice_date,
            notes: invoice.notes,
            status: invoice.status,
            created_at: invoice.created_at,
        }
    }
}
