//! Fixed-layout invoice document
//!
//! The document has a title, the client and invoice date, a single line
//! (description, job, equipment, quantity 1, price), the total and optional
//! notes. It is rendered to HTML by askama with escaping on, then handed to
//! an [`InvoiceRenderer`](crate::renderer::InvoiceRenderer).

use askama::Template;
use serde::Serialize;

use crate::error::RenderError;
use crate::invoice::Invoice;

#[derive(Debug, Clone, PartialEq, Serialize, Template)]
#[template(path = "invoice.html")]
pub struct InvoiceDocument {
    pub invoice_number: String,
    pub client_name: String,
    pub invoice_date: String,
    pub description: String,
    pub job_name: String,
    pub equipment_name: String,
    pub quantity: u32,
    pub price: String,
    pub total: String,
    pub notes: Option<String>,
}

impl InvoiceDocument {
    pub fn from_invoice(invoice: &Invoice) -> Self {
        let price = invoice.price.to_string();
        Self {
            invoice_number: invoice.invoice_number.to_string(),
            client_name: invoice.client_name.clone(),
            invoice_date: invoice.invoice_date.format("%Y-%m-%d").to_string(),
            description: invoice.description.clone(),
            job_name: invoice.job_name.clone(),
            equipment_name: invoice.equipment_name.clone(),
            quantity: 1,
            total: price.clone(),
            price,
            notes: invoice.notes.clone(),
        }
    }

    pub fn to_html(&self) -> Result<String, RenderError> {
        Ok(self.render()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoice::InvoiceRequest;
    use chrono::{NaiveDate, TimeZone, Utc};
    use core_kernel::{Currency, UserId};
    use rust_decimal_macros::dec;

    fn invoice(notes: Option<&str>) -> Invoice {
        Invoice::issue(
            UserId::new(),
            InvoiceRequest {
                client_name: "Hill & Sons <Ltd>".to_string(),
                job_name: "Operator".to_string(),
                equipment_name: "Skid steer".to_string(),
                description: "Grading".to_string(),
                price: Some(dec!(840)),
                invoice_date: NaiveDate::from_ymd_opt(2024, 6, 3),
                notes: notes.map(str::to_string),
                ..Default::default()
            },
            Currency::USD,
            Utc.with_ymd_and_hms(2024, 6, 3, 15, 0, 0).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_single_line_with_total() {
        let doc = InvoiceDocument::from_invoice(&invoice(None));
        assert_eq!(doc.quantity, 1);
        assert_eq!(doc.price, "$840.00");
        assert_eq!(doc.total, doc.price);
        assert_eq!(doc.invoice_date, "2024-06-03");
    }

    #[test]
    fn test_html_escapes_fields() {
        let html = InvoiceDocument::from_invoice(&invoice(None)).to_html().unwrap();
        assert!(html.contains("<h1>Invoice</h1>"));
        assert!(html.contains("Hill &amp; Sons &lt;Ltd&gt;"));
        assert!(html.contains("Total: $840.00"));
        assert!(!html.contains("Notes:"));
    }

    #[test]
    fn test_notes_section_when_present() {
        let html = InvoiceDocument::from_invoice(&invoice(Some("Net 30")))
            .to_html()
            .unwrap();
        assert!(html.contains("Notes:"));
        assert!(html.contains("Net 30"));
    }
}
