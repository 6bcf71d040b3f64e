//! Invoice application service

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, instrument, warn};

use core_kernel::{Currency, PortError, UserId};

use crate::document::InvoiceDocument;
use crate::error::{BillingError, RenderError};
use crate::invoice::{Invoice, InvoiceNumber, InvoiceRequest};
use crate::ports::InvoicePort;
use crate::renderer::{InvoiceRenderer, RenderedDocument};
use crate::store::DocumentStore;

/// How many consecutive milliseconds are tried when numbering an invoice
const NUMBERING_ATTEMPTS: i64 = 16;

/// A recorded invoice together with its rendered file
#[derive(Debug, Clone)]
pub struct GeneratedInvoice {
    pub invoice: Invoice,
    pub document: RenderedDocument,
}

impl GeneratedInvoice {
    /// File name offered to the client, `{invoiceNumber}.pdf`
    pub fn file_name(&self) -> String {
        format!("{}.pdf", self.invoice.invoice_number)
    }
}

pub struct InvoiceService {
    invoices: Arc<dyn InvoicePort>,
    renderer: Arc<dyn InvoiceRenderer>,
    store: Arc<dyn DocumentStore>,
    currency: Currency,
}

impl InvoiceService {
    pub fn new(
        invoices: Arc<dyn InvoicePort>,
        renderer: Arc<dyn InvoiceRenderer>,
        store: Arc<dyn DocumentStore>,
        currency: Currency,
    ) -> Self {
        Self {
            invoices,
            renderer,
            store,
            currency,
        }
    }

    /// Validates, numbers, renders, stores and records an invoice
    pub async fn generate(&self, user_id: UserId, request: InvoiceRequest) -> Result<GeneratedInvoice, BillingError> {
        self.generate_at(user_id, request, Utc::now()).await
    }

    /// Generates an invoice numbered from `now`
    ///
    /// A number already taken by a stored document or record moves on to the
    /// next millisecond. Cleanup after a failed save only removes the
    /// document this call wrote.
    #[instrument(skip(self, request), fields(client = %request.client_name))]
    pub async fn generate_at(
        &self,
        user_id: UserId,
        request: InvoiceRequest,
        now: DateTime<Utc>,
    ) -> Result<GeneratedInvoice, BillingError> {
        let mut invoice = Invoice::issue(user_id, request, self.currency, now)?;

        for attempt in 1..=NUMBERING_ATTEMPTS {
            let document = self
                .renderer
                .render(&InvoiceDocument::from_invoice(&invoice))
                .await?;
            if document.is_empty() {
                return Err(RenderError::EmptyDocument.into());
            }

            match self
                .store
                .put(&invoice.pdf_path, &document.bytes, &document.content_type)
                .await
            {
                Ok(_) => {}
                Err(PortError::Conflict { .. }) => {
                    debug!(invoice_number = %invoice.invoice_number, "Invoice document exists, renumbering");
                    invoice.renumber(InvoiceNumber::generate(now + Duration::milliseconds(attempt)));
                    continue;
                }
                Err(e) => return Err(BillingError::from_port("store invoice document", e)),
            }

            match self.invoices.save_invoice(invoice.clone()).await {
                Ok(saved) => {
                    info!(
                        invoice_number = %saved.invoice_number,
                        price = %saved.price,
                        bytes = document.len(),
                        "Invoice generated"
                    );
                    return Ok(GeneratedInvoice {
                        invoice: saved,
                        document,
                    });
                }
                Err(e) => {
                    if let Err(cleanup) = self.store.delete(&invoice.pdf_path).await {
                        warn!(path = %invoice.pdf_path, error = %cleanup, "Failed to remove orphaned invoice document");
                    }
                    if !matches!(e, PortError::Conflict { .. }) {
                        return Err(BillingError::from_port("save invoice", e));
                    }
                    debug!(invoice_number = %invoice.invoice_number, "Invoice number taken, renumbering");
                    invoice.renumber(InvoiceNumber::generate(now + Duration::milliseconds(attempt)));
                }
            }
        }

        Err(BillingError::Conflict(format!(
            "No free invoice number after {} attempts",
            NUMBERING_ATTEMPTS
        )))
    }

    pub async fn get(&self, number: &InvoiceNumber) -> Result<Invoice, BillingError> {
        self.invoices
            .get_invoice(number)
            .await
            .map_err(|e| BillingError::from_port("load invoice", e))
    }

    pub async fn list(&self, user_id: UserId) -> Result<Vec<Invoice>, BillingError> {
        self.invoices
            .list_invoices(user_id)
            .await
            .map_err(|e| BillingError::from_port("load invoices", e))
    }

    /// Fetches a stored invoice and its PDF
    pub async fn download(&self, number: &InvoiceNumber) -> Result<GeneratedInvoice, BillingError> {
        let invoice = self.get(number).await?;
        let bytes = self
            .store
            .get(&invoice.pdf_path)
            .await
            .map_err(|e| BillingError::from_port("load invoice document", e))?;
        Ok(GeneratedInvoice {
            invoice,
            document: RenderedDocument::pdf(bytes),
        })
    }
}
