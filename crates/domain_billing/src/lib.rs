//! Billing Domain - Invoice Generation
//!
//! An invoice is a one-line bill for rented equipment and the work around it.
//! Generating one runs a fixed pipeline:
//!
//! 1. validate the request (client, job, equipment, description, a non-zero
//!    price and an invoice date are required)
//! 2. number it `INV-{unix millis}`
//! 3. lay out the [`InvoiceDocument`] and hand it to an [`InvoiceRenderer`]
//! 4. store the rendered PDF at `invoices/{userId}/{invoiceNumber}.pdf`
//! 5. record the [`Invoice`]
//!
//! Any failing step aborts the pipeline and nothing is retried. Invoices are
//! immutable once recorded.
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_billing::{InvoiceService, InvoiceRequest};
//!
//! let generated = service.generate(user_id, request).await?;
//! response.body(generated.document.bytes);
//! ```

pub mod invoice;
pub mod document;
pub mod renderer;
pub mod store;
pub mod ports;
pub mod service;
pub mod adapters;
pub mod error;

pub use invoice::{document_path, Invoice, InvoiceNumber, InvoiceRequest, InvoiceStatus};
pub use document::InvoiceDocument;
pub use renderer::{InvoiceRenderer, RenderedDocument, PDF_CONTENT_TYPE};
pub use store::{DocumentStore, StoredDocument};
pub use ports::InvoicePort;
pub use service::{GeneratedInvoice, InvoiceService};
pub use adapters::{LocalFsDocumentStore, PrintServiceConfig, PrintServiceRenderer};
pub use error::{BillingError, RenderError};

#[cfg(any(test, feature = "mock"))]
pub use ports::mock::MockInvoicePort;
#[cfg(any(test, feature = "mock"))]
pub use renderer::mock::MockRenderer;
#[cfg(any(test, feature = "mock"))]
pub use store::mock::MockDocumentStore;
