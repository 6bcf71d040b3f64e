//! Invoice rendering port

use async_trait::async_trait;
use serde::Serialize;

use core_kernel::{DomainPort, HealthCheckable};

use crate::document::InvoiceDocument;
use crate::error::RenderError;

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Bytes produced by a renderer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedDocument {
    #[serde(skip)]
    pub bytes: Vec<u8>,
    pub content_type: String,
}

impl RenderedDocument {
    pub fn pdf(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            content_type: PDF_CONTENT_TYPE.to_string(),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Turns an invoice document into a printable file
#[async_trait]
pub trait InvoiceRenderer: DomainPort + HealthCheckable {
    async fn render(&self, document: &InvoiceDocument) -> Result<RenderedDocument, RenderError>;
}

/// Mock implementation of InvoiceRenderer for testing
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    use core_kernel::HealthCheckResult;

    /// Wraps the document HTML in a fake PDF header
    #[derive(Debug, Default, Clone)]
    pub struct MockRenderer {
        failure: Arc<RwLock<Option<(u16, String)>>>,
        rendered: Arc<RwLock<Vec<InvoiceDocument>>>,
    }

    impl MockRenderer {
        pub fn new() -> Self {
            Self::default()
        }

        /// Makes every later render fail with a service error
        pub async fn fail_with(&self, status: u16, message: impl Into<String>) {
            *self.failure.write().await = Some((status, message.into()));
        }

        pub async fn rendered(&self) -> Vec<InvoiceDocument> {
            self.rendered.read().await.clone()
        }
    }

    impl DomainPort for MockRenderer {}

    #[async_trait]
    impl HealthCheckable for MockRenderer {
        async fn health_check(&self) -> HealthCheckResult {
            HealthCheckResult::healthy("mock-invoice-renderer")
        }
    }

    #[async_trait]
    impl InvoiceRenderer for MockRenderer {
        async fn render(&self, document: &InvoiceDocument) -> Result<RenderedDocument, RenderError> {
            if let Some((status, message)) = self.failure.read().await.clone() {
                return Err(RenderError::Service { status, message });
            }
            let html = document.to_html()?;
            self.rendered.write().await.push(document.clone());

            let mut bytes = b"%PDF-1.4\n".to_vec();
            bytes.extend_from_slice(html.as_bytes());
            Ok(RenderedDocument::pdf(bytes))
        }
    }
}
