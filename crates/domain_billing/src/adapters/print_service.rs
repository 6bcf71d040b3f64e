//! Print Service Renderer
//!
//! Sends the invoice HTML to a headless-browser print endpoint and expects a
//! PDF back. The exchange is a single POST:
//!
//! - request body: the rendered HTML, `text/html; charset=utf-8`
//! - success: 2xx with `application/pdf`
//! - failure: any other status, reported as `RenderError::Service` with the
//!   response body as message
//!
//! Requests are not retried. The configured timeout bounds the whole call.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use tracing::{debug, instrument, warn};

use core_kernel::{AdapterHealth, DomainPort, HealthCheckResult, HealthCheckable};

use crate::document::InvoiceDocument;
use crate::error::RenderError;
use crate::renderer::{InvoiceRenderer, RenderedDocument, PDF_CONTENT_TYPE};

/// Longest error body kept in a `RenderError::Service` message
const MAX_ERROR_BODY: usize = 512;

#[derive(Debug, Clone)]
pub struct PrintServiceConfig {
    /// Full URL of the print endpoint, e.g. `http://printer:3000/pdf`
    pub endpoint: String,
    pub timeout: Duration,
}

impl PrintServiceConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Renders invoices through an HTTP print service
#[derive(Debug, Clone)]
pub struct PrintServiceRenderer {
    config: PrintServiceConfig,
    client: reqwest::Client,
}

impl PrintServiceRenderer {
    pub fn new(config: PrintServiceConfig) -> Result<Self, RenderError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| RenderError::Transport(e.to_string()))?;
        Ok(Self { config, client })
    }

    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    async fn post_html(&self, html: String) -> Result<RenderedDocument, RenderError> {
        let response = self
            .client
            .post(&self.config.endpoint)
            .header(CONTENT_TYPE, "text/html; charset=utf-8")
            .header(ACCEPT, PDF_CONTENT_TYPE)
            .body(html)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let mut message = response.text().await.unwrap_or_default();
            if message.len() > MAX_ERROR_BODY {
                let cut = (0..=MAX_ERROR_BODY)
                    .rev()
                    .find(|i| message.is_char_boundary(*i))
                    .unwrap_or(0);
                message.truncate(cut);
            }
            if message.trim().is_empty() {
                message = status.canonical_reason().unwrap_or("no response body").to_string();
            }
            return Err(RenderError::Service {
                status: status.as_u16(),
                message,
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        if !content_type.starts_with(PDF_CONTENT_TYPE) {
            return Err(RenderError::UnexpectedContentType(content_type));
        }

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(RenderError::EmptyDocument);
        }
        Ok(RenderedDocument::pdf(bytes.to_vec()))
    }
}

impl DomainPort for PrintServiceRenderer {}

#[async_trait]
impl HealthCheckable for PrintServiceRenderer {
    /// Any HTTP answer from the endpoint counts as reachable
    async fn health_check(&self) -> HealthCheckResult {
        let started = Instant::now();
        let outcome = self.client.head(&self.config.endpoint).send().await;
        let mut result = HealthCheckResult::healthy("print-service-renderer");
        result.latency_ms = started.elapsed().as_millis() as u64;
        if let Err(e) = outcome {
            result.status = AdapterHealth::Unhealthy;
            result.message = Some(e.to_string());
        }
        result
    }
}

#[async_trait]
impl InvoiceRenderer for PrintServiceRenderer {
    #[instrument(skip(self, document), fields(invoice = %document.invoice_number, endpoint = %self.config.endpoint))]
    async fn render(&self, document: &InvoiceDocument) -> Result<RenderedDocument, RenderError> {
        let html = document.to_html()?;
        debug!(html_bytes = html.len(), "Posting invoice to print service");

        let rendered = self.post_html(html).await;
        match &rendered {
            Ok(doc) => debug!(pdf_bytes = doc.len(), "Print service returned document"),
            Err(e) => warn!(error = %e, "Print service failed"),
        }
        rendered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timeout() {
        let config = PrintServiceConfig::new("http://localhost:3000/pdf");
        assert_eq!(config.timeout, Duration::from_secs(30));
        let config = config.with_timeout(Duration::from_secs(5));
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_transport_error() {
        let renderer = PrintServiceRenderer::new(
            PrintServiceConfig::new("http://127.0.0.1:9/pdf").with_timeout(Duration::from_secs(2)),
        )
        .unwrap();
        let err = renderer.post_html("<html></html>".to_string()).await.unwrap_err();
        assert!(matches!(err, RenderError::Transport(_)));
    }
}
