//! Integration tests for domain_billing adapters and the invoice pipeline

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::Router;
use chrono::NaiveDate;
use rust_decimal_macros::dec;
use tokio::sync::RwLock;

use core_kernel::{Currency, DomainPort, HealthCheckResult, HealthCheckable, PortError, UserId};
use domain_billing::{
    BillingError, DocumentStore, Invoice, InvoiceDocument, InvoiceNumber, InvoicePort,
    InvoiceRenderer, InvoiceRequest, InvoiceService, LocalFsDocumentStore, PrintServiceConfig,
    PrintServiceRenderer, RenderError,
};

// ============================================================================
// Helpers
// ============================================================================

/// Starts a fake print service and returns its base URL
async fn print_service() -> String {
    let app = Router::new()
        .route(
            "/pdf",
            post(|body: String| async move {
                let mut pdf = b"%PDF-1.7\n".to_vec();
                pdf.extend_from_slice(body.as_bytes());
                ([(header::CONTENT_TYPE, "application/pdf")], pdf)
            }),
        )
        .route(
            "/broken",
            post(|| async { (StatusCode::BAD_GATEWAY, "chromium exited").into_response() }),
        )
        .route(
            "/html",
            post(|| async { ([(header::CONTENT_TYPE, "text/html")], "<p>oops</p>").into_response() }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn renderer(base: &str, route: &str) -> PrintServiceRenderer {
    PrintServiceRenderer::new(
        PrintServiceConfig::new(format!("{}{}", base, route)).with_timeout(Duration::from_secs(5)),
    )
    .unwrap()
}

fn scratch_dir() -> PathBuf {
    std::env::temp_dir().join(format!("billing-tests-{}", uuid::Uuid::new_v4()))
}

fn request() -> InvoiceRequest {
    InvoiceRequest {
        client_name: "Maple Street Co-op".to_string(),
        job_name: "Equipment operator".to_string(),
        equipment_name: "Wheel loader".to_string(),
        description: "Snow removal, lot B".to_string(),
        price: Some(dec!(1980)),
        invoice_date: NaiveDate::from_ymd_opt(2024, 12, 20),
        notes: Some("Paid by check".to_string()),
        ..Default::default()
    }
}

fn document() -> InvoiceDocument {
    let invoice = Invoice::issue(UserId::new(), request(), Currency::USD, chrono::Utc::now()).unwrap();
    InvoiceDocument::from_invoice(&invoice)
}

#[derive(Default)]
struct MemoryInvoices {
    invoices: RwLock<HashMap<InvoiceNumber, Invoice>>,
}

impl DomainPort for MemoryInvoices {}

#[async_trait]
impl HealthCheckable for MemoryInvoices {
    async fn health_check(&self) -> HealthCheckResult {
        HealthCheckResult::healthy("memory-invoices")
    }
}

#[async_trait]
impl InvoicePort for MemoryInvoices {
    async fn save_invoice(&self, invoice: Invoice) -> Result<Invoice, PortError> {
        self.invoices
            .write()
            .await
            .insert(invoice.invoice_number.clone(), invoice.clone());
        Ok(invoice)
    }

    async fn get_invoice(&self, number: &InvoiceNumber) -> Result<Invoice, PortError> {
        self.invoices
            .read()
            .await
            .get(number)
            .cloned()
            .ok_or_else(|| PortError::not_found("Invoice", number))
    }

    async fn list_invoices(&self, user_id: UserId) -> Result<Vec<Invoice>, PortError> {
        Ok(self
            .invoices
            .read()
            .await
            .values()
            .filter(|i| i.user_id == user_id)
            .cloned()
            .collect())
    }
}

// ============================================================================
// Print service renderer
// ============================================================================

mod print_service_tests {
    use super::*;

    #[tokio::test]
    async fn test_renders_pdf() {
        let base = print_service().await;
        let rendered = renderer(&base, "/pdf").render(&document()).await.unwrap();

        assert_eq!(rendered.content_type, "application/pdf");
        assert!(rendered.bytes.starts_with(b"%PDF"));
        let body = String::from_utf8_lossy(&rendered.bytes);
        assert!(body.contains("Maple Street Co-op"));
        assert!(body.contains("Paid by check"));
    }

    #[tokio::test]
    async fn test_error_status_maps_to_service_error() {
        let base = print_service().await;
        let err = renderer(&base, "/broken").render(&document()).await.unwrap_err();

        match err {
            RenderError::Service { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, "chromium exited");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_non_pdf_response_rejected() {
        let base = print_service().await;
        let err = renderer(&base, "/html").render(&document()).await.unwrap_err();
        assert!(matches!(err, RenderError::UnexpectedContentType(ref ct) if ct.starts_with("text/html")));
    }
}

// ============================================================================
// Filesystem store
// ============================================================================

mod local_fs_tests {
    use super::*;

    #[tokio::test]
    async fn test_put_get_delete() {
        let root = scratch_dir();
        let store = LocalFsDocumentStore::new(&root);

        let stored = store
            .put("invoices/u1/INV-1.pdf", b"%PDF-1.4", "application/pdf")
            .await
            .unwrap();
        assert_eq!(stored.size, 8);
        assert!(root.join("invoices").join("u1").join("INV-1.pdf").exists());
        assert_eq!(store.get("invoices/u1/INV-1.pdf").await.unwrap(), b"%PDF-1.4");

        store.delete("invoices/u1/INV-1.pdf").await.unwrap();
        let err = store.get("invoices/u1/INV-1.pdf").await.unwrap_err();
        assert!(err.is_not_found());

        tokio::fs::remove_dir_all(&root).await.unwrap();
    }

    #[tokio::test]
    async fn test_existing_document_is_not_replaced() {
        let root = scratch_dir();
        let store = LocalFsDocumentStore::new(&root);
        store
            .put("invoices/u1/INV-7.pdf", b"%PDF-first", "application/pdf")
            .await
            .unwrap();

        let err = store
            .put("invoices/u1/INV-7.pdf", b"%PDF-second", "application/pdf")
            .await
            .unwrap_err();

        assert!(matches!(err, PortError::Conflict { .. }));
        assert_eq!(store.get("invoices/u1/INV-7.pdf").await.unwrap(), b"%PDF-first");
        assert!(!root.join("invoices").join("u1").join("INV-7.partial").exists());

        tokio::fs::remove_dir_all(&root).await.unwrap();
    }

    #[tokio::test]
    async fn test_rejects_escaping_paths() {
        let store = LocalFsDocumentStore::new(scratch_dir());
        let err = store.put("../outside.pdf", b"x", "application/pdf").await.unwrap_err();
        assert!(err.is_validation());
    }
}

// ============================================================================
// Invoice pipeline
// ============================================================================

mod pipeline_tests {
    use super::*;

    #[tokio::test]
    async fn test_generate_through_print_service_and_disk() {
        let base = print_service().await;
        let root = scratch_dir();
        let service = InvoiceService::new(
            Arc::new(MemoryInvoices::default()),
            Arc::new(renderer(&base, "/pdf")),
            Arc::new(LocalFsDocumentStore::new(&root)),
            Currency::USD,
        );
        let user = UserId::new();

        let generated = service.generate(user, request()).await.unwrap();

        assert!(generated.invoice.invoice_number.as_str().starts_with("INV-"));
        assert_eq!(generated.invoice.price.amount(), dec!(1980.00));
        let on_disk = tokio::fs::read(root.join(
            generated.invoice.pdf_path.replace('/', std::path::MAIN_SEPARATOR_STR),
        ))
        .await
        .unwrap();
        assert_eq!(on_disk, generated.document.bytes);

        let downloaded = service.download(&generated.invoice.invoice_number).await.unwrap();
        assert_eq!(downloaded.document.bytes, generated.document.bytes);

        tokio::fs::remove_dir_all(&root).await.unwrap();
    }

    #[tokio::test]
    async fn test_print_failure_surfaces_prefixed_error() {
        let base = print_service().await;
        let root = scratch_dir();
        let invoices = Arc::new(MemoryInvoices::default());
        let service = InvoiceService::new(
            invoices.clone(),
            Arc::new(renderer(&base, "/broken")),
            Arc::new(LocalFsDocumentStore::new(&root)),
            Currency::USD,
        );
        let user = UserId::new();

        let err = service.generate(user, request()).await.unwrap_err();

        assert!(matches!(err, BillingError::Render(_)));
        assert!(err.to_string().starts_with("Failed to generate invoice"));
        assert!(invoices.list_invoices(user).await.unwrap().is_empty());
        assert!(!root.exists());
    }
}

// ============================================================================
// Property tests
// ============================================================================

mod property_tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use domain_billing::document_path;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn generated_numbers_parse_and_name_the_pdf(millis in 0i64..4_102_444_800_000) {
            let at = Utc.timestamp_millis_opt(millis).unwrap();
            let number = InvoiceNumber::generate(at);
            prop_assert_eq!(InvoiceNumber::parse(number.as_str()).unwrap(), number.clone());

            let user = UserId::new();
            let path = document_path(user, &number);
            prop_assert_eq!(path, format!("invoices/{}/INV-{}.pdf", user.as_uuid(), millis));
        }

        #[test]
        fn any_non_zero_price_is_accepted(cents in 1i64..100_000_000) {
            let mut req = request();
            req.price = Some(rust_decimal::Decimal::new(cents, 2));
            prop_assert!(req.validate().is_ok());
        }
    }
}
