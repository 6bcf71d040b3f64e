//! Billing Domain Ports

use async_trait::async_trait;

use core_kernel::{DomainPort, HealthCheckable, PortError, UserId};

use crate::invoice::{Invoice, InvoiceNumber};

/// Port for invoice persistence
#[async_trait]
pub trait InvoicePort: DomainPort + HealthCheckable {
    /// Records a new invoice; `Conflict` if the number is taken
    async fn save_invoice(&self, invoice: Invoice) -> Result<Invoice, PortError>;

    async fn get_invoice(&self, number: &InvoiceNumber) -> Result<Invoice, PortError>;

    /// A user's invoices, newest first
    async fn list_invoices(&self, user_id: UserId) -> Result<Vec<Invoice>, PortError>;
}

/// Mock implementation of InvoicePort for testing
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    use core_kernel::HealthCheckResult;

    #[derive(Debug, Default, Clone)]
    pub struct MockInvoicePort {
        invoices: Arc<RwLock<HashMap<InvoiceNumber, Invoice>>>,
    }

    impl MockInvoicePort {
        pub fn new() -> Self {
            Self::default()
        }
    }

    impl DomainPort for MockInvoicePort {}

    #[async_trait]
    impl HealthCheckable for MockInvoicePort {
        async fn health_check(&self) -> HealthCheckResult {
            HealthCheckResult::healthy("mock-invoice-port")
        }
    }

    #[async_trait]
    impl InvoicePort for MockInvoicePort {
        async fn save_invoice(&self, invoice: Invoice) -> Result<Invoice, PortError> {
            let mut invoices = self.invoices.write().await;
            if invoices.contains_key(&invoice.invoice_number) {
                return Err(PortError::conflict(format!(
                    "Invoice {} already exists",
                    invoice.invoice_number
                )));
            }
            invoices.insert(invoice.invoice_number.clone(), invoice.clone());
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
            let mut results: Vec<Invoice> = self
                .invoices
                .read()
                .await
                .values()
                .filter(|invoice| invoice.user_id == user_id)
                .cloned()
                .collect();
            results.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            Ok(results)
        }
    }
}
