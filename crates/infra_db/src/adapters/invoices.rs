//! PostgreSQL Invoice Adapter

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use core_kernel::{DomainPort, HealthCheckResult, HealthCheckable, PortError, UserId};
use domain_billing::{Invoice, InvoiceNumber, InvoicePort};

use crate::repositories::InvoiceRepository;

/// PostgreSQL-backed implementation of the InvoicePort trait
#[derive(Debug, Clone)]
pub struct PostgresInvoiceAdapter {
    repository: InvoiceRepository,
    pool: PgPool,
}

impl PostgresInvoiceAdapter {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: InvoiceRepository::new(pool.clone()),
            pool,
        }
    }
}

impl DomainPort for PostgresInvoiceAdapter {}

#[async_trait]
impl HealthCheckable for PostgresInvoiceAdapter {
    async fn health_check(&self) -> HealthCheckResult {
        super::ping(&self.pool, "postgres-invoice-adapter").await
    }
}

#[async_trait]
impl InvoicePort for PostgresInvoiceAdapter {
    #[instrument(skip(self, invoice), fields(invoice_number = %invoice.invoice_number))]
    async fn save_invoice(&self, invoice: Invoice) -> Result<Invoice, PortError> {
        self.repository.insert(&invoice).await?;
        Ok(invoice)
    }

    #[instrument(skip(self))]
    async fn get_invoice(&self, number: &InvoiceNumber) -> Result<Invoice, PortError> {
        Ok(self.repository.get(number).await?)
    }

    #[instrument(skip(self))]
    async fn list_invoices(&self, user_id: UserId) -> Result<Vec<Invoice>, PortError> {
        Ok(self.repository.list_for_user(user_id).await?)
    }
}
