//! Invoice repository implementation
//!
//! Invoices are insert-only.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use core_kernel::{EquipmentId, JobId, UserId};
use domain_billing::{Invoice, InvoiceNumber, InvoiceStatus};

use crate::error::DatabaseError;
use crate::repositories::types::money;

const INVOICE_COLUMNS: &str = r#"
    invoice_number, user_id, client_name, job_name, equipment_name, description,
    price, currency, invoice_date, notes, job_id, equipment_id, pdf_path, status, created_at
"#;

#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    pool: PgPool,
}

impl InvoiceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, invoice: &Invoice) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO invoices (
                invoice_number, user_id, client_name, job_name, equipment_name, description,
                price, currency, invoice_date, notes, job_id, equipment_id, pdf_path, status, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            "#,
        )
        .bind(invoice.invoice_number.as_str())
        .bind(*invoice.user_id.as_uuid())
        .bind(&invoice.client_name)
        .bind(&invoice.job_name)
        .bind(&invoice.equipment_name)
        .bind(&invoice.description)
        .bind(invoice.price.amount())
        .bind(invoice.price.currency().code())
        .bind(invoice.invoice_date)
        .bind(&invoice.notes)
        .bind(invoice.job_id.map(Uuid::from))
        .bind(invoice.equipment_id.map(Uuid::from))
        .bind(&invoice.pdf_path)
        .bind(invoice.status.as_str())
        .bind(invoice.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn get(&self, number: &InvoiceNumber) -> Result<Invoice, DatabaseError> {
        let row = sqlx::query_as::<_, InvoiceRow>(&format!(
            "SELECT {} FROM invoices WHERE invoice_number = $1",
            INVOICE_COLUMNS
        ))
        .bind(number.as_str())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::not_found("Invoice", number))?;
        row.try_into()
    }

    /// A user's invoices, newest first
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Invoice>, DatabaseError> {
        let rows = sqlx::query_as::<_, InvoiceRow>(&format!(
            "SELECT {} FROM invoices WHERE user_id = $1 ORDER BY created_at DESC",
            INVOICE_COLUMNS
        ))
        .bind(*user_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Invoice::try_from).collect()
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct InvoiceRow {
    pub invoice_number: String,
    pub user_id: Uuid,
    pub client_name: String,
    pub job_name: String,
    pub equipment_name: String,
    pub description: String,
    pub price: Decimal,
    pub currency: String,
    pub invoice_date: NaiveDate,
    pub notes: Option<String>,
    pub job_id: Option<Uuid>,
    pub equipment_id: Option<Uuid>,
    pub pdf_path: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<InvoiceRow> for Invoice {
    type Error = DatabaseError;

    fn try_from(row: InvoiceRow) -> Result<Self, Self::Error> {
        let invoice_number = InvoiceNumber::parse(&row.invoice_number)
            .map_err(|e| DatabaseError::decode("invoice_number", e))?;
        let status = match row.status.as_str() {
            "generated" => InvoiceStatus::Generated,
            other => return Err(DatabaseError::decode("status", other)),
        };

        Ok(Invoice {
            invoice_number,
            user_id: UserId::from(row.user_id),
            client_name: row.client_name,
            job_name: row.job_name,
            equipment_name: row.equipment_name,
            description: row.description,
            price: money(row.price, &row.currency)?,
            invoice_date: row.invoice_date,
            notes: row.notes,
            job_id: row.job_id.map(JobId::from),
            equipment_id: row.equipment_id.map(EquipmentId::from),
            pdf_path: row.pdf_path,
            status,
            created_at: row.created_at,
        })
    }
}
