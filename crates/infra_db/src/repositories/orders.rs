//! Order repository implementation
//!
//! Order writes that depend on the stored row (status changes, repricing)
//! go through [`OrderRepository::update_locked`], which holds a row lock
//! for the whole read-modify-write.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use uuid::Uuid;

use core_kernel::{EquipmentId, JobId, OrderId, PortError, UserId};
use domain_rental::{Order, OrderMutation, OrderQuery};

use crate::error::DatabaseError;
use crate::repositories::types::{money, DbOrderStatus};

const ORDER_COLUMNS: &str = r#"
    id, user_id, equipment_id, equipment_name, job_id, job_name, client_name,
    description, price, currency, start_date, approximate_end_date, status,
    pending_date, completed_date, created_at, updated_at
"#;

/// Failure of a locked update: either the store or the mutation refused it
#[derive(Debug)]
pub enum LockedUpdateError {
    Database(DatabaseError),
    Rejected(PortError),
}

impl From<DatabaseError> for LockedUpdateError {
    fn from(error: DatabaseError) -> Self {
        LockedUpdateError::Database(error)
    }
}

impl From<sqlx::Error> for LockedUpdateError {
    fn from(error: sqlx::Error) -> Self {
        LockedUpdateError::Database(error.into())
    }
}

/// Repository for rental orders
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: PgPool,
}

impl OrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, id: OrderId) -> Result<Order, DatabaseError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {} FROM orders WHERE id = $1",
            ORDER_COLUMNS
        ))
        .bind(*id.as_uuid())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::not_found("Order", id))?;
        row.try_into()
    }

    /// Orders matching `query`, newest start date first
    pub async fn list(&self, query: &OrderQuery) -> Result<Vec<Order>, DatabaseError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            r#"
            SELECT {}
            FROM orders
            WHERE ($1::uuid IS NULL OR user_id = $1)
              AND ($2::order_status IS NULL OR status = $2)
              AND ($3::timestamptz IS NULL OR start_date >= $3)
              AND ($4::timestamptz IS NULL OR start_date <= $4)
            ORDER BY start_date DESC, id
            LIMIT $5 OFFSET $6
            "#,
            ORDER_COLUMNS
        ))
        .bind(query.user_id.map(Uuid::from))
        .bind(query.status.map(DbOrderStatus::from))
        .bind(query.start_from)
        .bind(query.start_to)
        .bind(query.limit.map(i64::from))
        .bind(i64::from(query.offset.unwrap_or(0)))
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Order::try_from).collect()
    }

    pub async fn insert(&self, order: &Order) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO orders (
                id, user_id, equipment_id, equipment_name, job_id, job_name, client_name,
                description, price, currency, start_date, approximate_end_date, status,
                pending_date, completed_date, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            "#,
        )
        .bind(*order.id.as_uuid())
        .bind(*order.user_id.as_uuid())
        .bind(*order.equipment_id.as_uuid())
        .bind(&order.equipment_name)
        .bind(*order.job_id.as_uuid())
        .bind(&order.job_name)
        .bind(&order.client_name)
        .bind(&order.description)
        .bind(order.price.amount())
        .bind(order.price.currency().code())
        .bind(order.start_date)
        .bind(order.approximate_end_date)
        .bind(DbOrderStatus::from(order.status))
        .bind(order.pending_date)
        .bind(order.completed_date)
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Locks the order row, applies `mutation` and writes the result back
    ///
    /// The transaction rolls back when the mutation fails, leaving the stored
    /// order untouched.
    pub async fn update_locked(&self, id: OrderId, mutation: OrderMutation) -> Result<Order, LockedUpdateError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {} FROM orders WHERE id = $1 FOR UPDATE",
            ORDER_COLUMNS
        ))
        .bind(*id.as_uuid())
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| DatabaseError::not_found("Order", id))?;

        let mut order = Order::try_from(row)?;
        mutation(&mut order).map_err(LockedUpdateError::Rejected)?;

        Self::write_back(&mut tx, &order).await?;
        tx.commit().await?;
        Ok(order)
    }

    async fn write_back(tx: &mut Transaction<'_, Postgres>, order: &Order) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            UPDATE orders SET
                equipment_id = $2,
                equipment_name = $3,
                job_id = $4,
                job_name = $5,
                client_name = $6,
                description = $7,
                price = $8,
                currency = $9,
                start_date = $10,
                approximate_end_date = $11,
                status = $12,
                pending_date = $13,
                completed_date = $14,
                updated_at = $15
            WHERE id = $1
            "#,
        )
        .bind(*order.id.as_uuid())
        .bind(*order.equipment_id.as_uuid())
        .bind(&order.equipment_name)
        .bind(*order.job_id.as_uuid())
        .bind(&order.job_name)
        .bind(&order.client_name)
        .bind(&order.description)
        .bind(order.price.amount())
        .bind(order.price.currency().code())
        .bind(order.start_date)
        .bind(order.approximate_end_date)
        .bind(DbOrderStatus::from(order.status))
        .bind(order.pending_date)
        .bind(order.completed_date)
        .bind(order.updated_at)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    pub async fn delete(&self, id: OrderId) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(*id.as_uuid())
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Order", id));
        }
        Ok(())
    }
}

// ============================================================================
// Row types
// ============================================================================

#[derive(Debug, Clone, FromRow)]
pub struct OrderRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub equipment_id: Uuid,
    pub equipment_name: String,
    pub job_id: Uuid,
    pub job_name: String,
    pub client_name: String,
    pub description: String,
    pub price: Decimal,
    pub currency: String,
    pub start_date: DateTime<Utc>,
    pub approximate_end_date: Option<DateTime<Utc>>,
    pub status: DbOrderStatus,
    pub pending_date: Option<DateTime<Utc>>,
    pub completed_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = DatabaseError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        Ok(Order {
            id: OrderId::from(row.id),
            user_id: UserId::from(row.user_id),
            equipment_id: EquipmentId::from(row.equipment_id),
            equipment_name: row.equipment_name,
            job_id: JobId::from(row.job_id),
            job_name: row.job_name,
            client_name: row.client_name,
            description: row.description,
            price: money(row.price, &row.currency)?,
            start_date: row.start_date,
            approximate_end_date: row.approximate_end_date,
            status: row.status.into(),
            pending_date: row.pending_date,
            completed_date: row.completed_date,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
