//! Driver log repository implementation

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use core_kernel::{ActionId, ContactId, DriverLogId, JobId, TimeUnit, UserId};
use domain_fieldlog::{DriverLog, LogDuration, LogQuery};

use crate::error::DatabaseError;
use crate::repositories::types::{money, DbBillingUnit};

const LOG_COLUMNS: &str = r#"
    id, driver_id, contact_id, contact_name, action_id, action_name, job_id, job_name,
    unit, quantity, description, total_price, currency, signature, start_time, end_time,
    duration_value, duration_unit, created_at, updated_at
"#;

/// Repository for driver logs
#[derive(Debug, Clone)]
pub struct DriverLogRepository {
    pool: PgPool,
}

impl DriverLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, id: DriverLogId) -> Result<DriverLog, DatabaseError> {
        let row = sqlx::query_as::<_, DriverLogRow>(&format!(
            "SELECT {} FROM driver_logs WHERE id = $1",
            LOG_COLUMNS
        ))
        .bind(*id.as_uuid())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::not_found("DriverLog", id))?;
        row.try_into()
    }

    /// Logs matching `query`, newest first
    pub async fn list(&self, query: &LogQuery) -> Result<Vec<DriverLog>, DatabaseError> {
        let rows = sqlx::query_as::<_, DriverLogRow>(&format!(
            r#"
            SELECT {}
            FROM driver_logs
            WHERE ($1::uuid IS NULL OR driver_id = $1)
              AND ($2::timestamptz IS NULL OR created_at >= $2)
              AND ($3::timestamptz IS NULL OR created_at <= $3)
            ORDER BY created_at DESC, id
            "#,
            LOG_COLUMNS
        ))
        .bind(query.driver_id.map(Uuid::from))
        .bind(query.created_from)
        .bind(query.created_to)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(DriverLog::try_from).collect()
    }

    pub async fn insert(&self, log: &DriverLog) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO driver_logs (
                id, driver_id, contact_id, contact_name, action_id, action_name, job_id, job_name,
                unit, quantity, description, total_price, currency, signature, start_time, end_time,
                duration_value, duration_unit, created_at, updated_at
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                $11, $12, $13, $14, $15, $16, $17, $18, $19, $20
            )
            "#,
        )
        .bind(*log.id.as_uuid())
        .bind(*log.driver_id.as_uuid())
        .bind(*log.contact_id.as_uuid())
        .bind(&log.contact_name)
        .bind(*log.action_id.as_uuid())
        .bind(&log.action_name)
        .bind(*log.job_id.as_uuid())
        .bind(&log.job_name)
        .bind(DbBillingUnit::from(log.unit))
        .bind(log.quantity)
        .bind(&log.description)
        .bind(log.total_price.amount())
        .bind(log.total_price.currency().code())
        .bind(&log.signature)
        .bind(log.start_time)
        .bind(log.end_time)
        .bind(log.duration.map(|d| d.value))
        .bind(log.duration.map(|d| d.unit.to_string()))
        .bind(log.created_at)
        .bind(log.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn update(&self, log: &DriverLog) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            r#"
            UPDATE driver_logs SET
                contact_id = $2,
                contact_name = $3,
                action_id = $4,
                action_name = $5,
                job_id = $6,
                job_name = $7,
                unit = $8,
                quantity = $9,
                description = $10,
                total_price = $11,
                currency = $12,
                signature = $13,
                start_time = $14,
                end_time = $15,
                duration_value = $16,
                duration_unit = $17,
                updated_at = $18
            WHERE id = $1
            "#,
        )
        .bind(*log.id.as_uuid())
        .bind(*log.contact_id.as_uuid())
        .bind(&log.contact_name)
        .bind(*log.action_id.as_uuid())
        .bind(&log.action_name)
        .bind(*log.job_id.as_uuid())
        .bind(&log.job_name)
        .bind(DbBillingUnit::from(log.unit))
        .bind(log.quantity)
        .bind(&log.description)
        .bind(log.total_price.amount())
        .bind(log.total_price.currency().code())
        .bind(&log.signature)
        .bind(log.start_time)
        .bind(log.end_time)
        .bind(log.duration.map(|d| d.value))
        .bind(log.duration.map(|d| d.unit.to_string()))
        .bind(log.updated_at)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("DriverLog", log.id));
        }
        Ok(())
    }
}

// ============================================================================
// Row types
// ============================================================================

#[derive(Debug, Clone, FromRow)]
pub struct DriverLogRow {
    pub id: Uuid,
    pub driver_id: Uuid,
    pub contact_id: Uuid,
    pub contact_name: String,
    pub action_id: Uuid,
    pub action_name: String,
    pub job_id: Uuid,
    pub job_name: String,
    pub unit: DbBillingUnit,
    pub quantity: Option<Decimal>,
    pub description: String,
    pub total_price: Decimal,
    pub currency: String,
    pub signature: String,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub duration_value: Option<Decimal>,
    pub duration_unit: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn time_unit(raw: &str) -> Result<TimeUnit, DatabaseError> {
    match raw {
        "hours" => Ok(TimeUnit::Hours),
        "days" => Ok(TimeUnit::Days),
        other => Err(DatabaseError::decode("duration_unit", other)),
    }
}

impl TryFrom<DriverLogRow> for DriverLog {
    type Error = DatabaseError;

    fn try_from(row: DriverLogRow) -> Result<Self, Self::Error> {
        let duration = match (row.duration_value, row.duration_unit.as_deref()) {
            (Some(value), Some(unit)) => Some(LogDuration {
                value,
                unit: time_unit(unit)?,
            }),
            _ => None,
        };

        Ok(DriverLog {
            id: DriverLogId::from(row.id),
            driver_id: UserId::from(row.driver_id),
            contact_id: ContactId::from(row.contact_id),
            contact_name: row.contact_name,
            action_id: ActionId::from(row.action_id),
            action_name: row.action_name,
            job_id: JobId::from(row.job_id),
            job_name: row.job_name,
            unit: row.unit.into(),
            quantity: row.quantity,
            description: row.description,
            total_price: money(row.total_price, &row.currency)?,
            signature: row.signature,
            start_time: row.start_time,
            end_time: row.end_time,
            duration,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_catalog::BillingUnit;
    use rust_decimal_macros::dec;

    fn row() -> DriverLogRow {
        let now = Utc::now();
        DriverLogRow {
            id: Uuid::new_v4(),
            driver_id: Uuid::new_v4(),
            contact_id: Uuid::new_v4(),
            contact_name: "Greenway".into(),
            action_id: Uuid::new_v4(),
            action_name: "Hauling".into(),
            job_id: Uuid::new_v4(),
            job_name: "Driver".into(),
            unit: DbBillingUnit::Hour,
            quantity: None,
            description: "Run".into(),
            total_price: dec!(97.5),
            currency: "USD".into(),
            signature: "sig".into(),
            start_time: Some(now),
            end_time: Some(now),
            duration_value: Some(dec!(1.5)),
            duration_unit: Some("hours".into()),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_row_to_log() {
        let log = DriverLog::try_from(row()).unwrap();
        assert_eq!(log.unit, BillingUnit::Hour);
        assert_eq!(log.duration.map(|d| d.unit), Some(TimeUnit::Hours));
        assert_eq!(log.total_price.amount(), dec!(97.50));
    }

    #[test]
    fn test_unknown_duration_unit_rejected() {
        let mut bad = row();
        bad.duration_unit = Some("weeks".into());
        assert!(matches!(
            DriverLog::try_from(bad),
            Err(DatabaseError::Decode { column: "duration_unit", .. })
        ));
    }
}
