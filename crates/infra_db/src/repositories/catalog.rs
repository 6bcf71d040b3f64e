//! Catalog repository implementation
//!
//! Equipment, jobs, actions and contacts. Writes are upserts keyed by id.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use core_kernel::{ActionId, ContactId, EquipmentId, JobId};
use domain_catalog::{Action, ActionPrices, Contact, Equipment, EquipmentPrices, Job, JobFilter, JobRoles};

use crate::error::DatabaseError;
use crate::repositories::types::DbBillingUnit;

/// Repository for the catalog collections
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    pool: PgPool,
}

impl CatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ------------------------------------------------------------------
    // Equipment
    // ------------------------------------------------------------------

    pub async fn get_equipment(&self, id: EquipmentId) -> Result<Equipment, DatabaseError> {
        sqlx::query_as::<_, EquipmentRow>(
            r#"
            SELECT id, name, description, images, total_cost, daily_rate, weekly_rate,
                   monthly_rate, created_at, updated_at
            FROM equipment
            WHERE id = $1
            "#,
        )
        .bind(*id.as_uuid())
        .fetch_optional(&self.pool)
        .await?
        .map(Equipment::from)
        .ok_or_else(|| DatabaseError::not_found("Equipment", id))
    }

    pub async fn list_equipment(&self) -> Result<Vec<Equipment>, DatabaseError> {
        let rows = sqlx::query_as::<_, EquipmentRow>(
            r#"
            SELECT id, name, description, images, total_cost, daily_rate, weekly_rate,
                   monthly_rate, created_at, updated_at
            FROM equipment
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Equipment::from).collect())
    }

    pub async fn upsert_equipment(&self, equipment: &Equipment) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO equipment (
                id, name, description, images, total_cost, daily_rate, weekly_rate,
                monthly_rate, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                description = EXCLUDED.description,
                images = EXCLUDED.images,
                total_cost = EXCLUDED.total_cost,
                daily_rate = EXCLUDED.daily_rate,
                weekly_rate = EXCLUDED.weekly_rate,
                monthly_rate = EXCLUDED.monthly_rate,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(*equipment.id.as_uuid())
        .bind(&equipment.name)
        .bind(&equipment.description)
        .bind(&equipment.images)
        .bind(equipment.prices.total_cost)
        .bind(equipment.prices.daily)
        .bind(equipment.prices.weekly)
        .bind(equipment.prices.monthly)
        .bind(equipment.created_at)
        .bind(equipment.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn delete_equipment(&self, id: EquipmentId) -> Result<(), DatabaseError> {
        self.delete_by_id("equipment", "Equipment", *id.as_uuid()).await
    }

    // ------------------------------------------------------------------
    // Jobs
    // ------------------------------------------------------------------

    pub async fn get_job(&self, id: JobId) -> Result<Job, DatabaseError> {
        sqlx::query_as::<_, JobRow>(
            r#"
            SELECT id, name, description, is_driver, is_equipment_man, created_at, updated_at
            FROM jobs
            WHERE id = $1
            "#,
        )
        .bind(*id.as_uuid())
        .fetch_optional(&self.pool)
        .await?
        .map(Job::from)
        .ok_or_else(|| DatabaseError::not_found("Job", id))
    }

    pub async fn list_jobs(&self, filter: JobFilter) -> Result<Vec<Job>, DatabaseError> {
        let rows = sqlx::query_as::<_, JobRow>(
            r#"
            SELECT id, name, description, is_driver, is_equipment_man, created_at, updated_at
            FROM jobs
            WHERE ($1 = FALSE OR is_equipment_man)
              AND ($2 = FALSE OR is_driver)
            ORDER BY name
            "#,
        )
        .bind(filter.equipment_man_only)
        .bind(filter.driver_only)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Job::from).collect())
    }

    pub async fn upsert_job(&self, job: &Job) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO jobs (id, name, description, is_driver, is_equipment_man, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                description = EXCLUDED.description,
                is_driver = EXCLUDED.is_driver,
                is_equipment_man = EXCLUDED.is_equipment_man,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(*job.id.as_uuid())
        .bind(&job.name)
        .bind(&job.description)
        .bind(job.roles.is_driver)
        .bind(job.roles.is_equipment_man)
        .bind(job.created_at)
        .bind(job.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn delete_job(&self, id: JobId) -> Result<(), DatabaseError> {
        self.delete_by_id("jobs", "Job", *id.as_uuid()).await
    }

    // ------------------------------------------------------------------
    // Actions
    // ------------------------------------------------------------------

    pub async fn get_action(&self, id: ActionId) -> Result<Action, DatabaseError> {
        sqlx::query_as::<_, ActionRow>(
            r#"
            SELECT id, name, description, unit, prices, is_driver, is_equipment_man,
                   created_at, updated_at
            FROM actions
            WHERE id = $1
            "#,
        )
        .bind(*id.as_uuid())
        .fetch_optional(&self.pool)
        .await?
        .map(Action::from)
        .ok_or_else(|| DatabaseError::not_found("Action", id))
    }

    pub async fn list_actions(&self) -> Result<Vec<Action>, DatabaseError> {
        let rows = sqlx::query_as::<_, ActionRow>(
            r#"
            SELECT id, name, description, unit, prices, is_driver, is_equipment_man,
                   created_at, updated_at
            FROM actions
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Action::from).collect())
    }

    pub async fn upsert_action(&self, action: &Action) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO actions (
                id, name, description, unit, prices, is_driver, is_equipment_man,
                created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                description = EXCLUDED.description,
                unit = EXCLUDED.unit,
                prices = EXCLUDED.prices,
                is_driver = EXCLUDED.is_driver,
                is_equipment_man = EXCLUDED.is_equipment_man,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(*action.id.as_uuid())
        .bind(&action.name)
        .bind(&action.description)
        .bind(action.unit.map(DbBillingUnit::from))
        .bind(Json(&action.prices))
        .bind(action.roles.is_driver)
        .bind(action.roles.is_equipment_man)
        .bind(action.created_at)
        .bind(action.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn delete_action(&self, id: ActionId) -> Result<(), DatabaseError> {
        self.delete_by_id("actions", "Action", *id.as_uuid()).await
    }

    // ------------------------------------------------------------------
    // Contacts
    // ------------------------------------------------------------------

    pub async fn get_contact(&self, id: ContactId) -> Result<Contact, DatabaseError> {
        sqlx::query_as::<_, ContactRow>(
            r#"
            SELECT id, name, email, phone, address, notes, created_at, updated_at
            FROM contacts
            WHERE id = $1
            "#,
        )
        .bind(*id.as_uuid())
        .fetch_optional(&self.pool)
        .await?
        .map(Contact::from)
        .ok_or_else(|| DatabaseError::not_found("Contact", id))
    }

    pub async fn list_contacts(&self) -> Result<Vec<Contact>, DatabaseError> {
        let rows = sqlx::query_as::<_, ContactRow>(
            r#"
            SELECT id, name, email, phone, address, notes, created_at, updated_at
            FROM contacts
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Contact::from).collect())
    }

    pub async fn upsert_contact(&self, contact: &Contact) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO contacts (id, name, email, phone, address, notes, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                email = EXCLUDED.email,
                phone = EXCLUDED.phone,
                address = EXCLUDED.address,
                notes = EXCLUDED.notes,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(*contact.id.as_uuid())
        .bind(&contact.name)
        .bind(&contact.email)
        .bind(&contact.phone)
        .bind(&contact.address)
        .bind(&contact.notes)
        .bind(contact.created_at)
        .bind(contact.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn delete_contact(&self, id: ContactId) -> Result<(), DatabaseError> {
        self.delete_by_id("contacts", "Contact", *id.as_uuid()).await
    }

    /// `table` is always one of the fixed catalog table names
    async fn delete_by_id(&self, table: &'static str, entity: &'static str, id: Uuid) -> Result<(), DatabaseError> {
        let result = sqlx::query(&format!("DELETE FROM {} WHERE id = $1", table))
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found(entity, id));
        }
        Ok(())
    }
}

// ============================================================================
// Row types
// ============================================================================

#[derive(Debug, Clone, FromRow)]
pub struct EquipmentRow {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub images: Vec<String>,
    pub total_cost: Option<Decimal>,
    pub daily_rate: Decimal,
    pub weekly_rate: Decimal,
    pub monthly_rate: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<EquipmentRow> for Equipment {
    fn from(row: EquipmentRow) -> Self {
        Equipment {
            id: EquipmentId::from(row.id),
            name: row.name,
            description: row.description,
            images: row.images,
            prices: EquipmentPrices {
                total_cost: row.total_cost,
                daily: row.daily_rate,
                weekly: row.weekly_rate,
                monthly: row.monthly_rate,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct JobRow {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub is_driver: bool,
    pub is_equipment_man: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<JobRow> for Job {
    fn from(row: JobRow) -> Self {
        Job {
            id: JobId::from(row.id),
            name: row.name,
            description: row.description,
            roles: JobRoles {
                is_driver: row.is_driver,
                is_equipment_man: row.is_equipment_man,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct ActionRow {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub unit: Option<DbBillingUnit>,
    pub prices: Json<ActionPrices>,
    pub is_driver: bool,
    pub is_equipment_man: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ActionRow> for Action {
    fn from(row: ActionRow) -> Self {
        Action {
            id: ActionId::from(row.id),
            name: row.name,
            description: row.description,
            unit: row.unit.map(Into::into),
            prices: row.prices.0,
            roles: JobRoles {
                is_driver: row.is_driver,
                is_equipment_man: row.is_equipment_man,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct ContactRow {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ContactRow> for Contact {
    fn from(row: ContactRow) -> Self {
        Contact {
            id: ContactId::from(row.id),
            name: row.name,
            email: row.email,
            phone: row.phone,
            address: row.address,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
