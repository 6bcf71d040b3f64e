//! Staff account repository
//!
//! Upserts keyed by id; the unique email index turns a clash into
//! `DatabaseError::DuplicateEntry`.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use core_kernel::UserId;
use domain_catalog::{UserAccount, UserRoles};

use crate::error::DatabaseError;

#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, id: UserId) -> Result<UserAccount, DatabaseError> {
        sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, display_name, is_admin, is_driver, is_equipment_man,
                   created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(*id.as_uuid())
        .fetch_optional(&self.pool)
        .await?
        .map(UserAccount::from)
        .ok_or_else(|| DatabaseError::not_found("User", id))
    }

    pub async fn list(&self) -> Result<Vec<UserAccount>, DatabaseError> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, display_name, is_admin, is_driver, is_equipment_man,
                   created_at, updated_at
            FROM users
            ORDER BY email
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(UserAccount::from).collect())
    }

    pub async fn upsert(&self, user: &UserAccount) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO users (
                id, email, display_name, is_admin, is_driver, is_equipment_man,
                created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (id) DO UPDATE SET
                email = EXCLUDED.email,
                display_name = EXCLUDED.display_name,
                is_admin = EXCLUDED.is_admin,
                is_driver = EXCLUDED.is_driver,
                is_equipment_man = EXCLUDED.is_equipment_man,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(*user.id.as_uuid())
        .bind(&user.email)
        .bind(&user.display_name)
        .bind(user.roles.is_admin)
        .bind(user.roles.is_driver)
        .bind(user.roles.is_equipment_man)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn delete(&self, id: UserId) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(*id.as_uuid())
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("User", id));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub display_name: Option<String>,
    pub is_admin: bool,
    pub is_driver: bool,
    pub is_equipment_man: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserRow> for UserAccount {
    fn from(row: UserRow) -> Self {
        UserAccount {
            id: UserId::from(row.id),
            email: row.email,
            display_name: row.display_name,
            roles: UserRoles {
                is_admin: row.is_admin,
                is_driver: row.is_driver,
                is_equipment_man: row.is_equipment_man,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
