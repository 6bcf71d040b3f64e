//! PostgreSQL User Adapter

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};

use core_kernel::{DomainPort, HealthCheckResult, HealthCheckable, PortError, UserId};
use domain_catalog::{UserAccount, UserPort};

use crate::repositories::UserRepository;

/// PostgreSQL-backed implementation of the UserPort trait
#[derive(Debug, Clone)]
pub struct PostgresUserAdapter {
    repository: UserRepository,
    pool: PgPool,
}

impl PostgresUserAdapter {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: UserRepository::new(pool.clone()),
            pool,
        }
    }
}

impl DomainPort for PostgresUserAdapter {}

#[async_trait]
impl HealthCheckable for PostgresUserAdapter {
    async fn health_check(&self) -> HealthCheckResult {
        super::ping(&self.pool, "postgres-user-adapter").await
    }
}

#[async_trait]
impl UserPort for PostgresUserAdapter {
    #[instrument(skip(self), fields(user_id = %id))]
    async fn get_user(&self, id: UserId) -> Result<UserAccount, PortError> {
        Ok(self.repository.get(id).await?)
    }

    async fn list_users(&self) -> Result<Vec<UserAccount>, PortError> {
        let users = self.repository.list().await?;
        debug!(count = users.len(), "Listed users");
        Ok(users)
    }

    #[instrument(skip(self, user), fields(user_id = %user.id))]
    async fn save_user(&self, user: UserAccount) -> Result<UserAccount, PortError> {
        self.repository.upsert(&user).await?;
        Ok(user)
    }

    #[instrument(skip(self))]
    async fn delete_user(&self, id: UserId) -> Result<(), PortError> {
        Ok(self.repository.delete(id).await?)
    }
}
