//! PostgreSQL Driver Log Adapter

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};

use core_kernel::{DomainPort, DriverLogId, HealthCheckResult, HealthCheckable, PortError};
use domain_fieldlog::{DriverLog, LogPort, LogQuery};

use crate::repositories::DriverLogRepository;

/// PostgreSQL-backed implementation of the LogPort trait
#[derive(Debug, Clone)]
pub struct PostgresDriverLogAdapter {
    repository: DriverLogRepository,
    pool: PgPool,
}

impl PostgresDriverLogAdapter {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: DriverLogRepository::new(pool.clone()),
            pool,
        }
    }
}

impl DomainPort for PostgresDriverLogAdapter {}

#[async_trait]
impl HealthCheckable for PostgresDriverLogAdapter {
    async fn health_check(&self) -> HealthCheckResult {
        super::ping(&self.pool, "postgres-driver-log-adapter").await
    }
}

#[async_trait]
impl LogPort for PostgresDriverLogAdapter {
    #[instrument(skip(self), fields(log_id = %id))]
    async fn get_log(&self, id: DriverLogId) -> Result<DriverLog, PortError> {
        Ok(self.repository.get(id).await?)
    }

    #[instrument(skip(self))]
    async fn list_logs(&self, query: LogQuery) -> Result<Vec<DriverLog>, PortError> {
        let logs = self.repository.list(&query).await?;
        debug!(count = logs.len(), "Listed driver logs");
        Ok(logs)
    }

    #[instrument(skip(self, log), fields(log_id = %log.id))]
    async fn insert_log(&self, log: DriverLog) -> Result<DriverLog, PortError> {
        self.repository.insert(&log).await?;
        Ok(log)
    }

    #[instrument(skip(self, log), fields(log_id = %log.id))]
    async fn update_log(&self, log: DriverLog) -> Result<DriverLog, PortError> {
        self.repository.update(&log).await?;
        Ok(log)
    }
}
