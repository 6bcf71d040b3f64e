//! PostgreSQL Catalog Adapter

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};

use core_kernel::{
    ActionId, ContactId, DomainPort, EquipmentId, HealthCheckResult, HealthCheckable, JobId, PortError,
};
use domain_catalog::{Action, CatalogPort, Contact, Equipment, Job, JobFilter};

use crate::repositories::CatalogRepository;

/// PostgreSQL-backed implementation of the CatalogPort trait
#[derive(Debug, Clone)]
pub struct PostgresCatalogAdapter {
    repository: CatalogRepository,
    pool: PgPool,
}

impl PostgresCatalogAdapter {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: CatalogRepository::new(pool.clone()),
            pool,
        }
    }

    pub fn repository(&self) -> &CatalogRepository {
        &self.repository
    }
}

impl DomainPort for PostgresCatalogAdapter {}

#[async_trait]
impl HealthCheckable for PostgresCatalogAdapter {
    async fn health_check(&self) -> HealthCheckResult {
        super::ping(&self.pool, "postgres-catalog-adapter").await
    }
}

#[async_trait]
impl CatalogPort for PostgresCatalogAdapter {
    #[instrument(skip(self), fields(equipment_id = %id))]
    async fn get_equipment(&self, id: EquipmentId) -> Result<Equipment, PortError> {
        Ok(self.repository.get_equipment(id).await?)
    }

    async fn list_equipment(&self) -> Result<Vec<Equipment>, PortError> {
        let items = self.repository.list_equipment().await?;
        debug!(count = items.len(), "Listed equipment");
        Ok(items)
    }

    #[instrument(skip(self, equipment), fields(equipment_id = %equipment.id))]
    async fn save_equipment(&self, equipment: Equipment) -> Result<Equipment, PortError> {
        self.repository.upsert_equipment(&equipment).await?;
        Ok(equipment)
    }

    #[instrument(skip(self))]
    async fn delete_equipment(&self, id: EquipmentId) -> Result<(), PortError> {
        Ok(self.repository.delete_equipment(id).await?)
    }

    #[instrument(skip(self), fields(job_id = %id))]
    async fn get_job(&self, id: JobId) -> Result<Job, PortError> {
        Ok(self.repository.get_job(id).await?)
    }

    async fn list_jobs(&self, filter: JobFilter) -> Result<Vec<Job>, PortError> {
        let jobs = self.repository.list_jobs(filter).await?;
        debug!(count = jobs.len(), ?filter, "Listed jobs");
        Ok(jobs)
    }

    #[instrument(skip(self, job), fields(job_id = %job.id))]
    async fn save_job(&self, job: Job) -> Result<Job, PortError> {
        self.repository.upsert_job(&job).await?;
        Ok(job)
    }

    #[instrument(skip(self))]
    async fn delete_job(&self, id: JobId) -> Result<(), PortError> {
        Ok(self.repository.delete_job(id).await?)
    }

    #[instrument(skip(self), fields(action_id = %id))]
    async fn get_action(&self, id: ActionId) -> Result<Action, PortError> {
        Ok(self.repository.get_action(id).await?)
    }

    async fn list_actions(&self) -> Result<Vec<Action>, PortError> {
        Ok(self.repository.list_actions().await?)
    }

    #[instrument(skip(self, action), fields(action_id = %action.id))]
    async fn save_action(&self, action: Action) -> Result<Action, PortError> {
        self.repository.upsert_action(&action).await?;
        Ok(action)
    }

    #[instrument(skip(self))]
    async fn delete_action(&self, id: ActionId) -> Result<(), PortError> {
        Ok(self.repository.delete_action(id).await?)
    }

    #[instrument(skip(self), fields(contact_id = %id))]
    async fn get_contact(&self, id: ContactId) -> Result<Contact, PortError> {
        Ok(self.repository.get_contact(id).await?)
    }

    async fn list_contacts(&self) -> Result<Vec<Contact>, PortError> {
        Ok(self.repository.list_contacts().await?)
    }

    #[instrument(skip(self, contact), fields(contact_id = %contact.id))]
    async fn save_contact(&self, contact: Contact) -> Result<Contact, PortError> {
        self.repository.upsert_contact(&contact).await?;
        Ok(contact)
    }

    #[instrument(skip(self))]
    async fn delete_contact(&self, id: ContactId) -> Result<(), PortError> {
        Ok(self.repository.delete_contact(id).await?)
    }
}
