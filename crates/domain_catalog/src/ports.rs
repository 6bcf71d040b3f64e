//! Catalog Domain Ports
//!
//! `CatalogPort` is the read/write contract for the four reference
//! collections (equipment, jobs, actions, contacts). The rental and field
//! log services only read through it; the admin API writes through it.
//! `UserPort` holds the staff accounts admins manage.
//!
//! Adapters:
//!
//! - **PostgreSQL**: `infra_db::PostgresCatalogAdapter`, `infra_db::PostgresUserAdapter`
//! - **Mock**: [`mock::MockCatalogPort`] and [`mock::MockUserPort`], in memory, for tests

use async_trait::async_trait;

use core_kernel::{
    ActionId, ContactId, DomainPort, EquipmentId, HealthCheckable, JobId, PortError, UserId,
};

use crate::action::Action;
use crate::contact::Contact;
use crate::equipment::Equipment;
use crate::job::Job;
use crate::user::UserAccount;

/// Filter applied when listing jobs
#[derive(Debug, Clone, Copy, Default)]
pub struct JobFilter {
    /// Only jobs whose roles include `is_equipment_man`
    pub equipment_man_only: bool,
    /// Only jobs whose roles include `is_driver`
    pub driver_only: bool,
}

impl JobFilter {
    /// Jobs offered when creating a rental order
    pub fn for_orders() -> Self {
        Self {
            equipment_man_only: true,
            ..Default::default()
        }
    }

    pub fn matches(&self, job: &Job) -> bool {
        (!self.equipment_man_only || job.roles.is_equipment_man)
            && (!self.driver_only || job.roles.is_driver)
    }
}

/// Port for catalog reference data
///
/// `save_*` inserts or replaces by id. `delete_*` returns `NotFound` when the
/// record is absent.
#[async_trait]
pub trait CatalogPort: DomainPort + HealthCheckable {
    // Equipment
    async fn get_equipment(&self, id: EquipmentId) -> Result<Equipment, PortError>;
    async fn list_equipment(&self) -> Result<Vec<Equipment>, PortError>;
    async fn save_equipment(&self, equipment: Equipment) -> Result<Equipment, PortError>;
    async fn delete_equipment(&self, id: EquipmentId) -> Result<(), PortError>;

    // Jobs
    async fn get_job(&self, id: JobId) -> Result<Job, PortError>;
    async fn list_jobs(&self, filter: JobFilter) -> Result<Vec<Job>, PortError>;
    async fn save_job(&self, job: Job) -> Result<Job, PortError>;
    async fn delete_job(&self, id: JobId) -> Result<(), PortError>;

    // Actions
    async fn get_action(&self, id: ActionId) -> Result<Action, PortError>;
    async fn list_actions(&self) -> Result<Vec<Action>, PortError>;
    async fn save_action(&self, action: Action) -> Result<Action, PortError>;
    async fn delete_action(&self, id: ActionId) -> Result<(), PortError>;

    // Contacts
    async fn get_contact(&self, id: ContactId) -> Result<Contact, PortError>;
    async fn list_contacts(&self) -> Result<Vec<Contact>, PortError>;
    async fn save_contact(&self, contact: Contact) -> Result<Contact, PortError>;
    async fn delete_contact(&self, id: ContactId) -> Result<(), PortError>;
}

/// Port for staff accounts
///
/// `save_user` inserts or replaces by id and fails with `Conflict` when
/// another account already uses the email.
#[async_trait]
pub trait UserPort: DomainPort + HealthCheckable {
    async fn get_user(&self, id: UserId) -> Result<UserAccount, PortError>;
    async fn list_users(&self) -> Result<Vec<UserAccount>, PortError>;
    async fn save_user(&self, user: UserAccount) -> Result<UserAccount, PortError>;
    async fn delete_user(&self, id: UserId) -> Result<(), PortError>;
}

/// Mock implementation of CatalogPort for testing
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    use core_kernel::HealthCheckResult;

    /// In-memory mock implementation of CatalogPort
    #[derive(Debug, Default, Clone)]
    pub struct MockCatalogPort {
        equipment: Arc<RwLock<HashMap<EquipmentId, Equipment>>>,
        jobs: Arc<RwLock<HashMap<JobId, Job>>>,
        actions: Arc<RwLock<HashMap<ActionId, Action>>>,
        contacts: Arc<RwLock<HashMap<ContactId, Contact>>>,
    }

    impl MockCatalogPort {
        pub fn new() -> Self {
            Self::default()
        }

        pub async fn with_equipment(self, equipment: Equipment) -> Self {
            self.equipment.write().await.insert(equipment.id, equipment);
            self
        }

        pub async fn with_job(self, job: Job) -> Self {
            self.jobs.write().await.insert(job.id, job);
            self
        }

        pub async fn with_action(self, action: Action) -> Self {
            self.actions.write().await.insert(action.id, action);
            self
        }

        pub async fn with_contact(self, contact: Contact) -> Self {
            self.contacts.write().await.insert(contact.id, contact);
            self
        }
    }

    impl DomainPort for MockCatalogPort {}

    #[async_trait]
    impl HealthCheckable for MockCatalogPort {
        async fn health_check(&self) -> HealthCheckResult {
            HealthCheckResult::healthy("mock-catalog-port")
        }
    }

    fn sorted_by_name<T>(mut items: Vec<T>, name: impl Fn(&T) -> &str) -> Vec<T> {
        items.sort_by(|a, b| name(a).cmp(name(b)));
        items
    }

    #[async_trait]
    impl CatalogPort for MockCatalogPort {
        async fn get_equipment(&self, id: EquipmentId) -> Result<Equipment, PortError> {
            self.equipment
                .read()
                .await
                .get(&id)
                .cloned()
                .ok_or_else(|| PortError::not_found("Equipment", id))
        }

        async fn list_equipment(&self) -> Result<Vec<Equipment>, PortError> {
            let items = self.equipment.read().await.values().cloned().collect();
            Ok(sorted_by_name(items, |e: &Equipment| e.name.as_str()))
        }

        async fn save_equipment(&self, equipment: Equipment) -> Result<Equipment, PortError> {
            self.equipment.write().await.insert(equipment.id, equipment.clone());
            Ok(equipment)
        }

        async fn delete_equipment(&self, id: EquipmentId) -> Result<(), PortError> {
            self.equipment
                .write()
                .await
                .remove(&id)
                .map(|_| ())
                .ok_or_else(|| PortError::not_found("Equipment", id))
        }

        async fn get_job(&self, id: JobId) -> Result<Job, PortError> {
            self.jobs
                .read()
                .await
                .get(&id)
                .cloned()
                .ok_or_else(|| PortError::not_found("Job", id))
        }

        async fn list_jobs(&self, filter: JobFilter) -> Result<Vec<Job>, PortError> {
            let items = self
                .jobs
                .read()
                .await
                .values()
                .filter(|job| filter.matches(job))
                .cloned()
                .collect();
            Ok(sorted_by_name(items, |j: &Job| j.name.as_str()))
        }

        async fn save_job(&self, job: Job) -> Result<Job, PortError> {
            self.jobs.write().await.insert(job.id, job.clone());
            Ok(job)
        }

        async fn delete_job(&self, id: JobId) -> Result<(), PortError> {
            self.jobs
                .write()
                .await
                .remove(&id)
                .map(|_| ())
                .ok_or_else(|| PortError::not_found("Job", id))
        }

        async fn get_action(&self, id: ActionId) -> Result<Action, PortError> {
            self.actions
                .read()
                .await
                .get(&id)
                .cloned()
                .ok_or_else(|| PortError::not_found("Action", id))
        }

        async fn list_actions(&self) -> Result<Vec<Action>, PortError> {
            let items = self.actions.read().await.values().cloned().collect();
            Ok(sorted_by_name(items, |a: &Action| a.name.as_str()))
        }

        async fn save_action(&self, action: Action) -> Result<Action, PortError> {
            self.actions.write().await.insert(action.id, action.clone());
            Ok(action)
        }

        async fn delete_action(&self, id: ActionId) -> Result<(), PortError> {
            self.actions
                .write()
                .await
                .remove(&id)
                .map(|_| ())
                .ok_or_else(|| PortError::not_found("Action", id))
        }

        async fn get_contact(&self, id: ContactId) -> Result<Contact, PortError> {
            self.contacts
                .read()
                .await
                .get(&id)
                .cloned()
                .ok_or_else(|| PortError::not_found("Contact", id))
        }

        async fn list_contacts(&self) -> Result<Vec<Contact>, PortError> {
            let items = self.contacts.read().await.values().cloned().collect();
            Ok(sorted_by_name(items, |c: &Contact| c.name.as_str()))
        }

        async fn save_contact(&self, contact: Contact) -> Result<Contact, PortError> {
            self.contacts.write().await.insert(contact.id, contact.clone());
            Ok(contact)
        }

        async fn delete_contact(&self, id: ContactId) -> Result<(), PortError> {
            self.contacts
                .write()
                .await
                .remove(&id)
                .map(|_| ())
                .ok_or_else(|| PortError::not_found("Contact", id))
        }
    }

    /// In-memory mock implementation of UserPort
    #[derive(Debug, Default, Clone)]
    pub struct MockUserPort {
        users: Arc<RwLock<HashMap<UserId, UserAccount>>>,
    }

    impl MockUserPort {
        pub fn new() -> Self {
            Self::default()
        }

        pub async fn with_user(self, user: UserAccount) -> Self {
            self.users.write().await.insert(user.id, user);
            self
        }
    }

    impl DomainPort for MockUserPort {}

    #[async_trait]
    impl HealthCheckable for MockUserPort {
        async fn health_check(&self) -> HealthCheckResult {
            HealthCheckResult::healthy("mock-user-port")
        }
    }

    #[async_trait]
    impl UserPort for MockUserPort {
        async fn get_user(&self, id: UserId) -> Result<UserAccount, PortError> {
            self.users
                .read()
                .await
                .get(&id)
                .cloned()
                .ok_or_else(|| PortError::not_found("User", id))
        }

        async fn list_users(&self) -> Result<Vec<UserAccount>, PortError> {
            let items = self.users.read().await.values().cloned().collect();
            Ok(sorted_by_name(items, |u: &UserAccount| u.email.as_str()))
        }

        async fn save_user(&self, user: UserAccount) -> Result<UserAccount, PortError> {
            let mut users = self.users.write().await;
            if users.values().any(|u| u.email == user.email && u.id != user.id) {
                return Err(PortError::conflict(format!("User email already exists: {}", user.email)));
            }
            users.insert(user.id, user.clone());
            Ok(user)
        }

        async fn delete_user(&self, id: UserId) -> Result<(), PortError> {
            self.users
                .write()
                .await
                .remove(&id)
                .map(|_| ())
                .ok_or_else(|| PortError::not_found("User", id))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::MockCatalogPort;
    use super::*;
    use crate::equipment::EquipmentPrices;
    use crate::job::JobRoles;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_list_jobs_for_orders_filters_equipment_man() {
        let operator = Job::new("Operator", "", JobRoles::equipment_man());
        let driver = Job::new("Driver", "", JobRoles::driver());
        let port = MockCatalogPort::new()
            .with_job(operator.clone())
            .await
            .with_job(driver)
            .await;

        let jobs = port.list_jobs(JobFilter::for_orders()).await.unwrap();
        assert_eq!(jobs, vec![operator]);

        let all = port.list_jobs(JobFilter::default()).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_missing_equipment_is_not_found() {
        let port = MockCatalogPort::new();
        let err = port.get_equipment(EquipmentId::new()).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_save_replaces_by_id() {
        let port = MockCatalogPort::new();
        let mut excavator = Equipment::new("Excavator", "", EquipmentPrices::new(dec!(250), dec!(900)));
        port.save_equipment(excavator.clone()).await.unwrap();

        excavator.prices.daily = dec!(275);
        port.save_equipment(excavator.clone()).await.unwrap();

        let stored = port.get_equipment(excavator.id).await.unwrap();
        assert_eq!(stored.prices.daily, dec!(275));
        assert_eq!(port.list_equipment().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_user_email_conflicts() {
        use super::mock::MockUserPort;
        use crate::user::{UserAccount, UserRoles};

        let port = MockUserPort::new();
        let first = port
            .save_user(UserAccount::new("crew@yard.example", UserRoles::default()))
            .await
            .unwrap();

        let second = UserAccount::new("Crew@Yard.example", UserRoles::default());
        assert!(matches!(port.save_user(second).await.unwrap_err(), PortError::Conflict { .. }));

        let mut promoted = first.clone();
        promoted.roles.is_equipment_man = true;
        port.save_user(promoted).await.unwrap();
        assert!(port.get_user(first.id).await.unwrap().roles.is_equipment_man);
    }

    #[tokio::test]
    async fn test_delete_contact_twice() {
        let contact = crate::contact::Contact::new("Riverside HOA");
        let port = MockCatalogPort::new().with_contact(contact.clone()).await;

        port.delete_contact(contact.id).await.unwrap();
        assert!(port.delete_contact(contact.id).await.unwrap_err().is_not_found());
    }
}
