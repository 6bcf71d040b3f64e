//! Catalog DTOs

use serde::Deserialize;
use validator::Validate;

use domain_catalog::{Action, ActionPrices, BillingUnit, Contact, Equipment, EquipmentPrices, Job, JobFilter, JobRoles};

#[derive(Debug, Deserialize, Validate)]
pub struct EquipmentRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Hosted URLs are kept; anything else is assigned a storage path
    #[serde(default)]
    pub images: Vec<String>,
    pub prices: EquipmentPrices,
}

impl EquipmentRequest {
    pub fn into_equipment(self) -> Equipment {
        Equipment::new(self.name.trim(), self.description, self.prices).with_images(self.images)
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct JobRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub roles: JobRoles,
}

impl JobRequest {
    pub fn into_job(self) -> Job {
        Job::new(self.name.trim(), self.description, self.roles)
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct ActionRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub unit: Option<BillingUnit>,
    #[serde(default)]
    pub prices: ActionPrices,
    #[serde(default)]
    pub roles: JobRoles,
}

impl ActionRequest {
    pub fn into_action(self) -> Action {
        let mut action = Action::new(self.name.trim(), self.description, self.prices);
        action.unit = self.unit;
        action.roles = self.roles;
        action
    }
}

#[derive(Debug, Deserialize)]
pub struct ContactRequest {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

impl ContactRequest {
    pub fn into_contact(self) -> Contact {
        let mut contact = Contact::new(self.name.trim());
        contact.email = self.email.filter(|e| !e.trim().is_empty());
        contact.phone = self.phone.filter(|p| !p.trim().is_empty());
        contact.address = self.address;
        contact.notes = self.notes;
        contact
    }
}

/// `GET /jobs` query string
#[derive(Debug, Default, Deserialize)]
pub struct JobListParams {
    #[serde(default)]
    pub equipment_man: bool,
    #[serde(default)]
    pub driver: bool,
}

impl From<JobListParams> for JobFilter {
    fn from(params: JobListParams) -> Self {
        JobFilter {
            equipment_man_only: params.equipment_man,
            driver_only: params.driver,
        }
    }
}
