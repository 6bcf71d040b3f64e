//! Jobs and the roles they grant

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::JobId;

use crate::error::CatalogError;

/// Role flags attached to a job (and to the actions a role may log)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct JobRoles {
    /// Driver jobs carry a surcharge on rental orders
    #[serde(default)]
    pub is_driver: bool,
    /// Only equipment-man jobs are offered when creating an order
    #[serde(default)]
    pub is_equipment_man: bool,
}

impl JobRoles {
    pub fn driver() -> Self {
        Self {
            is_driver: true,
            is_equipment_man: false,
        }
    }

    pub fn equipment_man() -> Self {
        Self {
            is_driver: false,
            is_equipment_man: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub name: String,
    pub description: String,
    pub roles: JobRoles,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    pub fn new(name: impl Into<String>, description: impl Into<String>, roles: JobRoles) -> Self {
        let now = Utc::now();
        Self {
            id: JobId::new_v7(),
            name: name.into(),
            description: description.into(),
            roles,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.name.trim().is_empty() {
            return Err(CatalogError::MissingField("name"));
        }
        Ok(())
    }
}
