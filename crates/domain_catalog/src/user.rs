//! Staff accounts managed by admins
//!
//! An account only carries identity and role flags. Credentials live with
//! whoever issues the bearer tokens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::UserId;

use crate::error::CatalogError;

/// Role flags on a staff account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserRoles {
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub is_driver: bool,
    #[serde(default)]
    pub is_equipment_man: bool,
}

/// The single label shown for an account's role flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UserType {
    Admin,
    Both,
    Driver,
    EquipmentMan,
}

impl UserRoles {
    /// Admin wins; an account with no flags counts as a driver
    pub fn user_type(&self) -> UserType {
        match (self.is_admin, self.is_driver, self.is_equipment_man) {
            (true, _, _) => UserType::Admin,
            (false, true, true) => UserType::Both,
            (false, false, true) => UserType::EquipmentMan,
            (false, _, false) => UserType::Driver,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct UserAccount {
    pub id: UserId,
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    pub display_name: Option<String>,
    pub roles: UserRoles,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserAccount {
    /// Emails are stored lowercased so uniqueness ignores case
    pub fn new(email: impl AsRef<str>, roles: UserRoles) -> Self {
        let now = Utc::now();
        Self {
            id: UserId::new_v7(),
            email: email.as_ref().trim().to_lowercase(),
            display_name: None,
            roles,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into()).filter(|n: &String| !n.trim().is_empty());
        self
    }

    pub fn user_type(&self) -> UserType {
        self.roles.user_type()
    }

    pub fn check(&self) -> Result<(), CatalogError> {
        if self.email.is_empty() {
            return Err(CatalogError::MissingField("email"));
        }
        self.validate().map_err(CatalogError::from_validation)
    }
}
