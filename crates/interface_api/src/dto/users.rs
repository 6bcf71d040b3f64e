//! Staff account DTOs

use serde::{Deserialize, Serialize};

use domain_catalog::{UserAccount, UserRoles, UserType};

#[derive(Debug, Deserialize)]
pub struct UserRequest {
    pub email: String,
    pub display_name: Option<String>,
    #[serde(default)]
    pub roles: UserRoles,
}

impl UserRequest {
    pub fn into_user(self) -> UserAccount {
        let user = UserAccount::new(&self.email, self.roles);
        match self.display_name {
            Some(name) => user.with_display_name(name.trim()),
            None => user,
        }
    }
}

/// An account plus the label derived from its role flags
#[derive(Debug, Serialize)]
pub struct UserResponse {
    #[serde(flatten)]
    pub user: UserAccount,
    pub user_type: UserType,
}

impl From<UserAccount> for UserResponse {
    fn from(user: UserAccount) -> Self {
        let user_type = user.user_type();
        Self { user, user_type }
    }
}
