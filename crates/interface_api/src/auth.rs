//! Authentication and authorization

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use core_kernel::UserId;

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: UserId,
    /// User's roles
    pub roles: Vec<String>,
    /// Expiration timestamp
    pub exp: i64,
    /// Issued at timestamp
    pub iat: i64,
}

impl Claims {
    pub fn user_id(&self) -> UserId {
        self.sub
    }

    pub fn is_admin(&self) -> bool {
        self.roles.iter().any(|r| r == roles::ADMIN)
    }

    /// Fails unless the caller holds `role` (admins hold every role)
    pub fn require(&self, role: &str) -> Result<(), AuthError> {
        if has_role(self, role) {
            Ok(())
        } else {
            Err(AuthError::MissingPermission(role.to_string()))
        }
    }

    /// Admins may act on any user's records, everyone else only on their own
    pub fn can_access(&self, owner: UserId) -> bool {
        self.is_admin() || self.sub == owner
    }
}

/// Auth errors
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid token")]
    InvalidToken,
    #[error("Token expired")]
    TokenExpired,
    #[error("Missing permission: {0}")]
    MissingPermission(String),
}

/// Creates a new JWT token
///
/// # Arguments
///
/// * `user_id` - User identifier
/// * `roles` - User's roles
/// * `secret` - JWT secret key
/// * `expiration_secs` - Token validity in seconds
pub fn create_token(
    user_id: UserId,
    roles: Vec<String>,
    secret: &str,
    expiration_secs: u64,
) -> Result<String, AuthError> {
    let now = Utc::now();
    let exp = now + Duration::seconds(expiration_secs as i64);

    let claims = Claims {
        sub: user_id,
        roles,
        exp: exp.timestamp(),
        iat: now.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|_| AuthError::InvalidToken)
}

/// Validates a JWT token
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, AuthError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        _ => AuthError::InvalidToken,
    })?;

    Ok(token_data.claims)
}

/// Checks if user has required role
pub fn has_role(claims: &Claims, required_role: &str) -> bool {
    claims.roles.iter().any(|r| r == required_role || r == roles::ADMIN)
}

/// Role names carried in tokens
pub mod roles {
    /// Manages the catalog and sees every user's records
    pub const ADMIN: &str = "admin";
    /// Records driver logs and runs a work timer
    pub const DRIVER: &str = "driver";
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn test_token_round_trip_keeps_subject() {
        let user = UserId::new();
        let token = create_token(user, vec![roles::DRIVER.into()], SECRET, 60).unwrap();
        let claims = validate_token(&token, SECRET).unwrap();
        assert_eq!(claims.user_id(), user);
        assert!(has_role(&claims, roles::DRIVER));
        assert!(!claims.is_admin());
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = create_token(UserId::new(), vec![], SECRET, 60).unwrap();
        assert!(matches!(validate_token(&token, "other"), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_admin_holds_every_role() {
        let claims = Claims {
            sub: UserId::new(),
            roles: vec![roles::ADMIN.into()],
            exp: 0,
            iat: 0,
        };
        assert!(claims.require(roles::DRIVER).is_ok());
        assert!(claims.can_access(UserId::new()));
    }

    #[test]
    fn test_driver_cannot_touch_other_users() {
        let claims = Claims {
            sub: UserId::new(),
            roles: vec![roles::DRIVER.into()],
            exp: 0,
            iat: 0,
        };
        assert!(matches!(claims.require(roles::ADMIN), Err(AuthError::MissingPermission(_))));
        assert!(!claims.can_access(UserId::new()));
        assert!(claims.can_access(claims.sub));
    }
}
