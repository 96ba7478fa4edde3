//! User model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::error::AppError;

use super::enums::UserRole;

/// Full user model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    /// Hashed password (argon2)
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: UserRole,
    /// Institution the user works at; required for operators
    pub institution_id: Option<i32>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

/// Signup request. Role defaults to citizen; creating operator or admin
/// accounts requires an authenticated admin.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUser {
    #[validate(length(min = 2, message = "Name must be at least 2 characters"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    pub role: Option<UserRole>,
    pub institution_id: Option<i32>,
}

/// JWT Claims for authenticated users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    pub sub: String,
    pub user_id: i32,
    pub role: UserRole,
    pub institution_id: Option<i32>,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Require admin privileges
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::Authorization("Administrator privileges required".to_string()))
        }
    }

    /// Require operator (or admin) privileges, scoped to an institution.
    /// Operators may only act on their own institution's queues.
    pub fn require_operator_for(&self, institution_id: i32) -> Result<(), AppError> {
        match self.role {
            UserRole::Admin => Ok(()),
            UserRole::Operator if self.institution_id == Some(institution_id) => Ok(()),
            UserRole::Operator => Err(AppError::Authorization(
                "Operators may only act on their own institution".to_string(),
            )),
            UserRole::Citizen => Err(AppError::Authorization(
                "Operator privileges required".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(role: UserRole, institution_id: Option<i32>) -> UserClaims {
        UserClaims {
            sub: "test@guichet.org".to_string(),
            user_id: 1,
            role,
            institution_id,
            exp: 0,
            iat: 0,
        }
    }

    #[test]
    fn operator_scope_is_enforced() {
        assert!(claims(UserRole::Operator, Some(1)).require_operator_for(1).is_ok());
        assert!(claims(UserRole::Operator, Some(1)).require_operator_for(2).is_err());
        assert!(claims(UserRole::Operator, None).require_operator_for(1).is_err());
        assert!(claims(UserRole::Admin, None).require_operator_for(7).is_ok());
        assert!(claims(UserRole::Citizen, Some(1)).require_operator_for(1).is_err());
    }
}
