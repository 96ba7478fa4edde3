//! Institution model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::enums::InstitutionCategory;

/// Institution model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Institution {
    pub id: i32,
    pub name: String,
    pub category: InstitutionCategory,
    pub location: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Create institution request (admin)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateInstitution {
    #[validate(length(min = 2, message = "Name must be at least 2 characters"))]
    pub name: String,
    pub category: InstitutionCategory,
    #[validate(length(min = 1, message = "Location is required"))]
    pub location: String,
    pub address: Option<String>,
    pub phone: Option<String>,
}

/// Update institution request (admin)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateInstitution {
    #[validate(length(min = 2, message = "Name must be at least 2 characters"))]
    pub name: Option<String>,
    pub location: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
}

/// Institution list query parameters
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct InstitutionQuery {
    /// Filter by category (hospital, municipal, bank, transport)
    pub category: Option<InstitutionCategory>,
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}
