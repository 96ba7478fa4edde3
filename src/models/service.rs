//! Service (desk) model — a named queue within an institution

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Service model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Service {
    pub id: i32,
    pub institution_id: i32,
    pub name: String,
    /// Average handling duration in minutes, feeds wait-time estimates
    pub average_duration_minutes: i32,
    pub created_at: DateTime<Utc>,
}

/// Create service request (admin)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateService {
    #[validate(length(min = 2, message = "Name must be at least 2 characters"))]
    pub name: String,
    #[validate(range(min = 1, max = 480, message = "Average duration must be 1-480 minutes"))]
    pub average_duration_minutes: Option<i32>,
}
