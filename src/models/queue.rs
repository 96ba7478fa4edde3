//! Queue counter model — one row per (institution, service) scope

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Queue counter row from database. `service_id IS NULL` is the
/// institution's general queue, a scope of its own.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Queue {
    pub id: i32,
    pub institution_id: i32,
    pub service_id: Option<i32>,
    /// Last issued sequence value; monotonic, never reused, never reset
    pub last_ticket_number: i32,
    /// Tickets issued on `counter_date`; reset behaviour is configurable
    pub tickets_issued_today: i32,
    pub counter_date: NaiveDate,
    pub current_ticket_number: Option<String>,
    /// Average service time in minutes
    pub average_service_time: i32,
    pub updated_at: DateTime<Utc>,
}

/// Queue summary for status displays
#[derive(Debug, Serialize, ToSchema)]
pub struct QueueInfo {
    pub institution_id: i32,
    pub service_id: Option<i32>,
    pub current_ticket_number: Option<String>,
    pub people_waiting: i64,
    /// Estimated wait in minutes for a newcomer
    pub estimated_wait_time: i64,
    pub average_service_time: i32,
}
