//! Ticket model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

use super::enums::{InstitutionCategory, TicketStatus};
use super::institution::Institution;

/// Ticket model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Ticket {
    pub id: i32,
    pub ticket_number: String,
    pub user_id: Option<i32>,
    pub institution_id: i32,
    pub service_id: Option<i32>,
    pub status: TicketStatus,
    /// Rank among waiting tickets of the same queue; meaningful only while waiting
    pub queue_position: i32,
    pub operator_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub called_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Ticket with its institution, for display
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TicketDetails {
    pub ticket: Ticket,
    pub institution: Institution,
}

/// Create ticket request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTicket {
    pub institution_id: i32,
    pub service_id: Option<i32>,
    /// Omitted for anonymous tickets
    pub user_id: Option<i32>,
}

/// Statistics returned when a ticket is created or queried
#[derive(Debug, Serialize, ToSchema)]
pub struct TicketStats {
    pub ticket_number: String,
    pub queue_position: i32,
    pub people_ahead: i64,
    /// Estimated wait in minutes
    pub estimated_wait_time: i64,
    pub institution_name: String,
}

/// Scope disambiguators for lookups by ticket number. Numbers are unique
/// within a queue but not across institutions.
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct TicketScopeQuery {
    pub institution_id: Option<i32>,
    pub service_id: Option<i32>,
}

/// Format a ticket number from the institution category and the scoped
/// sequence value: H001, H002, ... The field widens past 999 (H1000).
pub fn format_ticket_number(category: InstitutionCategory, sequence: i32) -> String {
    format!("{}{:03}", category.prefix_letter(), sequence)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_are_zero_padded_to_three_digits() {
        assert_eq!(format_ticket_number(InstitutionCategory::Hospital, 1), "H001");
        assert_eq!(format_ticket_number(InstitutionCategory::Municipal, 42), "M042");
        assert_eq!(format_ticket_number(InstitutionCategory::Bank, 999), "B999");
    }

    #[test]
    fn numbers_widen_past_three_digits() {
        assert_eq!(format_ticket_number(InstitutionCategory::Transport, 1000), "T1000");
        assert_eq!(format_ticket_number(InstitutionCategory::Hospital, 12345), "H12345");
    }
}
