//! Shared domain enums

use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, Postgres};
use utoipa::ToSchema;

// ---------------------------------------------------------------------------
// UserRole
// ---------------------------------------------------------------------------

/// User roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Citizen,
    Operator,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Citizen => "citizen",
            UserRole::Operator => "operator",
            UserRole::Admin => "admin",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "citizen" => Ok(UserRole::Citizen),
            "operator" => Ok(UserRole::Operator),
            "admin" => Ok(UserRole::Admin),
            _ => Err(format!("Invalid user role: {}", s)),
        }
    }
}

impl sqlx::Type<Postgres> for UserRole {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for UserRole {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for UserRole {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        let s: String = self.as_str().to_string();
        <String as Encode<Postgres>>::encode(s, buf)
    }
}

// ---------------------------------------------------------------------------
// InstitutionCategory
// ---------------------------------------------------------------------------

/// Institution categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum InstitutionCategory {
    Hospital,
    Municipal,
    Bank,
    Transport,
}

impl InstitutionCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            InstitutionCategory::Hospital => "hospital",
            InstitutionCategory::Municipal => "municipal",
            InstitutionCategory::Bank => "bank",
            InstitutionCategory::Transport => "transport",
        }
    }

    /// Letter used as the ticket number prefix for this category
    pub fn prefix_letter(&self) -> char {
        match self {
            InstitutionCategory::Hospital => 'H',
            InstitutionCategory::Municipal => 'M',
            InstitutionCategory::Bank => 'B',
            InstitutionCategory::Transport => 'T',
        }
    }
}

impl std::fmt::Display for InstitutionCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for InstitutionCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hospital" => Ok(InstitutionCategory::Hospital),
            "municipal" => Ok(InstitutionCategory::Municipal),
            "bank" => Ok(InstitutionCategory::Bank),
            "transport" => Ok(InstitutionCategory::Transport),
            _ => Err(format!("Invalid institution category: {}", s)),
        }
    }
}

impl sqlx::Type<Postgres> for InstitutionCategory {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for InstitutionCategory {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for InstitutionCategory {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        let s: String = self.as_str().to_string();
        <String as Encode<Postgres>>::encode(s, buf)
    }
}

// ---------------------------------------------------------------------------
// TicketStatus
// ---------------------------------------------------------------------------

/// Ticket lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Waiting,
    Called,
    InService,
    Completed,
    Cancelled,
    Missed,
}

impl TicketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Waiting => "waiting",
            TicketStatus::Called => "called",
            TicketStatus::InService => "in_service",
            TicketStatus::Completed => "completed",
            TicketStatus::Cancelled => "cancelled",
            TicketStatus::Missed => "missed",
        }
    }

    /// Whether the state machine permits moving from `self` to `next`.
    ///
    /// waiting -> called -> in_service -> completed, with side exits
    /// waiting -> cancelled and called/in_service -> missed.
    pub fn can_transition_to(&self, next: TicketStatus) -> bool {
        matches!(
            (self, next),
            (TicketStatus::Waiting, TicketStatus::Called)
                | (TicketStatus::Waiting, TicketStatus::Cancelled)
                | (TicketStatus::Called, TicketStatus::InService)
                | (TicketStatus::Called, TicketStatus::Completed)
                | (TicketStatus::Called, TicketStatus::Missed)
                | (TicketStatus::InService, TicketStatus::Completed)
                | (TicketStatus::InService, TicketStatus::Missed)
        )
    }

    /// Terminal states admit no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TicketStatus::Completed | TicketStatus::Cancelled | TicketStatus::Missed
        )
    }
}

impl std::fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TicketStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "waiting" => Ok(TicketStatus::Waiting),
            "called" => Ok(TicketStatus::Called),
            "in_service" => Ok(TicketStatus::InService),
            "completed" => Ok(TicketStatus::Completed),
            "cancelled" => Ok(TicketStatus::Cancelled),
            "missed" => Ok(TicketStatus::Missed),
            _ => Err(format!("Invalid ticket status: {}", s)),
        }
    }
}

impl sqlx::Type<Postgres> for TicketStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for TicketStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for TicketStatus {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        let s: String = self.as_str().to_string();
        <String as Encode<Postgres>>::encode(s, buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_STATUSES: [TicketStatus; 6] = [
        TicketStatus::Waiting,
        TicketStatus::Called,
        TicketStatus::InService,
        TicketStatus::Completed,
        TicketStatus::Cancelled,
        TicketStatus::Missed,
    ];

    #[test]
    fn waiting_can_only_be_called_or_cancelled() {
        for next in ALL_STATUSES {
            let allowed = TicketStatus::Waiting.can_transition_to(next);
            assert_eq!(
                allowed,
                matches!(next, TicketStatus::Called | TicketStatus::Cancelled),
                "waiting -> {} should be {}",
                next,
                !allowed
            );
        }
    }

    #[test]
    fn called_and_in_service_exit_to_completed_or_missed() {
        for from in [TicketStatus::Called, TicketStatus::InService] {
            assert!(from.can_transition_to(TicketStatus::Completed));
            assert!(from.can_transition_to(TicketStatus::Missed));
            assert!(!from.can_transition_to(TicketStatus::Waiting));
            assert!(!from.can_transition_to(TicketStatus::Cancelled));
        }
        assert!(TicketStatus::Called.can_transition_to(TicketStatus::InService));
        assert!(!TicketStatus::InService.can_transition_to(TicketStatus::Called));
    }

    #[test]
    fn terminal_states_admit_no_transitions() {
        for from in ALL_STATUSES.iter().filter(|s| s.is_terminal()) {
            for next in ALL_STATUSES {
                assert!(
                    !from.can_transition_to(next),
                    "{} -> {} must be rejected",
                    from,
                    next
                );
            }
        }
    }

    #[test]
    fn status_round_trips_through_strings() {
        for status in ALL_STATUSES {
            assert_eq!(status.as_str().parse::<TicketStatus>().unwrap(), status);
        }
        assert!("pending".parse::<TicketStatus>().is_err());
    }

    #[test]
    fn category_prefix_letters() {
        assert_eq!(InstitutionCategory::Hospital.prefix_letter(), 'H');
        assert_eq!(InstitutionCategory::Municipal.prefix_letter(), 'M');
        assert_eq!(InstitutionCategory::Bank.prefix_letter(), 'B');
        assert_eq!(InstitutionCategory::Transport.prefix_letter(), 'T');
    }
}
