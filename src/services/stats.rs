//! Statistics service

use crate::{
    api::{operator::OperatorStats, stats::AdminStats},
    error::{AppError, AppResult},
    models::enums::UserRole,
    repository::Repository,
};

#[derive(Clone)]
pub struct StatsService {
    repository: Repository,
}

impl StatsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Aggregate counters for the admin dashboard. "Today" is the current
    /// UTC calendar day.
    pub async fn admin_stats(&self) -> AppResult<AdminStats> {
        let pool = &self.repository.pool;

        let total_institutions: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM institutions")
            .fetch_one(pool)
            .await?;

        let total_users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await?;

        let total_operators: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role = 'operator'")
                .fetch_one(pool)
                .await?;

        let total_tickets_today: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM tickets WHERE created_at >= CURRENT_DATE")
                .fetch_one(pool)
                .await?;

        let tickets_waiting: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM tickets WHERE status = 'waiting'")
                .fetch_one(pool)
                .await?;

        let tickets_completed_today: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM tickets WHERE status = 'completed' AND completed_at >= CURRENT_DATE",
        )
        .fetch_one(pool)
        .await?;

        let tickets_missed_today: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM tickets WHERE status = 'missed' AND created_at >= CURRENT_DATE",
        )
        .fetch_one(pool)
        .await?;

        // Mean creation-to-call delay over today's called tickets, in minutes
        let average_wait_time: f64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(AVG(EXTRACT(EPOCH FROM (called_at - created_at)) / 60), 0)::float8
            FROM tickets
            WHERE called_at >= CURRENT_DATE
            "#,
        )
        .fetch_one(pool)
        .await?;

        Ok(AdminStats {
            total_institutions,
            total_users,
            total_operators,
            total_tickets_today,
            tickets_waiting,
            tickets_completed_today,
            tickets_missed_today,
            average_wait_time: average_wait_time.round() as i64,
        })
    }

    /// Active operators, optionally restricted to one institution
    pub async fn list_operators(
        &self,
        institution_id: Option<i32>,
    ) -> AppResult<Vec<crate::models::user::User>> {
        if let Some(id) = institution_id {
            self.repository.institutions.get_by_id(id).await?;
        }

        self.repository.users.list_operators(institution_id).await
    }

    /// Daily counters for one operator's desk
    pub async fn operator_stats(&self, operator_id: i32) -> AppResult<OperatorStats> {
        let operator = self.repository.users.get_by_id(operator_id).await?;
        if operator.role == UserRole::Citizen {
            return Err(AppError::NotFound(format!(
                "Operator with id {} not found",
                operator_id
            )));
        }

        let tickets_served_today = self
            .repository
            .tickets
            .count_served_today(operator_id)
            .await?;

        let current_ticket = self
            .repository
            .tickets
            .current_for_operator(operator_id)
            .await?
            .map(|t| t.ticket_number);

        // Mean call-to-completion time over today's completed tickets
        let average_service_time: f64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(AVG(EXTRACT(EPOCH FROM (completed_at - called_at)) / 60), 0)::float8
            FROM tickets
            WHERE operator_id = $1
              AND status = 'completed'
              AND called_at IS NOT NULL
              AND completed_at >= CURRENT_DATE
            "#,
        )
        .bind(operator_id)
        .fetch_one(&self.repository.pool)
        .await?;

        Ok(OperatorStats {
            user_id: operator.id,
            name: operator.name,
            tickets_served_today,
            average_service_time: average_service_time.round() as i64,
            current_ticket,
        })
    }
}
