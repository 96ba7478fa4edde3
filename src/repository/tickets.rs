//! Tickets repository — queue sequencing and lifecycle transitions.
//!
//! Every mutation of a queue's waiting set runs inside one transaction that
//! first locks the scope's counter row (`SELECT ... FOR UPDATE`). The lock
//! serializes concurrent creations, calls and removals in the same scope, so
//! the position-renumbering sweep can never interleave with another writer
//! and two call-next requests can never select the same ticket.

use chrono::Utc;
use sqlx::{Pool, Postgres, Transaction};

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::TicketStatus,
        institution::Institution,
        queue::Queue,
        ticket::{format_ticket_number, CreateTicket, Ticket, TicketScopeQuery},
    },
};

#[derive(Clone)]
pub struct TicketsRepository {
    pool: Pool<Postgres>,
}

impl TicketsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Lock the counter row for a queue scope, creating it if missing.
    /// The row lock is held until the transaction ends.
    async fn lock_queue(
        tx: &mut Transaction<'_, Postgres>,
        institution_id: i32,
        service_id: Option<i32>,
        default_average_service_time: i32,
    ) -> AppResult<Queue> {
        let queue = sqlx::query_as::<_, Queue>(
            r#"
            SELECT * FROM queues
            WHERE institution_id = $1 AND COALESCE(service_id, 0) = COALESCE($2, 0)
            FOR UPDATE
            "#,
        )
        .bind(institution_id)
        .bind(service_id)
        .fetch_optional(&mut **tx)
        .await?;

        if let Some(queue) = queue {
            return Ok(queue);
        }

        // Scope not provisioned yet; insert and re-lock. ON CONFLICT covers
        // the race where another transaction created the row in between.
        sqlx::query(
            r#"
            INSERT INTO queues (institution_id, service_id, average_service_time)
            VALUES ($1, $2, $3)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(institution_id)
        .bind(service_id)
        .bind(default_average_service_time)
        .execute(&mut **tx)
        .await?;

        let queue = sqlx::query_as::<_, Queue>(
            r#"
            SELECT * FROM queues
            WHERE institution_id = $1 AND COALESCE(service_id, 0) = COALESCE($2, 0)
            FOR UPDATE
            "#,
        )
        .bind(institution_id)
        .bind(service_id)
        .fetch_one(&mut **tx)
        .await?;

        Ok(queue)
    }

    /// Create a ticket: increment the scoped counter, derive the number from
    /// the institution category, and append at the tail of the waiting set.
    /// Counter increment and ticket insert commit atomically.
    pub async fn create(
        &self,
        ticket: &CreateTicket,
        institution: &Institution,
        reset_daily_counts: bool,
        default_average_service_time: i32,
    ) -> AppResult<(Ticket, Queue)> {
        let now = Utc::now();
        let today = now.date_naive();

        let mut tx = self.pool.begin().await?;

        let queue = Self::lock_queue(
            &mut tx,
            ticket.institution_id,
            ticket.service_id,
            default_average_service_time,
        )
        .await?;

        let sequence = queue.last_ticket_number + 1;
        let issued_today = if reset_daily_counts && queue.counter_date != today {
            1
        } else {
            queue.tickets_issued_today + 1
        };
        let ticket_number = format_ticket_number(institution.category, sequence);

        let waiting: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM tickets
            WHERE institution_id = $1
              AND COALESCE(service_id, 0) = COALESCE($2, 0)
              AND status = 'waiting'
            "#,
        )
        .bind(ticket.institution_id)
        .bind(ticket.service_id)
        .fetch_one(&mut *tx)
        .await?;
        let position = waiting as i32 + 1;

        let created = sqlx::query_as::<_, Ticket>(
            r#"
            INSERT INTO tickets
                (ticket_number, user_id, institution_id, service_id, status, queue_position, created_at)
            VALUES ($1, $2, $3, $4, 'waiting', $5, $6)
            RETURNING *
            "#,
        )
        .bind(&ticket_number)
        .bind(ticket.user_id)
        .bind(ticket.institution_id)
        .bind(ticket.service_id)
        .bind(position)
        .bind(now)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                AppError::Conflict(format!("Ticket number {} already issued", ticket_number))
            }
            other => AppError::Database(other),
        })?;

        let queue = sqlx::query_as::<_, Queue>(
            r#"
            UPDATE queues
            SET last_ticket_number = $2,
                tickets_issued_today = $3,
                counter_date = $4,
                updated_at = $5
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(queue.id)
        .bind(sequence)
        .bind(issued_today)
        .bind(today)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok((created, queue))
    }

    /// Get a ticket by number. Numbers are unique within a queue scope but
    /// not across institutions; without disambiguators the most recently
    /// created match wins.
    pub async fn get_by_number(
        &self,
        ticket_number: &str,
        scope: &TicketScopeQuery,
    ) -> AppResult<Ticket> {
        sqlx::query_as::<_, Ticket>(
            r#"
            SELECT * FROM tickets
            WHERE ticket_number = $1
              AND ($2::int4 IS NULL OR institution_id = $2)
              AND ($3::int4 IS NULL OR service_id = $3)
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(ticket_number)
        .bind(scope.institution_id)
        .bind(scope.service_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Ticket {} not found", ticket_number)))
    }

    /// Count waiting tickets ahead of this one in its queue
    pub async fn people_ahead(&self, ticket: &Ticket) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM tickets
            WHERE institution_id = $1
              AND COALESCE(service_id, 0) = COALESCE($2, 0)
              AND status = 'waiting'
              AND queue_position < $3
            "#,
        )
        .bind(ticket.institution_id)
        .bind(ticket.service_id)
        .bind(ticket.queue_position)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// List waiting tickets in position order. Without a service the
    /// institution's queues are merged, rank first, then arrival.
    pub async fn list_waiting(
        &self,
        institution_id: i32,
        service_id: Option<i32>,
    ) -> AppResult<Vec<Ticket>> {
        let tickets = if service_id.is_some() {
            sqlx::query_as::<_, Ticket>(
                r#"
                SELECT * FROM tickets
                WHERE institution_id = $1 AND service_id = $2 AND status = 'waiting'
                ORDER BY queue_position
                "#,
            )
            .bind(institution_id)
            .bind(service_id)
            .fetch_all(&self.pool)
            .await?
        } else {
            sqlx::query_as::<_, Ticket>(
                r#"
                SELECT * FROM tickets
                WHERE institution_id = $1 AND status = 'waiting'
                ORDER BY queue_position, created_at
                "#,
            )
            .bind(institution_id)
            .fetch_all(&self.pool)
            .await?
        };

        Ok(tickets)
    }

    /// Call the next waiting ticket in a scope. Returns `None` when the
    /// queue is empty — a normal outcome, not an error. The called ticket
    /// leaves the waiting set, so every ticket behind it moves up one rank.
    pub async fn call_next(
        &self,
        institution_id: i32,
        service_id: Option<i32>,
        operator_id: i32,
        default_average_service_time: i32,
    ) -> AppResult<Option<Ticket>> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let queue = Self::lock_queue(
            &mut tx,
            institution_id,
            service_id,
            default_average_service_time,
        )
        .await?;

        let next = sqlx::query_as::<_, Ticket>(
            r#"
            SELECT * FROM tickets
            WHERE institution_id = $1
              AND COALESCE(service_id, 0) = COALESCE($2, 0)
              AND status = 'waiting'
            ORDER BY queue_position
            LIMIT 1
            "#,
        )
        .bind(institution_id)
        .bind(service_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(next) = next else {
            tx.commit().await?;
            return Ok(None);
        };

        let called = sqlx::query_as::<_, Ticket>(
            r#"
            UPDATE tickets
            SET status = 'called', called_at = $2, operator_id = $3
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(next.id)
        .bind(now)
        .bind(operator_id)
        .fetch_one(&mut *tx)
        .await?;

        Self::close_position_gap(&mut tx, &next).await?;

        sqlx::query(
            "UPDATE queues SET current_ticket_number = $2, updated_at = $3 WHERE id = $1",
        )
        .bind(queue.id)
        .bind(&called.ticket_number)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Some(called))
    }

    /// Move a ticket to a new lifecycle state. Transition legality is
    /// re-checked on the row's current status inside the transaction, after
    /// the scope lock is taken. When the ticket leaves the waiting set its
    /// position gap is closed so positions stay contiguous from 1.
    pub async fn transition(
        &self,
        ticket: &Ticket,
        next: TicketStatus,
        operator_id: Option<i32>,
        default_average_service_time: i32,
    ) -> AppResult<Ticket> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        Self::lock_queue(
            &mut tx,
            ticket.institution_id,
            ticket.service_id,
            default_average_service_time,
        )
        .await?;

        let current = sqlx::query_as::<_, Ticket>("SELECT * FROM tickets WHERE id = $1 FOR UPDATE")
            .bind(ticket.id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Ticket {} not found", ticket.ticket_number)))?;

        if !current.status.can_transition_to(next) {
            return Err(AppError::BusinessRule(format!(
                "Ticket {} cannot move from {} to {}",
                current.ticket_number, current.status, next
            )));
        }

        let completed_at = if next == TicketStatus::Completed {
            Some(now)
        } else {
            current.completed_at
        };

        let updated = sqlx::query_as::<_, Ticket>(
            r#"
            UPDATE tickets
            SET status = $2,
                completed_at = $3,
                operator_id = COALESCE($4, operator_id)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(current.id)
        .bind(next)
        .bind(completed_at)
        .bind(operator_id)
        .fetch_one(&mut *tx)
        .await?;

        if current.status == TicketStatus::Waiting {
            Self::close_position_gap(&mut tx, &current).await?;
        }

        tx.commit().await?;

        Ok(updated)
    }

    /// Shift every waiting ticket behind `removed` up by one rank,
    /// restoring the contiguous 1..N position sequence for the scope.
    async fn close_position_gap(
        tx: &mut Transaction<'_, Postgres>,
        removed: &Ticket,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE tickets
            SET queue_position = queue_position - 1
            WHERE institution_id = $1
              AND COALESCE(service_id, 0) = COALESCE($2, 0)
              AND status = 'waiting'
              AND queue_position > $3
            "#,
        )
        .bind(removed.institution_id)
        .bind(removed.service_id)
        .bind(removed.queue_position)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    /// Ticket history for a user, most recent first
    pub async fn list_for_user(&self, user_id: i32, limit: i64) -> AppResult<Vec<Ticket>> {
        let tickets = sqlx::query_as::<_, Ticket>(
            r#"
            SELECT * FROM tickets
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(tickets)
    }

    /// Count tickets completed today by an operator
    pub async fn count_served_today(&self, operator_id: i32) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM tickets
            WHERE operator_id = $1
              AND status = 'completed'
              AND completed_at >= CURRENT_DATE
            "#,
        )
        .bind(operator_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// The ticket an operator currently has called or in service, if any
    pub async fn current_for_operator(&self, operator_id: i32) -> AppResult<Option<Ticket>> {
        let ticket = sqlx::query_as::<_, Ticket>(
            r#"
            SELECT * FROM tickets
            WHERE operator_id = $1 AND status IN ('called', 'in_service')
            ORDER BY called_at DESC
            LIMIT 1
            "#,
        )
        .bind(operator_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(ticket)
    }
}
