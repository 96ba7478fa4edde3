//! Ticket lifecycle controller.
//!
//! Entry point for citizen and operator actions: materializes new tickets
//! through the number generator and position tracker, and drives the
//! waiting -> called -> in_service -> completed state machine with its
//! cancelled/missed side exits. Authorization is checked here; the actual
//! transition legality is re-verified inside the repository transaction.

use crate::{
    config::QueueConfig,
    error::{AppError, AppResult},
    models::{
        enums::TicketStatus,
        ticket::{CreateTicket, Ticket, TicketDetails, TicketScopeQuery, TicketStats},
        user::UserClaims,
    },
    repository::Repository,
};

use super::queues::estimate_wait;

#[derive(Clone)]
pub struct TicketsService {
    repository: Repository,
    queue_config: QueueConfig,
}

impl TicketsService {
    pub fn new(repository: Repository, queue_config: QueueConfig) -> Self {
        Self { repository, queue_config }
    }

    /// Create a ticket and return its queue statistics
    pub async fn create_ticket(&self, request: CreateTicket) -> AppResult<TicketStats> {
        let institution = self
            .repository
            .institutions
            .get_by_id(request.institution_id)
            .await?;

        if let Some(service_id) = request.service_id {
            let service = self.repository.services.get_by_id(service_id).await?;
            if service.institution_id != request.institution_id {
                return Err(AppError::BadRequest(format!(
                    "Service {} does not belong to institution {}",
                    service_id, request.institution_id
                )));
            }
        }

        if let Some(user_id) = request.user_id {
            self.repository.users.get_by_id(user_id).await?;
        }

        let (ticket, queue) = self
            .repository
            .tickets
            .create(
                &request,
                &institution,
                self.queue_config.reset_daily_counts,
                self.queue_config.default_average_service_time,
            )
            .await?;

        let people_ahead = (ticket.queue_position - 1) as i64;

        Ok(TicketStats {
            ticket_number: ticket.ticket_number,
            queue_position: ticket.queue_position,
            people_ahead,
            estimated_wait_time: estimate_wait(people_ahead, queue.average_service_time),
            institution_name: institution.name,
        })
    }

    /// Get a ticket with its institution
    pub async fn get_ticket(
        &self,
        ticket_number: &str,
        scope: &TicketScopeQuery,
    ) -> AppResult<TicketDetails> {
        let ticket = self.repository.tickets.get_by_number(ticket_number, scope).await?;
        let institution = self
            .repository
            .institutions
            .get_by_id(ticket.institution_id)
            .await?;

        Ok(TicketDetails { ticket, institution })
    }

    /// Current queue statistics for a ticket
    pub async fn get_stats(
        &self,
        ticket_number: &str,
        scope: &TicketScopeQuery,
    ) -> AppResult<TicketStats> {
        let ticket = self.repository.tickets.get_by_number(ticket_number, scope).await?;
        let institution = self
            .repository
            .institutions
            .get_by_id(ticket.institution_id)
            .await?;

        let people_ahead = self.repository.tickets.people_ahead(&ticket).await?;

        let average_service_time = self
            .repository
            .queues
            .get_for_scope(ticket.institution_id, ticket.service_id)
            .await?
            .map(|q| q.average_service_time)
            .unwrap_or(self.queue_config.default_average_service_time);

        Ok(TicketStats {
            ticket_number: ticket.ticket_number,
            queue_position: ticket.queue_position,
            people_ahead,
            estimated_wait_time: estimate_wait(people_ahead, average_service_time),
            institution_name: institution.name,
        })
    }

    /// Cancel a waiting ticket. Owned tickets may only be cancelled by their
    /// owner or an admin; anonymous tickets by anyone presenting the number.
    pub async fn cancel(
        &self,
        ticket_number: &str,
        scope: &TicketScopeQuery,
        actor: Option<&UserClaims>,
    ) -> AppResult<Ticket> {
        let ticket = self.repository.tickets.get_by_number(ticket_number, scope).await?;

        if let Some(owner_id) = ticket.user_id {
            let authorized = actor
                .map(|claims| claims.user_id == owner_id || claims.is_admin())
                .unwrap_or(false);
            if !authorized {
                return Err(AppError::Authorization(
                    "Only the ticket owner or an admin may cancel this ticket".to_string(),
                ));
            }
        }

        self.repository
            .tickets
            .transition(
                &ticket,
                TicketStatus::Cancelled,
                None,
                self.queue_config.default_average_service_time,
            )
            .await
    }

    /// Call the next waiting ticket for the operator's institution.
    /// An empty queue yields `None`, not an error.
    pub async fn call_next(
        &self,
        institution_id: i32,
        service_id: Option<i32>,
        claims: &UserClaims,
    ) -> AppResult<Option<Ticket>> {
        claims.require_operator_for(institution_id)?;
        self.repository.institutions.get_by_id(institution_id).await?;

        if let Some(id) = service_id {
            let service = self.repository.services.get_by_id(id).await?;
            if service.institution_id != institution_id {
                return Err(AppError::BadRequest(format!(
                    "Service {} does not belong to institution {}",
                    id, institution_id
                )));
            }
        }

        self.repository
            .tickets
            .call_next(
                institution_id,
                service_id,
                claims.user_id,
                self.queue_config.default_average_service_time,
            )
            .await
    }

    /// Move a called or in-service ticket to in_service, completed or missed
    pub async fn operator_transition(
        &self,
        ticket_number: &str,
        scope: &TicketScopeQuery,
        next: TicketStatus,
        claims: &UserClaims,
    ) -> AppResult<Ticket> {
        let ticket = self.repository.tickets.get_by_number(ticket_number, scope).await?;
        claims.require_operator_for(ticket.institution_id)?;

        self.repository
            .tickets
            .transition(
                &ticket,
                next,
                Some(claims.user_id),
                self.queue_config.default_average_service_time,
            )
            .await
    }

    /// Waiting tickets for an institution or one of its queues, in call order
    pub async fn list_waiting(
        &self,
        institution_id: i32,
        service_id: Option<i32>,
        claims: &UserClaims,
    ) -> AppResult<Vec<Ticket>> {
        claims.require_operator_for(institution_id)?;
        self.repository.institutions.get_by_id(institution_id).await?;

        self.repository.tickets.list_waiting(institution_id, service_id).await
    }

    /// Ticket history for a user, visible to the user and admins
    pub async fn user_history(
        &self,
        user_id: i32,
        limit: i64,
        claims: &UserClaims,
    ) -> AppResult<Vec<Ticket>> {
        if claims.user_id != user_id && !claims.is_admin() {
            return Err(AppError::Authorization(
                "Only the user or an admin may view this history".to_string(),
            ));
        }

        self.repository.users.get_by_id(user_id).await?;
        self.repository.tickets.list_for_user(user_id, limit).await
    }
}
