//! Operator desk endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::TicketStatus,
        ticket::{Ticket, TicketScopeQuery},
    },
};

use super::AuthenticatedUser;

/// Call-next request
#[derive(Deserialize, ToSchema)]
pub struct CallNextRequest {
    /// Institution whose queue to serve
    pub institution_id: i32,
    /// Service queue; omitted for the institution's general queue
    pub service_id: Option<i32>,
}

/// Response when an operator calls the next ticket. An empty queue is a
/// normal outcome: `ticket` is null and the message says so.
#[derive(Serialize, ToSchema)]
pub struct NextTicketResponse {
    pub ticket: Option<Ticket>,
    pub message: String,
}

/// Statistics for one operator's desk
#[derive(Serialize, ToSchema)]
pub struct OperatorStats {
    pub user_id: i32,
    pub name: String,
    pub tickets_served_today: i64,
    /// Mean call-to-completion time today, in minutes
    pub average_service_time: i64,
    pub current_ticket: Option<String>,
}

/// Call the next waiting ticket (operator/admin)
#[utoipa::path(
    post,
    path = "/operator/next",
    tag = "operator",
    security(("bearer_auth" = [])),
    request_body = CallNextRequest,
    responses(
        (status = 200, description = "Called ticket, or null when the queue is empty", body = NextTicketResponse),
        (status = 403, description = "Operator privileges required"),
        (status = 404, description = "Institution not found")
    )
)]
pub async fn call_next(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CallNextRequest>,
) -> AppResult<Json<NextTicketResponse>> {
    let called = state
        .services
        .tickets
        .call_next(request.institution_id, request.service_id, &claims)
        .await?;

    let message = match &called {
        Some(ticket) => format!("Ticket {} called", ticket.ticket_number),
        None => "No ticket waiting".to_string(),
    };

    Ok(Json(NextTicketResponse { ticket: called, message }))
}

/// Start serving a called ticket (operator/admin)
#[utoipa::path(
    post,
    path = "/operator/tickets/{number}/start",
    tag = "operator",
    security(("bearer_auth" = [])),
    params(
        ("number" = String, Path, description = "Ticket number, e.g. H001"),
        TicketScopeQuery
    ),
    responses(
        (status = 200, description = "Ticket in service", body = Ticket),
        (status = 403, description = "Ticket belongs to another institution"),
        (status = 404, description = "Ticket not found"),
        (status = 422, description = "Ticket is not in a callable state")
    )
)]
pub async fn start_ticket(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(number): Path<String>,
    Query(scope): Query<TicketScopeQuery>,
) -> AppResult<Json<Ticket>> {
    let ticket = state
        .services
        .tickets
        .operator_transition(&number, &scope, TicketStatus::InService, &claims)
        .await?;

    Ok(Json(ticket))
}

/// Complete a called or in-service ticket (operator/admin)
#[utoipa::path(
    post,
    path = "/operator/tickets/{number}/complete",
    tag = "operator",
    security(("bearer_auth" = [])),
    params(
        ("number" = String, Path, description = "Ticket number, e.g. H001"),
        TicketScopeQuery
    ),
    responses(
        (status = 200, description = "Ticket completed", body = Ticket),
        (status = 403, description = "Ticket belongs to another institution"),
        (status = 404, description = "Ticket not found"),
        (status = 422, description = "Ticket has not been called")
    )
)]
pub async fn complete_ticket(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(number): Path<String>,
    Query(scope): Query<TicketScopeQuery>,
) -> AppResult<Json<Ticket>> {
    let ticket = state
        .services
        .tickets
        .operator_transition(&number, &scope, TicketStatus::Completed, &claims)
        .await?;

    Ok(Json(ticket))
}

/// Mark a called or in-service ticket as missed (operator/admin)
#[utoipa::path(
    post,
    path = "/operator/tickets/{number}/miss",
    tag = "operator",
    security(("bearer_auth" = [])),
    params(
        ("number" = String, Path, description = "Ticket number, e.g. H001"),
        TicketScopeQuery
    ),
    responses(
        (status = 200, description = "Ticket marked missed", body = Ticket),
        (status = 403, description = "Ticket belongs to another institution"),
        (status = 404, description = "Ticket not found"),
        (status = 422, description = "Ticket has not been called")
    )
)]
pub async fn miss_ticket(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(number): Path<String>,
    Query(scope): Query<TicketScopeQuery>,
) -> AppResult<Json<Ticket>> {
    let ticket = state
        .services
        .tickets
        .operator_transition(&number, &scope, TicketStatus::Missed, &claims)
        .await?;

    Ok(Json(ticket))
}

/// Daily statistics for an operator (self or admin)
#[utoipa::path(
    get,
    path = "/operator/{id}/stats",
    tag = "operator",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Operator user ID")
    ),
    responses(
        (status = 200, description = "Operator statistics", body = OperatorStats),
        (status = 403, description = "Not the operator or an admin"),
        (status = 404, description = "Operator not found")
    )
)]
pub async fn get_operator_stats(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(operator_id): Path<i32>,
) -> AppResult<Json<OperatorStats>> {
    if claims.user_id != operator_id && !claims.is_admin() {
        return Err(AppError::Authorization(
            "Only the operator or an admin may view these statistics".to_string(),
        ));
    }

    let stats = state.services.stats.operator_stats(operator_id).await?;
    Ok(Json(stats))
}
