//! Ticket endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::{
    error::AppResult,
    models::ticket::{CreateTicket, Ticket, TicketDetails, TicketScopeQuery, TicketStats},
};

use super::{AuthenticatedUser, MaybeAuthenticatedUser};

/// Query parameters for ticket history
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct HistoryQuery {
    /// Maximum number of tickets to return (default: 10, max: 100)
    pub limit: Option<i64>,
}

/// Take a ticket for an institution's queue. Anonymous callers are welcome;
/// a signed-in citizen may attach the ticket to their account.
#[utoipa::path(
    post,
    path = "/tickets",
    tag = "tickets",
    request_body = CreateTicket,
    responses(
        (status = 201, description = "Ticket created", body = TicketStats),
        (status = 400, description = "Service does not belong to institution"),
        (status = 404, description = "Institution, service or user not found")
    )
)]
pub async fn create_ticket(
    State(state): State<crate::AppState>,
    Json(request): Json<CreateTicket>,
) -> AppResult<(StatusCode, Json<TicketStats>)> {
    let stats = state.services.tickets.create_ticket(request).await?;

    Ok((StatusCode::CREATED, Json(stats)))
}

/// Get a ticket by number
#[utoipa::path(
    get,
    path = "/tickets/{number}",
    tag = "tickets",
    params(
        ("number" = String, Path, description = "Ticket number, e.g. H001"),
        TicketScopeQuery
    ),
    responses(
        (status = 200, description = "Ticket with its institution", body = TicketDetails),
        (status = 404, description = "Ticket not found")
    )
)]
pub async fn get_ticket(
    State(state): State<crate::AppState>,
    Path(number): Path<String>,
    Query(scope): Query<TicketScopeQuery>,
) -> AppResult<Json<TicketDetails>> {
    let details = state.services.tickets.get_ticket(&number, &scope).await?;
    Ok(Json(details))
}

/// Get queue statistics for a ticket
#[utoipa::path(
    get,
    path = "/tickets/{number}/stats",
    tag = "tickets",
    params(
        ("number" = String, Path, description = "Ticket number, e.g. H001"),
        TicketScopeQuery
    ),
    responses(
        (status = 200, description = "Position, people ahead and estimated wait", body = TicketStats),
        (status = 404, description = "Ticket not found")
    )
)]
pub async fn get_ticket_stats(
    State(state): State<crate::AppState>,
    Path(number): Path<String>,
    Query(scope): Query<TicketScopeQuery>,
) -> AppResult<Json<TicketStats>> {
    let stats = state.services.tickets.get_stats(&number, &scope).await?;
    Ok(Json(stats))
}

/// Cancel a waiting ticket
#[utoipa::path(
    post,
    path = "/tickets/{number}/cancel",
    tag = "tickets",
    params(
        ("number" = String, Path, description = "Ticket number, e.g. H001"),
        TicketScopeQuery
    ),
    responses(
        (status = 200, description = "Ticket cancelled", body = Ticket),
        (status = 403, description = "Not the ticket owner"),
        (status = 404, description = "Ticket not found"),
        (status = 422, description = "Ticket is no longer waiting")
    )
)]
pub async fn cancel_ticket(
    State(state): State<crate::AppState>,
    MaybeAuthenticatedUser(claims): MaybeAuthenticatedUser,
    Path(number): Path<String>,
    Query(scope): Query<TicketScopeQuery>,
) -> AppResult<Json<Ticket>> {
    let ticket = state
        .services
        .tickets
        .cancel(&number, &scope, claims.as_ref())
        .await?;

    Ok(Json(ticket))
}

/// Ticket history for a user, most recent first
#[utoipa::path(
    get,
    path = "/users/{id}/tickets",
    tag = "tickets",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "User ID"),
        HistoryQuery
    ),
    responses(
        (status = 200, description = "User's tickets", body = Vec<Ticket>),
        (status = 403, description = "Not the user or an admin"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user_tickets(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(user_id): Path<i32>,
    Query(query): Query<HistoryQuery>,
) -> AppResult<Json<Vec<Ticket>>> {
    let limit = query.limit.unwrap_or(10).clamp(1, 100);

    let tickets = state
        .services
        .tickets
        .user_history(user_id, limit, &claims)
        .await?;

    Ok(Json(tickets))
}
