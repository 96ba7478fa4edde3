//! Admin statistics endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{error::AppResult, models::user::User};

use super::AuthenticatedUser;

/// System-wide counters for the admin dashboard
#[derive(Serialize, ToSchema)]
pub struct AdminStats {
    pub total_institutions: i64,
    pub total_users: i64,
    pub total_operators: i64,
    pub total_tickets_today: i64,
    pub tickets_waiting: i64,
    pub tickets_completed_today: i64,
    pub tickets_missed_today: i64,
    /// Mean creation-to-call delay today, in minutes
    pub average_wait_time: i64,
}

/// Get system-wide statistics (admin)
#[utoipa::path(
    get,
    path = "/admin/stats",
    tag = "admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "System statistics", body = AdminStats),
        (status = 403, description = "Admin privileges required")
    )
)]
pub async fn get_admin_stats(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<AdminStats>> {
    claims.require_admin()?;

    let stats = state.services.stats.admin_stats().await?;
    Ok(Json(stats))
}

/// List all active operators (admin)
#[utoipa::path(
    get,
    path = "/admin/operators",
    tag = "admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Active operators", body = Vec<User>),
        (status = 403, description = "Admin privileges required")
    )
)]
pub async fn list_operators(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<User>>> {
    claims.require_admin()?;

    let operators = state.services.stats.list_operators(None).await?;
    Ok(Json(operators))
}

/// List the active operators of one institution (admin)
#[utoipa::path(
    get,
    path = "/admin/institutions/{id}/operators",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Institution ID")
    ),
    responses(
        (status = 200, description = "Operators of the institution", body = Vec<User>),
        (status = 403, description = "Admin privileges required"),
        (status = 404, description = "Institution not found")
    )
)]
pub async fn list_institution_operators(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(institution_id): Path<i32>,
) -> AppResult<Json<Vec<User>>> {
    claims.require_admin()?;

    let operators = state
        .services
        .stats
        .list_operators(Some(institution_id))
        .await?;

    Ok(Json(operators))
}
