//! Institution and service catalog endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        institution::{CreateInstitution, Institution, InstitutionQuery, UpdateInstitution},
        service::{CreateService, Service},
        ticket::Ticket,
    },
};

use super::AuthenticatedUser;

/// Query parameters selecting one of an institution's queues
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct ServiceScopeQuery {
    /// Service queue; omitted for the institution's general queue
    pub service_id: Option<i32>,
}

/// List institutions
#[utoipa::path(
    get,
    path = "/institutions",
    tag = "institutions",
    params(InstitutionQuery),
    responses(
        (status = 200, description = "List of institutions", body = Vec<Institution>)
    )
)]
pub async fn list_institutions(
    State(state): State<crate::AppState>,
    Query(query): Query<InstitutionQuery>,
) -> AppResult<Json<Vec<Institution>>> {
    let institutions = state.services.institutions.list(&query).await?;
    Ok(Json(institutions))
}

/// Get institution details by ID
#[utoipa::path(
    get,
    path = "/institutions/{id}",
    tag = "institutions",
    params(
        ("id" = i32, Path, description = "Institution ID")
    ),
    responses(
        (status = 200, description = "Institution details", body = Institution),
        (status = 404, description = "Institution not found")
    )
)]
pub async fn get_institution(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Institution>> {
    let institution = state.services.institutions.get(id).await?;
    Ok(Json(institution))
}

/// Create a new institution (admin)
#[utoipa::path(
    post,
    path = "/institutions",
    tag = "institutions",
    security(("bearer_auth" = [])),
    request_body = CreateInstitution,
    responses(
        (status = 201, description = "Institution created", body = Institution),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Admin privileges required")
    )
)]
pub async fn create_institution(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreateInstitution>,
) -> AppResult<(StatusCode, Json<Institution>)> {
    claims.require_admin()?;

    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let institution = state.services.institutions.create(request).await?;

    Ok((StatusCode::CREATED, Json(institution)))
}

/// Update an institution (admin)
#[utoipa::path(
    put,
    path = "/institutions/{id}",
    tag = "institutions",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Institution ID")
    ),
    request_body = UpdateInstitution,
    responses(
        (status = 200, description = "Institution updated", body = Institution),
        (status = 403, description = "Admin privileges required"),
        (status = 404, description = "Institution not found")
    )
)]
pub async fn update_institution(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(request): Json<UpdateInstitution>,
) -> AppResult<Json<Institution>> {
    claims.require_admin()?;

    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let institution = state.services.institutions.update(id, request).await?;
    Ok(Json(institution))
}

/// List the services an institution offers
#[utoipa::path(
    get,
    path = "/institutions/{id}/services",
    tag = "institutions",
    params(
        ("id" = i32, Path, description = "Institution ID")
    ),
    responses(
        (status = 200, description = "Services of the institution", body = Vec<Service>),
        (status = 404, description = "Institution not found")
    )
)]
pub async fn list_services(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Vec<Service>>> {
    let services = state.services.institutions.list_services(id).await?;
    Ok(Json(services))
}

/// Create a service for an institution (admin)
#[utoipa::path(
    post,
    path = "/institutions/{id}/services",
    tag = "institutions",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Institution ID")
    ),
    request_body = CreateService,
    responses(
        (status = 201, description = "Service created", body = Service),
        (status = 403, description = "Admin privileges required"),
        (status = 404, description = "Institution not found")
    )
)]
pub async fn create_service(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(request): Json<CreateService>,
) -> AppResult<(StatusCode, Json<Service>)> {
    claims.require_admin()?;

    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let service = state.services.institutions.create_service(id, request).await?;

    Ok((StatusCode::CREATED, Json(service)))
}

/// List waiting tickets for an institution, in call order (operator/admin)
#[utoipa::path(
    get,
    path = "/institutions/{id}/tickets",
    tag = "institutions",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Institution ID"),
        ServiceScopeQuery
    ),
    responses(
        (status = 200, description = "Waiting tickets ordered by position", body = Vec<Ticket>),
        (status = 403, description = "Operator privileges required"),
        (status = 404, description = "Institution not found")
    )
)]
pub async fn list_waiting_tickets(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Query(query): Query<ServiceScopeQuery>,
) -> AppResult<Json<Vec<Ticket>>> {
    let tickets = state
        .services
        .tickets
        .list_waiting(id, query.service_id, &claims)
        .await?;

    Ok(Json(tickets))
}
