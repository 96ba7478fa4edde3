//! Queue status endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::{error::AppResult, models::queue::QueueInfo};

use super::institutions::ServiceScopeQuery;

/// Queue summary for an institution: current called number, people waiting
/// and the estimated wait for a newcomer.
#[utoipa::path(
    get,
    path = "/queues/{institution_id}",
    tag = "queues",
    params(
        ("institution_id" = i32, Path, description = "Institution ID"),
        ServiceScopeQuery
    ),
    responses(
        (status = 200, description = "Queue summary", body = QueueInfo),
        (status = 404, description = "Institution not found")
    )
)]
pub async fn get_queue_info(
    State(state): State<crate::AppState>,
    Path(institution_id): Path<i32>,
    Query(query): Query<ServiceScopeQuery>,
) -> AppResult<Json<QueueInfo>> {
    let info = state
        .services
        .queues
        .queue_info(institution_id, query.service_id)
        .await?;

    Ok(Json(info))
}
