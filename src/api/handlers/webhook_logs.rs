use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    api::state::AppState,
    domain::{WebhookLogEntry, WebhookLogFilter, WebhookLogPage},
    error::{AppError, Result},
};

pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<WebhookLogFilter>,
) -> Result<Json<WebhookLogPage>> {
    let page = state.service_context.webhook_log_repo
        .list(&filter)
        .await?;

    Ok(Json(page))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<WebhookLogEntry>> {
    let entry = state.service_context.webhook_log_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Webhook log not found".to_string()))?;

    Ok(Json(entry))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    state.service_context.webhook_log_repo
        .delete(id)
        .await?;

    tracing::info!("Deleted webhook log {}", id);

    Ok(StatusCode::NO_CONTENT)
}
