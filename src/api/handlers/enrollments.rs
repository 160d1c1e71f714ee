use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    api::state::AppState,
    domain::{CreateEnrollmentRequest, Enrollment, Payment},
    error::{AppError, Result},
};

#[derive(Debug, Serialize)]
pub struct EnrollmentDetail {
    #[serde(flatten)]
    pub enrollment: Enrollment,
    pub payments: Vec<Payment>,
}

pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<CreateEnrollmentRequest>,
) -> Result<(StatusCode, Json<Enrollment>)> {
    state.service_context.profile_repo
        .find_by_id(request.student_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Student not found".to_string()))?;

    let enrollment = state.service_context.enrollment_repo
        .create(request)
        .await
        .map_err(|e| match e {
            AppError::Database(msg) if msg.contains("UNIQUE") => {
                AppError::Conflict("Student is already enrolled in this offering".to_string())
            }
            _ => e,
        })?;

    Ok((StatusCode::CREATED, Json(enrollment)))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<EnrollmentDetail>> {
    let enrollment = state.service_context.enrollment_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Enrollment not found".to_string()))?;

    let payments = state.service_context.payment_repo
        .list_by_enrollment(id)
        .await?;

    Ok(Json(EnrollmentDetail { enrollment, payments }))
}
