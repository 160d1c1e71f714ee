use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    api::state::AppState,
    domain::{NewPayment, Payment},
    error::{AppError, Result},
};

/// Registers a gateway charge. Repeating the call updates the same row.
pub async fn register(
    State(state): State<AppState>,
    Json(payment): Json<NewPayment>,
) -> Result<Json<Payment>> {
    if payment.gateway_payment_id.trim().is_empty() {
        return Err(AppError::BadRequest("gateway_payment_id is required".to_string()));
    }

    if let Some(enrollment_id) = payment.enrollment_id {
        state.service_context.enrollment_repo
            .find_by_id(enrollment_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Enrollment not found".to_string()))?;
    }

    let payment = state.service_context.reconciliation_service
        .register_charge(payment)
        .await?;

    Ok(Json(payment))
}

pub async fn get_by_gateway_id(
    State(state): State<AppState>,
    Path(gateway_payment_id): Path<String>,
) -> Result<Json<Payment>> {
    let payment = state.service_context.payment_repo
        .find_by_gateway_id(&gateway_payment_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Payment not found".to_string()))?;

    Ok(Json(payment))
}
