use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use validator::Validate;

use crate::{
    api::state::AppState,
    auth,
    domain::{CreateProfileRequest, Profile, Role},
    error::{AppError, Result},
};

/// Missing fields deserialize as empty so they fail validation (400)
/// rather than JSON extraction.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[serde(default)]
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Full name is required"))]
    pub full_name: String,
    #[serde(default)]
    pub role: Role,
    pub phone: Option<String>,
    pub document: Option<String>,
}

pub async fn create(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Profile>)> {
    // Malformed bodies and wrong field types are validation failures too
    let Json(request) = payload.map_err(|rejection| AppError::Validation(rejection.body_text()))?;
    request.validate()?;

    let email = request.email.trim().to_lowercase();
    if state.service_context.profile_repo.find_by_email(&email).await?.is_some() {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }

    let password_hash = auth::hash_password(&request.password)?;

    let profile = state.service_context.profile_repo
        .create(CreateProfileRequest {
            email,
            full_name: request.full_name.trim().to_string(),
            role: request.role,
            phone: request.phone,
            document: request.document,
            password_hash,
        })
        .await?;

    tracing::info!("Created {:?} profile {}", profile.role, profile.id);

    Ok((StatusCode::CREATED, Json(profile)))
}
