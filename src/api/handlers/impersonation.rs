use axum::{
    extract::State,
    http::HeaderMap,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    api::{middleware::auth::bearer_token, state::AppState},
    auth::ImpersonationToken,
    domain::Profile,
    error::{AppError, Result},
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpersonateRequest {
    pub profile_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct ImpersonateResponse {
    #[serde(flatten)]
    pub token: ImpersonationToken,
    pub profile: Profile,
}

pub async fn impersonate(
    State(state): State<AppState>,
    Json(request): Json<ImpersonateRequest>,
) -> Result<Json<ImpersonateResponse>> {
    let profile = state.service_context.profile_repo
        .find_by_id(request.profile_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))?;

    let token = state.service_context.impersonation_service.issue(profile.id)?;

    tracing::info!("Issued impersonation token for profile {} until {}", profile.id, token.expires_at);

    Ok(Json(ImpersonateResponse { token, profile }))
}

/// Resolves an impersonation token to the profile it grants a view of.
pub async fn me(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Profile>> {
    let token = bearer_token(&headers).ok_or(AppError::Unauthorized)?;
    let claims = state.service_context.impersonation_service.verify(token)?;

    let profile = state.service_context.profile_repo
        .find_by_id(claims.sub)
        .await?
        .ok_or(AppError::Unauthorized)?;

    Ok(Json(profile))
}
