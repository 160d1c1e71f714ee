use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::{
    api::state::AppState,
    auth::secrets_match,
    error::AppError,
};

pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

pub async fn require_admin(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if !state.settings.auth.is_configured() {
        tracing::error!("Admin token is unset or the placeholder; refusing admin requests");
        return Err(AppError::Unauthorized);
    }

    let token = bearer_token(request.headers()).ok_or(AppError::Unauthorized)?;

    if !secrets_match(token, &state.settings.auth.admin_token) {
        tracing::warn!("Rejected admin request with invalid token");
        return Err(AppError::Unauthorized);
    }

    Ok(next.run(request).await)
}
