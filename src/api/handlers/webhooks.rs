use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::{
    api::state::AppState,
    auth::secrets_match,
    payments::ACCESS_TOKEN_HEADER,
    service::RequestMeta,
};

const UNKNOWN_ORIGIN: &str = "unknown";

pub async fn receive(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if let Some(expected) = state.settings.gateway.webhook_token.as_deref() {
        let provided = headers
            .get(ACCESS_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();

        if !secrets_match(provided, expected) {
            tracing::warn!("Rejected webhook from {} with invalid access token", client_address(&headers));
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "success": false, "error": "Invalid access token" })),
            )
                .into_response();
        }
    }

    let meta = RequestMeta {
        source_ip: Some(client_address(&headers)),
        user_agent: headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    };

    match state.service_context.webhook_intake.receive(&body, meta).await {
        Ok(_) => (
            StatusCode::OK,
            cors_headers(),
            Json(json!({ "success": true, "message": "Webhook processed" })),
        )
            .into_response(),
        Err(failure) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            cors_headers(),
            Json(json!({ "success": false, "error": failure.error.to_string() })),
        )
            .into_response(),
    }
}

pub async fn preflight() -> impl IntoResponse {
    (StatusCode::OK, cors_headers())
}

pub async fn method_not_allowed() -> impl IntoResponse {
    (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
}

fn cors_headers() -> [(header::HeaderName, &'static str); 3] {
    [
        (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
        (header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type, asaas-access-token"),
        (header::ACCESS_CONTROL_ALLOW_METHODS, "POST, OPTIONS"),
    ]
}

/// Best-effort caller address from proxy headers.
pub fn client_address(headers: &HeaderMap) -> String {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    let real_ip = || {
        headers
            .get("x-real-ip")
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };

    forwarded
        .or_else(real_ip)
        .unwrap_or(UNKNOWN_ORIGIN)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_client_address_prefers_first_forwarded_hop() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("203.0.113.7, 10.0.0.1"));
        headers.insert("x-real-ip", HeaderValue::from_static("10.0.0.1"));
        assert_eq!(client_address(&headers), "203.0.113.7");
    }

    #[test]
    fn test_client_address_falls_back() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("198.51.100.2"));
        assert_eq!(client_address(&headers), "198.51.100.2");

        assert_eq!(client_address(&HeaderMap::new()), "unknown");
    }
}
