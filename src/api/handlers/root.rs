use axum::{http::StatusCode, Json, response::IntoResponse};
use serde_json::json;

pub async fn root() -> impl IntoResponse {
    Json(json!({
        "name": "Tuition API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Course payment reconciliation and enrollment service",
        "status": "operational",
        "endpoints": {
            "health": "/health",
            "webhook": "/webhooks/asaas",
            "admin": "/admin"
        }
    }))
}

pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    })))
}
