pub mod handlers;
pub mod middleware;
pub mod state;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    trace::TraceLayer,
};
use std::sync::Arc;

use crate::{
    config::Settings,
    service::ServiceContext,
};
use state::AppState;

pub fn create_app(
    service_context: Arc<ServiceContext>,
    settings: Arc<Settings>,
) -> Router {
    let app_state = AppState::new(service_context, settings);

    Router::new()
        // Root and health endpoints
        .route("/", get(handlers::root::root))
        .route("/health", get(handlers::root::health_check))

        // Impersonated "view as student" session
        .route("/api/me", get(handlers::impersonation::me))

        // Admin routes
        .nest("/admin", admin_routes(app_state.clone()))

        // Webhook routes answer CORS themselves, so they sit outside this layer
        .layer(CorsLayer::permissive())

        // Gateway webhooks (authenticated by the gateway's access token, if configured)
        .nest("/webhooks", webhook_routes())
        .route("/api/webhooks/payment", webhook_route())

        // Add state to the router
        .with_state(app_state)

        // Middleware
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
}

fn webhook_route() -> axum::routing::MethodRouter<AppState> {
    post(handlers::webhooks::receive)
        .options(handlers::webhooks::preflight)
        .fallback(handlers::webhooks::method_not_allowed)
}

fn webhook_routes() -> Router<AppState> {
    Router::new()
        .route("/asaas", webhook_route())
}

fn admin_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Webhook audit log
        .route("/webhook-logs", get(handlers::webhook_logs::list))
        .route(
            "/webhook-logs/:id",
            get(handlers::webhook_logs::get).delete(handlers::webhook_logs::delete),
        )
        // Charges and enrollments
        .route("/payments", post(handlers::payments::register))
        .route("/payments/:gateway_payment_id", get(handlers::payments::get_by_gateway_id))
        .route("/enrollments", post(handlers::enrollments::create))
        .route("/enrollments/:id", get(handlers::enrollments::get))
        // Accounts
        .route("/users", post(handlers::users::create))
        .route("/impersonate", post(handlers::impersonation::impersonate))
        .route_layer(axum::middleware::from_fn_with_state(
            state,
            middleware::auth::require_admin,
        ))
}
