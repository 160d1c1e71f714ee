pub mod api;
pub mod auth;
pub mod config;
pub mod domain;
pub mod error;
pub mod payments;
pub mod repository;
pub mod service;

use std::sync::Arc;
use sqlx::SqlitePool;

use crate::{
    auth::ImpersonationService,
    config::Settings,
    repository::{
        SqliteEnrollmentRepository, SqlitePaymentRepository, SqliteProfileRepository,
        SqliteWebhookLogRepository,
    },
    service::ServiceContext,
};

/// Wires the SQLite repositories and services around one pool.
pub fn build_service_context(pool: SqlitePool, settings: &Settings) -> Arc<ServiceContext> {
    let payment_repo = Arc::new(SqlitePaymentRepository::new(pool.clone()));
    let enrollment_repo = Arc::new(SqliteEnrollmentRepository::new(pool.clone()));
    let webhook_log_repo = Arc::new(SqliteWebhookLogRepository::new(pool.clone()));
    let profile_repo = Arc::new(SqliteProfileRepository::new(pool));

    let impersonation_service = Arc::new(ImpersonationService::new(
        &settings.auth.jwt_secret,
        settings.auth.impersonation_ttl_minutes,
    ));

    Arc::new(ServiceContext::new(
        payment_repo,
        enrollment_repo,
        webhook_log_repo,
        profile_repo,
        impersonation_service,
    ))
}
