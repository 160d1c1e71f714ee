#![allow(dead_code)]

use std::{path::PathBuf, str::FromStr, sync::Arc, time::Duration};

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::Value;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
    SqlitePool,
};
use tower::ServiceExt;
use uuid::Uuid;

use tuition::{
    api,
    auth,
    build_service_context,
    config::Settings,
    domain::{CreateEnrollmentRequest, CreateProfileRequest, Enrollment, NewPayment, Payment, Profile, Role, BillingType},
    repository::{
        EnrollmentRepository, PaymentRepository, ProfileRepository,
        SqliteEnrollmentRepository, SqlitePaymentRepository, SqliteProfileRepository,
    },
    service::ServiceContext,
};

pub const ADMIN_TOKEN: &str = "test-admin-token";

/// Single-connection in-memory database so every query sees the same data.
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("connect in-memory sqlite");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("run migrations");

    pool
}

/// File-backed database behind several connections, so writers really
/// run at the same time. Remove the files with `remove_shared_pool`.
pub async fn shared_test_pool() -> (SqlitePool, PathBuf) {
    let path = std::env::temp_dir().join(format!("tuition-test-{}.db", Uuid::new_v4()));
    let options = SqliteConnectOptions::from_str(&format!("sqlite://{}", path.display()))
        .expect("sqlite path")
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(8)
        .connect_with(options)
        .await
        .expect("connect file sqlite");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("run migrations");

    (pool, path)
}

pub async fn remove_shared_pool(pool: SqlitePool, path: PathBuf) {
    pool.close().await;
    for suffix in ["", "-wal", "-shm"] {
        let mut file = path.clone().into_os_string();
        file.push(suffix);
        let _ = std::fs::remove_file(file);
    }
}

pub fn test_settings() -> Settings {
    let mut settings = Settings::default();
    settings.auth.admin_token = ADMIN_TOKEN.to_string();
    settings.auth.jwt_secret = "test-jwt-secret".to_string();
    settings
}

pub fn test_app(pool: SqlitePool) -> Router {
    app_with_settings(pool, test_settings())
}

pub fn app_with_settings(pool: SqlitePool, settings: Settings) -> Router {
    let context = build_service_context(pool, &settings);
    api::create_app(context, Arc::new(settings))
}

pub fn app_with_context(context: Arc<ServiceContext>, settings: Settings) -> Router {
    api::create_app(context, Arc::new(settings))
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.expect("request");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

pub fn post_webhook(payload: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/webhooks/asaas")
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-forwarded-for", "203.0.113.7, 10.0.0.1")
        .header(header::USER_AGENT, "gateway-test/1.0")
        .body(Body::from(payload.to_string()))
        .expect("build request")
}

pub fn admin_request(method: &str, uri: &str, body: Option<&Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", ADMIN_TOKEN))
        .header(header::CONTENT_TYPE, "application/json");

    match body {
        Some(json) => builder.body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("build request")
}

pub async fn create_student(pool: &SqlitePool, email: &str) -> Profile {
    SqliteProfileRepository::new(pool.clone())
        .create(CreateProfileRequest {
            email: email.to_string(),
            full_name: "Test Student".to_string(),
            role: Role::Student,
            phone: None,
            document: None,
            password_hash: auth::hash_password("password123").expect("hash"),
        })
        .await
        .expect("create profile")
}

/// A student with a pending enrollment paid for by `charge_id`.
pub async fn seed_pending_payment(pool: &SqlitePool, charge_id: &str) -> (Enrollment, Payment) {
    let student = create_student(pool, &format!("{}@example.com", charge_id)).await;

    let enrollment = SqliteEnrollmentRepository::new(pool.clone())
        .create(CreateEnrollmentRequest {
            student_id: student.id,
            course_offering_id: Uuid::new_v4(),
        })
        .await
        .expect("create enrollment");

    let payment = SqlitePaymentRepository::new(pool.clone())
        .upsert(NewPayment {
            gateway_payment_id: charge_id.to_string(),
            enrollment_id: Some(enrollment.id),
            customer_id: Some("cus_1".to_string()),
            value_cents: 29700,
            due_date: None,
            billing_type: BillingType::Pix,
            description: Some("Course".to_string()),
            invoice_url: None,
            installment_count: None,
        })
        .await
        .expect("register payment");

    (enrollment, payment)
}

pub async fn count_payments(pool: &SqlitePool, charge_id: &str) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM payments WHERE gateway_payment_id = ?")
        .bind(charge_id)
        .fetch_one(pool)
        .await
        .expect("count payments")
}
