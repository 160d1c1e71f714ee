mod support;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use serde_json::json;
use tuition::config::{Settings, PLACEHOLDER_SECRET};

use support::*;

#[tokio::test]
async fn test_admin_routes_require_token() {
    let pool = test_pool().await;
    let app = test_app(pool);

    let request = Request::builder()
        .method("GET")
        .uri("/admin/webhook-logs")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let request = Request::builder()
        .method("GET")
        .uri("/admin/webhook-logs")
        .header(header::AUTHORIZATION, "Bearer wrong-token")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(&app, admin_request("GET", "/admin/webhook-logs", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], json!(0));
}

#[tokio::test]
async fn test_placeholder_admin_token_is_refused() {
    let pool = test_pool().await;
    let app = app_with_settings(pool, Settings::default());

    let payload = json!({
        "email": "intruder@example.com",
        "password": "secret123",
        "full_name": "Intruder",
        "role": "admin",
    });
    let request = Request::builder()
        .method("POST")
        .uri("/admin/users")
        .header(header::AUTHORIZATION, format!("Bearer {}", PLACEHOLDER_SECRET))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_user() {
    let pool = test_pool().await;
    let app = test_app(pool);

    let payload = json!({
        "email": "Ana@Example.com",
        "password": "secret123",
        "full_name": "Ana Souza",
        "role": "student",
        "phone": "+55 11 99999-0000"
    });
    let (status, body) = send(&app, admin_request("POST", "/admin/users", Some(&payload))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["email"], json!("ana@example.com"));
    assert_eq!(body["role"], json!("student"));
    assert!(body.get("password_hash").is_none());

    let (status, _) = send(&app, admin_request("POST", "/admin/users", Some(&payload))).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_create_user_validation() {
    let pool = test_pool().await;
    let app = test_app(pool);

    let cases = [
        json!({ "email": "not-an-email", "password": "secret123", "full_name": "Ana" }),
        json!({ "email": "ana@example.com", "password": "123", "full_name": "Ana" }),
        json!({ "email": "ana@example.com", "password": "secret123" }),
        json!({ "email": "ana@example.com", "password": "secret123", "full_name": "Ana", "role": "superuser" }),
        json!({ "email": 42, "password": "secret123", "full_name": "Ana" }),
    ];

    for payload in cases {
        let (status, body) = send(&app, admin_request("POST", "/admin/users", Some(&payload))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", payload);
        assert!(body["error"].is_string());
    }

    let request = Request::builder()
        .method("POST")
        .uri("/admin/users")
        .header(header::AUTHORIZATION, format!("Bearer {}", ADMIN_TOKEN))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"email\":"))
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_impersonation_token_views_student() {
    let pool = test_pool().await;
    let student = create_student(&pool, "viewer@example.com").await;
    let app = test_app(pool);

    let payload = json!({ "profileId": student.id });
    let (status, body) = send(&app, admin_request("POST", "/admin/impersonate", Some(&payload))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["profile"]["id"], json!(student.id));
    assert!(body["expiresAt"].is_string());

    let token = body["token"].as_str().unwrap().to_string();
    let request = Request::builder()
        .method("GET")
        .uri("/api/me")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], json!("viewer@example.com"));

    let request = Request::builder()
        .method("GET")
        .uri("/api/me")
        .header(header::AUTHORIZATION, "Bearer not.a.token")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_impersonate_unknown_profile() {
    let pool = test_pool().await;
    let app = test_app(pool);

    let payload = json!({ "profileId": uuid::Uuid::new_v4() });
    let (status, _) = send(&app, admin_request("POST", "/admin/impersonate", Some(&payload))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_enrollment_and_charge_registration() {
    let pool = test_pool().await;
    let student = create_student(&pool, "buyer@example.com").await;
    let app = test_app(pool.clone());

    let offering = uuid::Uuid::new_v4();
    let payload = json!({ "student_id": student.id, "course_offering_id": offering });
    let (status, enrollment) = send(&app, admin_request("POST", "/admin/enrollments", Some(&payload))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(enrollment["status"], json!("Pending"));

    let (status, _) = send(&app, admin_request("POST", "/admin/enrollments", Some(&payload))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let charge = json!({
        "gateway_payment_id": "pay_reg",
        "enrollment_id": enrollment["id"],
        "value_cents": 19900,
        "billing_type": "BOLETO"
    });
    for _ in 0..2 {
        let (status, body) = send(&app, admin_request("POST", "/admin/payments", Some(&charge))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], json!("PENDING"));
        assert_eq!(body["billing_type"], json!("BOLETO"));
    }
    assert_eq!(count_payments(&pool, "pay_reg").await, 1);

    let uri = format!("/admin/enrollments/{}", enrollment["id"].as_str().unwrap());
    let (status, detail) = send(&app, admin_request("GET", &uri, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["payments"].as_array().unwrap().len(), 1);

    let (status, payment) = send(&app, admin_request("GET", "/admin/payments/pay_reg", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(payment["value_cents"], json!(19900));
    assert_eq!(payment["version"], json!(2));
}

#[tokio::test]
async fn test_webhook_log_admin_view() {
    let pool = test_pool().await;
    seed_pending_payment(&pool, "pay_123").await;
    let app = test_app(pool);

    let confirmed = json!({
        "event": "PAYMENT_CONFIRMED",
        "payment": { "id": "pay_123", "status": "CONFIRMED", "value": 297.00 }
    });
    let broken = json!({ "event": "PAYMENT_CREATED" });
    send(&app, post_webhook(&confirmed)).await;
    send(&app, post_webhook(&broken)).await;

    let (status, page) = send(&app, admin_request("GET", "/admin/webhook-logs?status=error", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], json!(1));
    assert_eq!(page["entries"][0]["event_type"], json!("PAYMENT_CREATED"));

    let (_, page) = send(&app, admin_request("GET", "/admin/webhook-logs?payment_id=pay_123", None)).await;
    assert_eq!(page["total"], json!(1));
    let id = page["entries"][0]["id"].as_str().unwrap().to_string();

    let uri = format!("/admin/webhook-logs/{}", id);
    let (status, entry) = send(&app, admin_request("GET", &uri, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(entry["processed"], json!(true));

    let (status, _) = send(&app, admin_request("DELETE", &uri, None)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, admin_request("GET", &uri, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
