#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use dormex::cli::create_admin;
use dormex::router::init_router;
use dormex::state::AppState;
use dormex_config::OccupancyPolicy;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

pub const PASSWORD: &str = "testpass123";

pub fn unique_email() -> String {
    format!("test_{}@example.com", Uuid::new_v4())
}

pub fn unique_name(prefix: &str) -> String {
    format!("{}-{}", prefix, &Uuid::new_v4().simple().to_string()[..8])
}

pub fn setup_test_app(pool: PgPool, policy: OccupancyPolicy) -> Router {
    dotenvy::dotenv().ok();
    let mut state = AppState::from_pool(pool).unwrap();
    state.occupancy_policy = policy;
    init_router(state)
}

/// Sends a request and returns the status with the parsed JSON body
/// (`Value::Null` for an empty body).
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }

    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, body)
}

pub async fn login(app: &Router, email: &str, password: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": email, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {}", body);
    body["data"]["access_token"].as_str().unwrap().to_string()
}

/// Creates an admin account and returns its access token.
pub async fn admin_token(app: &Router, pool: &PgPool) -> String {
    let email = unique_email();
    create_admin(pool, "Test Admin", &email, PASSWORD).await.unwrap();
    login(app, &email, PASSWORD).await
}

pub async fn create_block(app: &Router, token: &str, name: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/blocks",
        Some(token),
        Some(json!({ "name": name, "total_floors": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create block failed: {}", body);
    body["data"]["id"].as_str().unwrap().to_string()
}

pub async fn create_room(
    app: &Router,
    token: &str,
    block_id: &str,
    room_number: &str,
    capacity: i32,
) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/rooms",
        Some(token),
        Some(json!({
            "block_id": block_id,
            "room_number": room_number,
            "floor": 1,
            "capacity": capacity
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create room failed: {}", body);
    body["data"]["id"].as_str().unwrap().to_string()
}

/// Creates a student and returns `(student_id, email)`.
pub async fn create_student(
    app: &Router,
    token: &str,
    name: &str,
    roll_number: &str,
) -> (String, String) {
    let email = unique_email();
    let (status, body) = send(
        app,
        "POST",
        "/api/students",
        Some(token),
        Some(json!({
            "name": name,
            "email": email,
            "password": PASSWORD,
            "roll_number": roll_number
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create student failed: {}", body);
    (body["data"]["id"].as_str().unwrap().to_string(), email)
}
