#![cfg(feature = "integration-tests")]

mod common;

use axum::http::StatusCode;
use common::{PASSWORD, admin_token, send, setup_test_app, unique_email};
use dormex_config::OccupancyPolicy;
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "./migrations")]
async fn test_register_login_refresh(pool: PgPool) {
    let app = setup_test_app(pool.clone(), OccupancyPolicy::Detached);
    let token = admin_token(&app, &pool).await;
    let email = unique_email();

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/register/admin",
        Some(&token),
        Some(json!({ "name": "Second Admin", "email": email, "password": PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["data"]["user"]["role"], "ADMIN");

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": email, "password": PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["token_type"], "Bearer");
    let refresh_token = body["data"]["refresh_token"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/refresh",
        None,
        Some(json!({ "refresh_token": refresh_token })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["access_token"].is_string());

    let me_token = body["data"]["access_token"].as_str().unwrap();
    let (status, body) = send(&app, "GET", "/api/users/me", Some(me_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], email.as_str());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_email_and_bad_password(pool: PgPool) {
    let app = setup_test_app(pool.clone(), OccupancyPolicy::Detached);
    let token = admin_token(&app, &pool).await;
    let email = unique_email();
    let register = json!({ "name": "Student One", "email": email, "password": PASSWORD });

    let (status, _) = send(&app, "POST", "/api/auth/register", Some(&token), Some(register.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, "POST", "/api/auth/register", Some(&token), Some(register)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Email already registered");

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": email, "password": "wrong-password" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid email or password");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_register_requires_admin(pool: PgPool) {
    let app = setup_test_app(pool.clone(), OccupancyPolicy::Detached);

    let (status, _) = send(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({ "name": "Nobody", "email": unique_email(), "password": PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_default_admin_bootstrap_is_idempotent(pool: PgPool) {
    let config = dormex_config::AdminConfig {
        email: unique_email(),
        name: "Bootstrap Admin".to_string(),
        password: Some(PASSWORD.to_string()),
    };

    dormex::cli::ensure_default_admin(&pool, &config).await.unwrap();
    dormex::cli::ensure_default_admin(&pool, &config).await.unwrap();

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = $1")
        .bind(&config.email)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}
