#![cfg(feature = "integration-tests")]

mod common;

use axum::http::StatusCode;
use common::{admin_token, send, setup_test_app};
use dormex_config::OccupancyPolicy;
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "./migrations")]
async fn test_weekly_menu_has_seven_days(pool: PgPool) {
    let app = setup_test_app(pool.clone(), OccupancyPolicy::Detached);
    let token = admin_token(&app, &pool).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/menu",
        Some(&token),
        Some(json!({ "day_of_week": "MONDAY", "meal_type": "BREAKFAST", "items": "Idli, Dosa" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);

    let (status, body) = send(&app, "GET", "/api/menu/weekly", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let week = body["data"].as_array().unwrap();
    assert_eq!(week.len(), 7);
    assert_eq!(week[0]["day"], "MONDAY");
    assert_eq!(week[0]["meals"][0]["meal_type"], "BREAKFAST");
    assert_eq!(week[0]["meals"][0]["item_list"], json!(["Idli", "Dosa"]));
    assert!(week[1]["meals"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_day_and_meal_conflicts(pool: PgPool) {
    let app = setup_test_app(pool.clone(), OccupancyPolicy::Detached);
    let token = admin_token(&app, &pool).await;
    let menu = json!({ "day_of_week": "FRIDAY", "meal_type": "DINNER", "items": "Roti, Dal" });

    let (status, _) = send(&app, "POST", "/api/menu", Some(&token), Some(menu.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, "POST", "/api/menu", Some(&token), Some(menu)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Menu already exists for FRIDAY DINNER");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_by_day_and_meal_keeps_items_when_blank(pool: PgPool) {
    let app = setup_test_app(pool.clone(), OccupancyPolicy::Detached);
    let token = admin_token(&app, &pool).await;

    send(
        &app,
        "POST",
        "/api/menu",
        Some(&token),
        Some(json!({ "day_of_week": "SUNDAY", "meal_type": "LUNCH", "items": "Biryani" })),
    )
    .await;

    let (status, body) = send(
        &app,
        "PUT",
        "/api/menu/day/SUNDAY/meal/LUNCH",
        Some(&token),
        Some(json!({ "items": "  ", "special_note": "Festival" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["items"], "Biryani");
    assert_eq!(body["data"]["special_note"], "Festival");

    let (status, body) = send(&app, "GET", "/api/menu/day/SUNDAY/meal/DINNER", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Menu not found for SUNDAY DINNER");
}
