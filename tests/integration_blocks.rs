#![cfg(feature = "integration-tests")]

mod common;

use axum::http::StatusCode;
use common::{admin_token, create_block, create_room, send, setup_test_app, unique_name};
use dormex_config::OccupancyPolicy;
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_block_name_conflicts(pool: PgPool) {
    let app = setup_test_app(pool.clone(), OccupancyPolicy::Detached);
    let token = admin_token(&app, &pool).await;

    create_block(&app, &token, "B1").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/blocks",
        Some(&token),
        Some(json!({ "name": "B1" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "conflict");
    assert_eq!(body["message"], "Block name already exists");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_block_with_rooms_cannot_be_deleted(pool: PgPool) {
    let app = setup_test_app(pool.clone(), OccupancyPolicy::Detached);
    let token = admin_token(&app, &pool).await;

    let block_id = create_block(&app, &token, &unique_name("Block")).await;
    let room_id = create_room(&app, &token, &block_id, "101", 2).await;

    let block_uri = format!("/api/blocks/{}", block_id);
    let (status, body) = send(&app, "DELETE", &block_uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "conflict");
    assert_eq!(body["message"], "Cannot delete block with existing rooms");

    let (status, _) = send(&app, "DELETE", &format!("/api/rooms/{}", room_id), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, "DELETE", &block_uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], block_id.as_str());

    let (status, _) = send(&app, "GET", &block_uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_rename_to_existing_block_conflicts(pool: PgPool) {
    let app = setup_test_app(pool.clone(), OccupancyPolicy::Detached);
    let token = admin_token(&app, &pool).await;

    create_block(&app, &token, "North").await;
    let south = create_block(&app, &token, "South").await;

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/blocks/{}", south),
        Some(&token),
        Some(json!({ "name": "North" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_toggle_hides_block_from_active_list(pool: PgPool) {
    let app = setup_test_app(pool.clone(), OccupancyPolicy::Detached);
    let token = admin_token(&app, &pool).await;

    let block_id = create_block(&app, &token, &unique_name("T")).await;

    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/api/blocks/{}/toggle-status", block_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["active"], false);

    let (_, body) = send(&app, "GET", "/api/blocks/active", Some(&token), None).await;
    let active = body["data"].as_array().unwrap();
    assert!(active.iter().all(|b| b["id"] != block_id.as_str()));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_missing_block_name_is_validation_error(pool: PgPool) {
    let app = setup_test_app(pool.clone(), OccupancyPolicy::Detached);
    let token = admin_token(&app, &pool).await;

    let (status, body) = send(&app, "POST", "/api/blocks", Some(&token), Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_failed");
    assert!(body["fields"]["name"].is_array());
}
