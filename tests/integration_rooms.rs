#![cfg(feature = "integration-tests")]

mod common;

use axum::http::StatusCode;
use common::{admin_token, create_block, create_room, create_student, send, setup_test_app, unique_name};
use dormex_config::OccupancyPolicy;
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "./migrations")]
async fn test_room_fills_to_capacity(pool: PgPool) {
    let app = setup_test_app(pool.clone(), OccupancyPolicy::Detached);
    let token = admin_token(&app, &pool).await;

    let block_id = create_block(&app, &token, &unique_name("A")).await;
    let room_id = create_room(&app, &token, &block_id, "A-101", 2).await;
    create_student(&app, &token, "Alice", "R1").await;

    let increment = format!("/api/rooms/{}/occupancy/increment", room_id);
    for expected in 1..=2 {
        let (status, body) = send(&app, "POST", &increment, Some(&token), None).await;
        assert_eq!(status, StatusCode::OK, "{}", body);
        assert_eq!(body["data"]["current_occupancy"], expected);
    }

    let (status, body) = send(&app, "POST", &increment, Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_state");
    assert_eq!(body["message"], "Room is at full capacity");

    let (status, body) = send(&app, "GET", &format!("/api/rooms/{}", room_id), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "FULL");
    assert_eq!(body["data"]["available_slots"], 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_increment_then_decrement_restores_room(pool: PgPool) {
    let app = setup_test_app(pool.clone(), OccupancyPolicy::Detached);
    let token = admin_token(&app, &pool).await;

    let block_id = create_block(&app, &token, &unique_name("B")).await;
    let room_id = create_room(&app, &token, &block_id, "B-1", 3).await;

    send(&app, "POST", &format!("/api/rooms/{}/occupancy/increment", room_id), Some(&token), None).await;
    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/rooms/{}/occupancy/decrement", room_id),
        Some(&token),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["current_occupancy"], 0);
    assert_eq!(body["data"]["status"], "AVAILABLE");

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/rooms/{}/occupancy/decrement", room_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Room is already empty");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_capacity_below_occupancy_rejected(pool: PgPool) {
    let app = setup_test_app(pool.clone(), OccupancyPolicy::Detached);
    let token = admin_token(&app, &pool).await;

    let block_id = create_block(&app, &token, &unique_name("C")).await;
    let room_id = create_room(&app, &token, &block_id, "C-1", 3).await;
    let increment = format!("/api/rooms/{}/occupancy/increment", room_id);
    send(&app, "POST", &increment, Some(&token), None).await;
    send(&app, "POST", &increment, Some(&token), None).await;

    let uri = format!("/api/rooms/{}", room_id);
    let (status, _) = send(&app, "PUT", &uri, Some(&token), Some(json!({ "capacity": 1 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, "PUT", &uri, Some(&token), Some(json!({ "capacity": 2 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "FULL");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_room_number_in_block(pool: PgPool) {
    let app = setup_test_app(pool.clone(), OccupancyPolicy::Detached);
    let token = admin_token(&app, &pool).await;

    let block_id = create_block(&app, &token, &unique_name("D")).await;
    create_room(&app, &token, &block_id, "D-1", 2).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/rooms",
        Some(&token),
        Some(json!({ "block_id": block_id, "room_number": "D-1", "floor": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "conflict");
    assert_eq!(body["message"], "Room number already exists in this block");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_room_writes_require_admin(pool: PgPool) {
    let app = setup_test_app(pool.clone(), OccupancyPolicy::Detached);
    let token = admin_token(&app, &pool).await;

    let block_id = create_block(&app, &token, &unique_name("E")).await;
    let room_id = create_room(&app, &token, &block_id, "E-1", 2).await;
    let (_, student_email) = create_student(&app, &token, "Bob", "R-E1").await;
    let student_token = common::login(&app, &student_email, common::PASSWORD).await;

    let (status, _) = send(&app, "GET", "/api/rooms", Some(&student_token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/rooms/{}/occupancy/increment", room_id),
        Some(&student_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Access denied. Required role: ADMIN");

    let (status, _) = send(&app, "GET", "/api/rooms", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_releasing_maintenance_falls_back_to_occupancy(pool: PgPool) {
    let app = setup_test_app(pool.clone(), OccupancyPolicy::Detached);
    let token = admin_token(&app, &pool).await;

    let block_id = create_block(&app, &token, &unique_name("M")).await;
    let room_id = create_room(&app, &token, &block_id, "M-1", 2).await;
    send(&app, "POST", &format!("/api/rooms/{}/occupancy/increment", room_id), Some(&token), None).await;

    let uri = format!("/api/rooms/{}/status", room_id);
    let (status, body) = send(
        &app,
        "PATCH",
        &uri,
        Some(&token),
        Some(json!({ "status": "UNDER_MAINTENANCE" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["status"], "UNDER_MAINTENANCE");

    let (status, body) = send(&app, "GET", "/api/rooms/vacant", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].as_array().unwrap().is_empty());

    // Half-full room released with AVAILABLE reports what occupancy implies.
    let (status, body) = send(&app, "PATCH", &uri, Some(&token), Some(json!({ "status": "AVAILABLE" }))).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["status"], "OCCUPIED");
    assert_eq!(body["data"]["current_occupancy"], 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_concurrent_increments_on_last_slot(pool: PgPool) {
    let app = setup_test_app(pool.clone(), OccupancyPolicy::Detached);
    let token = admin_token(&app, &pool).await;

    let block_id = create_block(&app, &token, &unique_name("R")).await;
    let room_id = create_room(&app, &token, &block_id, "R-1", 2).await;
    let increment = format!("/api/rooms/{}/occupancy/increment", room_id);
    let (status, _) = send(&app, "POST", &increment, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (first, second) = tokio::join!(
        send(&app, "POST", &increment, Some(&token), None),
        send(&app, "POST", &increment, Some(&token), None),
    );

    let mut statuses = [first.0, second.0];
    statuses.sort();
    assert_eq!(statuses, [StatusCode::OK, StatusCode::BAD_REQUEST]);

    let rejected = if first.0 == StatusCode::OK { second.1 } else { first.1 };
    assert_eq!(rejected["error"], "invalid_state");
    assert_eq!(rejected["message"], "Room is at full capacity");

    let (_, body) = send(&app, "GET", &format!("/api/rooms/{}", room_id), Some(&token), None).await;
    assert_eq!(body["data"]["current_occupancy"], 2);
    assert_eq!(body["data"]["status"], "FULL");
}
