#![cfg(feature = "integration-tests")]

mod common;

use axum::Router;
use axum::http::StatusCode;
use common::{
    PASSWORD, admin_token, create_block, create_room, create_student, login, send, setup_test_app,
};
use dormex_config::OccupancyPolicy;
use serde_json::json;
use sqlx::PgPool;

async fn increment(app: &Router, token: &str, room_id: &str, times: usize) {
    let uri = format!("/api/rooms/{}/occupancy/increment", room_id);
    for _ in 0..times {
        let (status, body) = send(app, "POST", &uri, Some(token), None).await;
        assert_eq!(status, StatusCode::OK, "{}", body);
    }
}

async fn file_complaint(app: &Router, student_token: &str, title: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/complaints",
        Some(student_token),
        Some(json!({
            "category": "ELECTRICAL",
            "title": title,
            "description": "Lights flicker at night"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body["data"]["id"].as_str().unwrap().to_string()
}

async fn set_complaint_status(app: &Router, token: &str, complaint_id: &str, status: &str) {
    let (code, body) = send(
        app,
        "PATCH",
        &format!("/api/complaints/{}/status", complaint_id),
        Some(token),
        Some(json!({ "status": status })),
    )
    .await;
    assert_eq!(code, StatusCode::OK, "{}", body);
}

/// Block "North" (active): N-1 cap 2 with 1 occupant, N-2 cap 2 under
/// maintenance, N-3 cap 4 empty. Block "South" (inactive): S-1 cap 2, full.
async fn seed_layout(app: &Router, token: &str) {
    let north = create_block(app, token, "North").await;
    let n1 = create_room(app, token, &north, "N-1", 2).await;
    let n2 = create_room(app, token, &north, "N-2", 2).await;
    create_room(app, token, &north, "N-3", 4).await;
    increment(app, token, &n1, 1).await;

    let (status, _) = send(
        app,
        "PATCH",
        &format!("/api/rooms/{}/status", n2),
        Some(token),
        Some(json!({ "status": "UNDER_MAINTENANCE" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let south = create_block(app, token, "South").await;
    let s1 = create_room(app, token, &south, "S-1", 2).await;
    increment(app, token, &s1, 2).await;

    let (status, body) = send(
        app,
        "PATCH",
        &format!("/api/blocks/{}/toggle-status", south),
        Some(token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["active"], false);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_stats_counts_rooms_and_complaints(pool: PgPool) {
    let app = setup_test_app(pool.clone(), OccupancyPolicy::Detached);
    let token = admin_token(&app, &pool).await;
    seed_layout(&app, &token).await;

    let (_, email) = create_student(&app, &token, "Olivia", "R-DASH").await;
    let student_token = login(&app, &email, PASSWORD).await;
    let resolved = file_complaint(&app, &student_token, "Fuse blown").await;
    let closed = file_complaint(&app, &student_token, "Socket loose").await;
    file_complaint(&app, &student_token, "Bulb out").await;
    set_complaint_status(&app, &token, &resolved, "RESOLVED").await;
    set_complaint_status(&app, &token, &closed, "CLOSED").await;

    let (status, body) = send(&app, "GET", "/api/dashboard/stats", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    let stats = &body["data"];

    assert_eq!(stats["total_students"], 1);
    assert_eq!(stats["active_students"], 1);
    assert_eq!(stats["total_blocks"], 1);
    assert_eq!(stats["total_rooms"], 4);
    // N-3 only: N-2 is under maintenance.
    assert_eq!(stats["available_rooms"], 1);
    assert_eq!(stats["occupied_rooms"], 2);
    assert_eq!(stats["total_complaints"], 3);
    assert_eq!(stats["open_complaints"], 1);
    assert_eq!(stats["in_progress_complaints"], 0);
    assert_eq!(stats["resolved_complaints"], 2);
    // 3 occupants over 10 beds across every room.
    assert_eq!(stats["occupancy_rate"], 30.0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_stats_on_empty_hostel(pool: PgPool) {
    let app = setup_test_app(pool.clone(), OccupancyPolicy::Detached);
    let token = admin_token(&app, &pool).await;

    let (status, body) = send(&app, "GET", "/api/dashboard/stats", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total_rooms"], 0);
    assert_eq!(body["data"]["occupancy_rate"], 0.0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_block_occupancy_lists_active_blocks(pool: PgPool) {
    let app = setup_test_app(pool.clone(), OccupancyPolicy::Detached);
    let token = admin_token(&app, &pool).await;
    seed_layout(&app, &token).await;

    let (status, body) = send(&app, "GET", "/api/dashboard/block-occupancy", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK, "{}", body);

    let blocks = body["data"].as_array().unwrap();
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0]["block_name"], "North");
    assert_eq!(blocks[0]["total_rooms"], 3);
    assert_eq!(blocks[0]["total_capacity"], 8);
    assert_eq!(blocks[0]["current_occupancy"], 1);
    assert_eq!(blocks[0]["occupancy_rate"], 12.5);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_recent_activity_limit_is_clamped(pool: PgPool) {
    let app = setup_test_app(pool.clone(), OccupancyPolicy::Detached);
    let token = admin_token(&app, &pool).await;

    let (_, email) = create_student(&app, &token, "Peggy", "R-REC1").await;
    create_student(&app, &token, "Quinn", "R-REC2").await;
    let student_token = login(&app, &email, PASSWORD).await;
    for title in ["First", "Second", "Third"] {
        file_complaint(&app, &student_token, title).await;
    }

    let (status, body) = send(&app, "GET", "/api/dashboard/recent?limit=2", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    let complaints = body["data"]["recent_complaints"].as_array().unwrap();
    assert_eq!(complaints.len(), 2);
    assert_eq!(complaints[0]["title"], "Third");
    assert_eq!(body["data"]["recent_students"].as_array().unwrap().len(), 2);

    let (_, body) = send(&app, "GET", "/api/dashboard/recent?limit=0", Some(&token), None).await;
    assert_eq!(body["data"]["recent_complaints"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"]["recent_students"].as_array().unwrap().len(), 1);

    let (_, body) = send(&app, "GET", "/api/dashboard/recent?limit=500", Some(&token), None).await;
    assert_eq!(body["data"]["recent_complaints"].as_array().unwrap().len(), 3);

    let (_, body) = send(&app, "GET", "/api/dashboard/recent", Some(&token), None).await;
    assert_eq!(body["data"]["recent_complaints"].as_array().unwrap().len(), 3);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_dashboard_requires_admin(pool: PgPool) {
    let app = setup_test_app(pool.clone(), OccupancyPolicy::Detached);
    let token = admin_token(&app, &pool).await;
    let (_, email) = create_student(&app, &token, "Rupert", "R-DADM").await;
    let student_token = login(&app, &email, PASSWORD).await;

    let (status, _) = send(&app, "GET", "/api/dashboard/stats", Some(&student_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
