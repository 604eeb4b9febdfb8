use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;

use dormex_core::{ApiResponse, AppError, DeletedResource, ErrorResponse};
use dormex_models::{BlockId, RoomId};

use crate::modules::rooms::model::{
    CreateRoomDto, RoomResponse, RoomWithBlock, UpdateRoomDto, UpdateRoomStatusDto,
};
use crate::modules::rooms::service::RoomService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

fn to_responses(rooms: Vec<RoomWithBlock>) -> Vec<RoomResponse> {
    rooms.into_iter().map(RoomResponse::from).collect()
}

/// Create a room
#[utoipa::path(
    post,
    path = "/api/rooms",
    request_body = CreateRoomDto,
    responses(
        (status = 201, description = "Room created", body = RoomResponse),
        (status = 400, description = "Validation error or duplicate room number", body = ErrorResponse),
        (status = 404, description = "Block not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Rooms"
)]
#[instrument(skip(state, dto))]
pub async fn create_room(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateRoomDto>,
) -> Result<(StatusCode, Json<ApiResponse<RoomResponse>>), AppError> {
    let room = RoomService::create_room(&state.db, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message("Room created successfully", room.into())),
    ))
}

/// List all rooms
#[utoipa::path(
    get,
    path = "/api/rooms",
    responses(
        (status = 200, description = "All rooms", body = Vec<RoomResponse>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Rooms"
)]
#[instrument(skip(state))]
pub async fn get_all_rooms(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<RoomResponse>>>, AppError> {
    let rooms = RoomService::get_all_rooms(&state.db).await?;
    Ok(Json(ApiResponse::success(to_responses(rooms))))
}

/// Get a room by ID
#[utoipa::path(
    get,
    path = "/api/rooms/{id}",
    params(("id" = Uuid, Path, description = "Room ID")),
    responses(
        (status = 200, description = "Room details", body = RoomResponse),
        (status = 404, description = "Room not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Rooms"
)]
#[instrument(skip(state))]
pub async fn get_room(
    State(state): State<AppState>,
    Path(id): Path<RoomId>,
) -> Result<Json<ApiResponse<RoomResponse>>, AppError> {
    let room = RoomService::get_room(&state.db, id).await?;
    Ok(Json(ApiResponse::success(room.into())))
}

/// List rooms in a block
#[utoipa::path(
    get,
    path = "/api/rooms/block/{block_id}",
    params(("block_id" = Uuid, Path, description = "Block ID")),
    responses(
        (status = 200, description = "Rooms in the block", body = Vec<RoomResponse>)
    ),
    security(("bearer_auth" = [])),
    tag = "Rooms"
)]
#[instrument(skip(state))]
pub async fn get_rooms_by_block(
    State(state): State<AppState>,
    Path(block_id): Path<BlockId>,
) -> Result<Json<ApiResponse<Vec<RoomResponse>>>, AppError> {
    let rooms = RoomService::get_rooms_by_block(&state.db, block_id).await?;
    Ok(Json(ApiResponse::success(to_responses(rooms))))
}

/// List rooms on one floor of a block
#[utoipa::path(
    get,
    path = "/api/rooms/block/{block_id}/floor/{floor}",
    params(
        ("block_id" = Uuid, Path, description = "Block ID"),
        ("floor" = i32, Path, description = "Floor number")
    ),
    responses(
        (status = 200, description = "Rooms on the floor", body = Vec<RoomResponse>)
    ),
    security(("bearer_auth" = [])),
    tag = "Rooms"
)]
#[instrument(skip(state))]
pub async fn get_rooms_by_floor(
    State(state): State<AppState>,
    Path((block_id, floor)): Path<(BlockId, i32)>,
) -> Result<Json<ApiResponse<Vec<RoomResponse>>>, AppError> {
    let rooms = RoomService::get_rooms_by_floor(&state.db, block_id, floor).await?;
    Ok(Json(ApiResponse::success(to_responses(rooms))))
}

/// List vacant rooms
#[utoipa::path(
    get,
    path = "/api/rooms/vacant",
    responses(
        (status = 200, description = "Empty rooms not under maintenance", body = Vec<RoomResponse>)
    ),
    security(("bearer_auth" = [])),
    tag = "Rooms"
)]
#[instrument(skip(state))]
pub async fn get_vacant_rooms(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<RoomResponse>>>, AppError> {
    let rooms = RoomService::get_vacant_rooms(&state.db).await?;
    Ok(Json(ApiResponse::success(to_responses(rooms))))
}

/// List vacant rooms in a block
#[utoipa::path(
    get,
    path = "/api/rooms/vacant/block/{block_id}",
    params(("block_id" = Uuid, Path, description = "Block ID")),
    responses(
        (status = 200, description = "Vacant rooms in the block", body = Vec<RoomResponse>)
    ),
    security(("bearer_auth" = [])),
    tag = "Rooms"
)]
#[instrument(skip(state))]
pub async fn get_vacant_rooms_by_block(
    State(state): State<AppState>,
    Path(block_id): Path<BlockId>,
) -> Result<Json<ApiResponse<Vec<RoomResponse>>>, AppError> {
    let rooms = RoomService::get_vacant_rooms_by_block(&state.db, block_id).await?;
    Ok(Json(ApiResponse::success(to_responses(rooms))))
}

/// Update a room
#[utoipa::path(
    put,
    path = "/api/rooms/{id}",
    params(("id" = Uuid, Path, description = "Room ID")),
    request_body = UpdateRoomDto,
    responses(
        (status = 200, description = "Room updated", body = RoomResponse),
        (status = 400, description = "Capacity below current occupancy", body = ErrorResponse),
        (status = 404, description = "Room not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Rooms"
)]
#[instrument(skip(state, dto))]
pub async fn update_room(
    State(state): State<AppState>,
    Path(id): Path<RoomId>,
    ValidatedJson(dto): ValidatedJson<UpdateRoomDto>,
) -> Result<Json<ApiResponse<RoomResponse>>, AppError> {
    let room = RoomService::update_room(&state.db, id, dto).await?;
    Ok(Json(ApiResponse::with_message("Room updated successfully", room.into())))
}

/// Set or clear the maintenance override
#[utoipa::path(
    patch,
    path = "/api/rooms/{id}/status",
    params(("id" = Uuid, Path, description = "Room ID")),
    request_body = UpdateRoomStatusDto,
    responses(
        (status = 200, description = "Room status updated", body = RoomResponse),
        (status = 400, description = "Unknown status value", body = ErrorResponse),
        (status = 404, description = "Room not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Rooms"
)]
#[instrument(skip(state, dto))]
pub async fn update_room_status(
    State(state): State<AppState>,
    Path(id): Path<RoomId>,
    ValidatedJson(dto): ValidatedJson<UpdateRoomStatusDto>,
) -> Result<Json<ApiResponse<RoomResponse>>, AppError> {
    let room = RoomService::update_room_status(&state.db, id, dto.status).await?;
    Ok(Json(ApiResponse::with_message("Room status updated", room.into())))
}

/// Add one occupant
#[utoipa::path(
    post,
    path = "/api/rooms/{id}/occupancy/increment",
    params(("id" = Uuid, Path, description = "Room ID")),
    responses(
        (status = 200, description = "Occupancy incremented", body = RoomResponse),
        (status = 400, description = "Room is at full capacity", body = ErrorResponse),
        (status = 404, description = "Room not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Rooms"
)]
#[instrument(skip(state))]
pub async fn increment_occupancy(
    State(state): State<AppState>,
    Path(id): Path<RoomId>,
) -> Result<Json<ApiResponse<RoomResponse>>, AppError> {
    let room = RoomService::increment_occupancy(&state.db, id).await?;
    Ok(Json(ApiResponse::with_message("Occupancy incremented", room.into())))
}

/// Remove one occupant
#[utoipa::path(
    post,
    path = "/api/rooms/{id}/occupancy/decrement",
    params(("id" = Uuid, Path, description = "Room ID")),
    responses(
        (status = 200, description = "Occupancy decremented", body = RoomResponse),
        (status = 400, description = "Room is already empty", body = ErrorResponse),
        (status = 404, description = "Room not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Rooms"
)]
#[instrument(skip(state))]
pub async fn decrement_occupancy(
    State(state): State<AppState>,
    Path(id): Path<RoomId>,
) -> Result<Json<ApiResponse<RoomResponse>>, AppError> {
    let room = RoomService::decrement_occupancy(&state.db, id).await?;
    Ok(Json(ApiResponse::with_message("Occupancy decremented", room.into())))
}

/// Delete an empty room
#[utoipa::path(
    delete,
    path = "/api/rooms/{id}",
    params(("id" = Uuid, Path, description = "Room ID")),
    responses(
        (status = 200, description = "Room deleted", body = DeletedResource),
        (status = 400, description = "Room has occupants", body = ErrorResponse),
        (status = 404, description = "Room not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Rooms"
)]
#[instrument(skip(state))]
pub async fn delete_room(
    State(state): State<AppState>,
    Path(id): Path<RoomId>,
) -> Result<Json<ApiResponse<DeletedResource>>, AppError> {
    RoomService::delete_room(&state.db, id).await?;
    Ok(Json(ApiResponse::with_message(
        "Room deleted successfully",
        DeletedResource::new(id),
    )))
}
