use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;

use dormex_core::{ApiResponse, AppError, DeletedResource, ErrorResponse};
use dormex_models::BlockId;

use crate::modules::blocks::model::{BlockResponse, CreateBlockDto, UpdateBlockDto};
use crate::modules::blocks::service::BlockService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Create a block
#[utoipa::path(
    post,
    path = "/api/blocks",
    request_body = CreateBlockDto,
    responses(
        (status = 201, description = "Block created", body = BlockResponse),
        (status = 400, description = "Validation error or duplicate name", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Blocks"
)]
#[instrument(skip(state, dto))]
pub async fn create_block(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateBlockDto>,
) -> Result<(StatusCode, Json<ApiResponse<BlockResponse>>), AppError> {
    let block = BlockService::create_block(&state.db, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message("Block created successfully", block.into())),
    ))
}

/// List all blocks
#[utoipa::path(
    get,
    path = "/api/blocks",
    responses(
        (status = 200, description = "All blocks with room counts", body = Vec<BlockResponse>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Blocks"
)]
#[instrument(skip(state))]
pub async fn get_all_blocks(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<BlockResponse>>>, AppError> {
    let blocks = BlockService::get_all_blocks(&state.db).await?;
    Ok(Json(ApiResponse::success(
        blocks.into_iter().map(BlockResponse::from).collect(),
    )))
}

/// List active blocks
#[utoipa::path(
    get,
    path = "/api/blocks/active",
    responses(
        (status = 200, description = "Active blocks", body = Vec<BlockResponse>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Blocks"
)]
#[instrument(skip(state))]
pub async fn get_active_blocks(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<BlockResponse>>>, AppError> {
    let blocks = BlockService::get_active_blocks(&state.db).await?;
    Ok(Json(ApiResponse::success(
        blocks.into_iter().map(BlockResponse::from).collect(),
    )))
}

/// Get a block by ID
#[utoipa::path(
    get,
    path = "/api/blocks/{id}",
    params(("id" = Uuid, Path, description = "Block ID")),
    responses(
        (status = 200, description = "Block details", body = BlockResponse),
        (status = 404, description = "Block not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Blocks"
)]
#[instrument(skip(state))]
pub async fn get_block(
    State(state): State<AppState>,
    Path(id): Path<BlockId>,
) -> Result<Json<ApiResponse<BlockResponse>>, AppError> {
    let block = BlockService::get_block(&state.db, id).await?;
    Ok(Json(ApiResponse::success(block.into())))
}

/// Update a block
#[utoipa::path(
    put,
    path = "/api/blocks/{id}",
    params(("id" = Uuid, Path, description = "Block ID")),
    request_body = UpdateBlockDto,
    responses(
        (status = 200, description = "Block updated", body = BlockResponse),
        (status = 400, description = "Validation error or duplicate name", body = ErrorResponse),
        (status = 404, description = "Block not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Blocks"
)]
#[instrument(skip(state, dto))]
pub async fn update_block(
    State(state): State<AppState>,
    Path(id): Path<BlockId>,
    ValidatedJson(dto): ValidatedJson<UpdateBlockDto>,
) -> Result<Json<ApiResponse<BlockResponse>>, AppError> {
    let block = BlockService::update_block(&state.db, id, dto).await?;
    Ok(Json(ApiResponse::with_message("Block updated successfully", block.into())))
}

/// Toggle a block's active flag
#[utoipa::path(
    patch,
    path = "/api/blocks/{id}/toggle-status",
    params(("id" = Uuid, Path, description = "Block ID")),
    responses(
        (status = 200, description = "Block status toggled", body = BlockResponse),
        (status = 404, description = "Block not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Blocks"
)]
#[instrument(skip(state))]
pub async fn toggle_block_status(
    State(state): State<AppState>,
    Path(id): Path<BlockId>,
) -> Result<Json<ApiResponse<BlockResponse>>, AppError> {
    let block = BlockService::toggle_block_status(&state.db, id).await?;
    Ok(Json(ApiResponse::with_message("Block status toggled", block.into())))
}

/// Delete an empty block
#[utoipa::path(
    delete,
    path = "/api/blocks/{id}",
    params(("id" = Uuid, Path, description = "Block ID")),
    responses(
        (status = 200, description = "Block deleted", body = DeletedResource),
        (status = 400, description = "Block still has rooms", body = ErrorResponse),
        (status = 404, description = "Block not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Blocks"
)]
#[instrument(skip(state))]
pub async fn delete_block(
    State(state): State<AppState>,
    Path(id): Path<BlockId>,
) -> Result<Json<ApiResponse<DeletedResource>>, AppError> {
    BlockService::delete_block(&state.db, id).await?;
    Ok(Json(ApiResponse::with_message(
        "Block deleted successfully",
        DeletedResource::new(id),
    )))
}
