use axum::{
    Json,
    extract::{Query, State},
};
use tracing::instrument;

use dormex_core::{ApiResponse, AppError};

use crate::modules::dashboard::model::{
    BlockOccupancy, ComplaintSummary, DashboardStats, RecentActivity, RecentActivityParams,
};
use crate::modules::dashboard::service::DashboardService;
use crate::state::AppState;

/// Headline counts and overall occupancy
#[utoipa::path(
    get,
    path = "/api/dashboard/stats",
    responses(
        (status = 200, description = "Dashboard statistics", body = DashboardStats)
    ),
    security(("bearer_auth" = [])),
    tag = "Dashboard"
)]
#[instrument(skip(state))]
pub async fn get_stats(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<DashboardStats>>, AppError> {
    let stats = DashboardService::get_stats(&state.db).await?;
    Ok(Json(ApiResponse::with_message("Dashboard stats retrieved", stats)))
}

/// Latest complaints and students
#[utoipa::path(
    get,
    path = "/api/dashboard/recent",
    params(RecentActivityParams),
    responses(
        (status = 200, description = "Recent activity", body = RecentActivity)
    ),
    security(("bearer_auth" = [])),
    tag = "Dashboard"
)]
#[instrument(skip(state))]
pub async fn get_recent_activity(
    State(state): State<AppState>,
    Query(params): Query<RecentActivityParams>,
) -> Result<Json<ApiResponse<RecentActivity>>, AppError> {
    let activity = DashboardService::get_recent_activity(&state.db, params.limit()).await?;
    Ok(Json(ApiResponse::with_message("Recent activity retrieved", activity)))
}

#[utoipa::path(
    get,
    path = "/api/dashboard/block-occupancy",
    responses(
        (status = 200, description = "Occupancy per active block", body = Vec<BlockOccupancy>)
    ),
    security(("bearer_auth" = [])),
    tag = "Dashboard"
)]
#[instrument(skip(state))]
pub async fn get_block_occupancy(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<BlockOccupancy>>>, AppError> {
    let occupancy = DashboardService::get_block_occupancy(&state.db).await?;
    Ok(Json(ApiResponse::with_message("Block occupancy retrieved", occupancy)))
}

#[utoipa::path(
    get,
    path = "/api/dashboard/complaint-summary",
    responses(
        (status = 200, description = "Complaint counts by status and category", body = ComplaintSummary)
    ),
    security(("bearer_auth" = [])),
    tag = "Dashboard"
)]
#[instrument(skip(state))]
pub async fn get_complaint_summary(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ComplaintSummary>>, AppError> {
    let summary = DashboardService::get_complaint_summary(&state.db).await?;
    Ok(Json(ApiResponse::with_message("Complaint summary retrieved", summary)))
}
