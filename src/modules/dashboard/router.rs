use axum::{Router, routing::get};

use crate::modules::dashboard::controller::{
    get_block_occupancy, get_complaint_summary, get_recent_activity, get_stats,
};
use crate::state::AppState;

pub fn init_dashboard_router() -> Router<AppState> {
    Router::new()
        .route("/stats", get(get_stats))
        .route("/recent", get(get_recent_activity))
        .route("/block-occupancy", get(get_block_occupancy))
        .route("/complaint-summary", get(get_complaint_summary))
}
