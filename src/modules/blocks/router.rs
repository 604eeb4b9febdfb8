use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::modules::blocks::controller::{
    create_block, delete_block, get_active_blocks, get_all_blocks, get_block, toggle_block_status,
    update_block,
};
use crate::state::AppState;

pub fn init_blocks_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_block).get(get_all_blocks))
        .route("/active", get(get_active_blocks))
        .route("/{id}", get(get_block).put(update_block).delete(delete_block))
        .route("/{id}/toggle-status", patch(toggle_block_status))
}
