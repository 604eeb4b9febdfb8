use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::modules::rooms::controller::{
    create_room, decrement_occupancy, delete_room, get_all_rooms, get_room, get_rooms_by_block,
    get_rooms_by_floor, get_vacant_rooms, get_vacant_rooms_by_block, increment_occupancy,
    update_room, update_room_status,
};
use crate::state::AppState;

pub fn init_rooms_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_room).get(get_all_rooms))
        .route("/vacant", get(get_vacant_rooms))
        .route("/vacant/block/{block_id}", get(get_vacant_rooms_by_block))
        .route("/block/{block_id}", get(get_rooms_by_block))
        .route("/block/{block_id}/floor/{floor}", get(get_rooms_by_floor))
        .route("/{id}", get(get_room).put(update_room).delete(delete_room))
        .route("/{id}/status", patch(update_room_status))
        .route("/{id}/occupancy/increment", post(increment_occupancy))
        .route("/{id}/occupancy/decrement", post(decrement_occupancy))
}
