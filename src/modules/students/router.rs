use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::modules::students::controller::{
    assign_room, create_student, delete_student, get_all_students, get_student,
    get_student_by_roll_number, get_students_by_status, search_students, update_student,
    update_student_status, vacate_room,
};
use crate::state::AppState;

pub fn init_students_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_student).get(get_all_students))
        .route("/search", get(search_students))
        .route("/status/{status}", get(get_students_by_status))
        .route("/roll/{roll_number}", get(get_student_by_roll_number))
        .route(
            "/{id}",
            get(get_student).put(update_student).delete(delete_student),
        )
        .route("/{id}/status", patch(update_student_status))
        .route("/{id}/room", patch(assign_room).delete(vacate_room))
}
