use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::modules::complaints::controller::{
    create_complaint, delete_complaint, get_all_complaints, get_complaint,
    get_complaints_by_category, get_complaints_by_status, get_complaints_by_student,
    get_my_complaints, get_pending_complaints, update_complaint, update_complaint_status,
};
use crate::state::AppState;

pub fn init_complaints_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_complaint).get(get_all_complaints))
        .route("/my", get(get_my_complaints))
        .route("/pending", get(get_pending_complaints))
        .route("/student/{student_id}", get(get_complaints_by_student))
        .route("/status/{status}", get(get_complaints_by_status))
        .route("/category/{category}", get(get_complaints_by_category))
        .route(
            "/{id}",
            get(get_complaint)
                .put(update_complaint)
                .delete(delete_complaint),
        )
        .route("/{id}/status", patch(update_complaint_status))
}
