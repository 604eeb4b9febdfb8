use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;

use dormex_core::{ApiResponse, AppError, DeletedResource, ErrorResponse};
use dormex_models::{ComplaintId, StudentId};

use crate::middleware::auth::AuthUser;
use crate::modules::complaints::model::{
    ComplaintCategory, ComplaintRecord, ComplaintResponse, ComplaintStatus, CreateComplaintDto,
    UpdateComplaintDto, UpdateComplaintStatusDto,
};
use crate::modules::complaints::service::ComplaintService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

fn to_responses(complaints: Vec<ComplaintRecord>) -> Vec<ComplaintResponse> {
    complaints.into_iter().map(ComplaintResponse::from).collect()
}

/// File a complaint as the signed-in student
#[utoipa::path(
    post,
    path = "/api/complaints",
    request_body = CreateComplaintDto,
    responses(
        (status = 201, description = "Complaint filed", body = ComplaintResponse),
        (status = 400, description = "Validation error or no student profile", body = ErrorResponse),
        (status = 403, description = "Student role required", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Complaints"
)]
#[instrument(skip(state, auth_user, dto), fields(user_id = %auth_user.user_id()))]
pub async fn create_complaint(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateComplaintDto>,
) -> Result<(StatusCode, Json<ApiResponse<ComplaintResponse>>), AppError> {
    let complaint =
        ComplaintService::create_complaint(&state.db, auth_user.user_id(), dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "Complaint submitted successfully",
            complaint.into(),
        )),
    ))
}

/// List the signed-in student's complaints
#[utoipa::path(
    get,
    path = "/api/complaints/my",
    responses(
        (status = 200, description = "Own complaints, newest first", body = Vec<ComplaintResponse>),
        (status = 400, description = "No student profile", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Complaints"
)]
#[instrument(skip(state, auth_user))]
pub async fn get_my_complaints(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<ApiResponse<Vec<ComplaintResponse>>>, AppError> {
    let complaints = ComplaintService::get_my_complaints(&state.db, auth_user.user_id()).await?;
    Ok(Json(ApiResponse::success(to_responses(complaints))))
}

/// List all complaints
#[utoipa::path(
    get,
    path = "/api/complaints",
    responses(
        (status = 200, description = "All complaints, newest first", body = Vec<ComplaintResponse>)
    ),
    security(("bearer_auth" = [])),
    tag = "Complaints"
)]
#[instrument(skip(state))]
pub async fn get_all_complaints(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<ComplaintResponse>>>, AppError> {
    let complaints = ComplaintService::get_all_complaints(&state.db).await?;
    Ok(Json(ApiResponse::success(to_responses(complaints))))
}

/// List complaints still awaiting resolution
#[utoipa::path(
    get,
    path = "/api/complaints/pending",
    responses(
        (status = 200, description = "OPEN and IN_PROGRESS complaints, oldest first", body = Vec<ComplaintResponse>)
    ),
    security(("bearer_auth" = [])),
    tag = "Complaints"
)]
#[instrument(skip(state))]
pub async fn get_pending_complaints(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<ComplaintResponse>>>, AppError> {
    let complaints = ComplaintService::get_pending_complaints(&state.db).await?;
    Ok(Json(ApiResponse::success(to_responses(complaints))))
}

#[utoipa::path(
    get,
    path = "/api/complaints/student/{student_id}",
    params(("student_id" = Uuid, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Complaints filed by the student", body = Vec<ComplaintResponse>)
    ),
    security(("bearer_auth" = [])),
    tag = "Complaints"
)]
#[instrument(skip(state))]
pub async fn get_complaints_by_student(
    State(state): State<AppState>,
    Path(student_id): Path<StudentId>,
) -> Result<Json<ApiResponse<Vec<ComplaintResponse>>>, AppError> {
    let complaints = ComplaintService::get_complaints_by_student(&state.db, student_id).await?;
    Ok(Json(ApiResponse::success(to_responses(complaints))))
}

#[utoipa::path(
    get,
    path = "/api/complaints/status/{status}",
    params(("status" = ComplaintStatus, Path, description = "Complaint status")),
    responses(
        (status = 200, description = "Complaints with the status", body = Vec<ComplaintResponse>)
    ),
    security(("bearer_auth" = [])),
    tag = "Complaints"
)]
#[instrument(skip(state))]
pub async fn get_complaints_by_status(
    State(state): State<AppState>,
    Path(status): Path<ComplaintStatus>,
) -> Result<Json<ApiResponse<Vec<ComplaintResponse>>>, AppError> {
    let complaints = ComplaintService::get_complaints_by_status(&state.db, status).await?;
    Ok(Json(ApiResponse::success(to_responses(complaints))))
}

#[utoipa::path(
    get,
    path = "/api/complaints/category/{category}",
    params(("category" = ComplaintCategory, Path, description = "Complaint category")),
    responses(
        (status = 200, description = "Complaints in the category", body = Vec<ComplaintResponse>)
    ),
    security(("bearer_auth" = [])),
    tag = "Complaints"
)]
#[instrument(skip(state))]
pub async fn get_complaints_by_category(
    State(state): State<AppState>,
    Path(category): Path<ComplaintCategory>,
) -> Result<Json<ApiResponse<Vec<ComplaintResponse>>>, AppError> {
    let complaints = ComplaintService::get_complaints_by_category(&state.db, category).await?;
    Ok(Json(ApiResponse::success(to_responses(complaints))))
}

/// Get a complaint by ID
///
/// Students can only read complaints they filed.
#[utoipa::path(
    get,
    path = "/api/complaints/{id}",
    params(("id" = Uuid, Path, description = "Complaint ID")),
    responses(
        (status = 200, description = "Complaint details", body = ComplaintResponse),
        (status = 403, description = "Complaint belongs to another student", body = ErrorResponse),
        (status = 404, description = "Complaint not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Complaints"
)]
#[instrument(skip(state, auth_user))]
pub async fn get_complaint(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<ComplaintId>,
) -> Result<Json<ApiResponse<ComplaintResponse>>, AppError> {
    let viewer = (!auth_user.is_admin()).then(|| auth_user.user_id());
    let complaint = ComplaintService::get_complaint(&state.db, id, viewer).await?;
    Ok(Json(ApiResponse::success(complaint.into())))
}

/// Update status, remarks or assignee
#[utoipa::path(
    put,
    path = "/api/complaints/{id}",
    params(("id" = Uuid, Path, description = "Complaint ID")),
    request_body = UpdateComplaintDto,
    responses(
        (status = 200, description = "Complaint updated", body = ComplaintResponse),
        (status = 404, description = "Complaint or assignee not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Complaints"
)]
#[instrument(skip(state, dto))]
pub async fn update_complaint(
    State(state): State<AppState>,
    Path(id): Path<ComplaintId>,
    ValidatedJson(dto): ValidatedJson<UpdateComplaintDto>,
) -> Result<Json<ApiResponse<ComplaintResponse>>, AppError> {
    let complaint = ComplaintService::update_complaint(&state.db, id, dto).await?;
    Ok(Json(ApiResponse::with_message(
        "Complaint updated successfully",
        complaint.into(),
    )))
}

#[utoipa::path(
    patch,
    path = "/api/complaints/{id}/status",
    params(("id" = Uuid, Path, description = "Complaint ID")),
    request_body = UpdateComplaintStatusDto,
    responses(
        (status = 200, description = "Status updated", body = ComplaintResponse),
        (status = 404, description = "Complaint not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Complaints"
)]
#[instrument(skip(state, dto))]
pub async fn update_complaint_status(
    State(state): State<AppState>,
    Path(id): Path<ComplaintId>,
    ValidatedJson(dto): ValidatedJson<UpdateComplaintStatusDto>,
) -> Result<Json<ApiResponse<ComplaintResponse>>, AppError> {
    let complaint = ComplaintService::update_status(&state.db, id, dto).await?;
    Ok(Json(ApiResponse::with_message(
        "Complaint status updated",
        complaint.into(),
    )))
}

#[utoipa::path(
    delete,
    path = "/api/complaints/{id}",
    params(("id" = Uuid, Path, description = "Complaint ID")),
    responses(
        (status = 200, description = "Complaint deleted", body = DeletedResource),
        (status = 404, description = "Complaint not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Complaints"
)]
#[instrument(skip(state))]
pub async fn delete_complaint(
    State(state): State<AppState>,
    Path(id): Path<ComplaintId>,
) -> Result<Json<ApiResponse<DeletedResource>>, AppError> {
    ComplaintService::delete_complaint(&state.db, id).await?;
    Ok(Json(ApiResponse::with_message(
        "Complaint deleted successfully",
        DeletedResource::new(id),
    )))
}
