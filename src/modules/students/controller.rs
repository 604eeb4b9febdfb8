use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;

use dormex_core::{ApiResponse, AppError, DeletedResource, ErrorResponse};
use dormex_models::StudentId;

use crate::modules::students::model::{
    AssignRoomDto, CreateStudentDto, StudentRecord, StudentResponse, StudentSearchParams,
    StudentStatus, UpdateStudentDto, UpdateStudentStatusDto,
};
use crate::modules::students::service::StudentService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

fn to_responses(students: Vec<StudentRecord>) -> Vec<StudentResponse> {
    students.into_iter().map(StudentResponse::from).collect()
}

/// Create a student with a login account
#[utoipa::path(
    post,
    path = "/api/students",
    request_body = CreateStudentDto,
    responses(
        (status = 201, description = "Student created", body = StudentResponse),
        (status = 400, description = "Validation error, email or roll number taken", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state, dto))]
pub async fn create_student(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateStudentDto>,
) -> Result<(StatusCode, Json<ApiResponse<StudentResponse>>), AppError> {
    let student = StudentService::create_student(&state.db, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "Student created successfully",
            student.into(),
        )),
    ))
}

/// List all students
#[utoipa::path(
    get,
    path = "/api/students",
    responses(
        (status = 200, description = "All students, newest first", body = Vec<StudentResponse>),
        (status = 403, description = "Admin role required", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state))]
pub async fn get_all_students(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<StudentResponse>>>, AppError> {
    let students = StudentService::get_all_students(&state.db).await?;
    Ok(Json(ApiResponse::success(to_responses(students))))
}

/// Get a student by ID
#[utoipa::path(
    get,
    path = "/api/students/{id}",
    params(("id" = Uuid, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student details", body = StudentResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state))]
pub async fn get_student(
    State(state): State<AppState>,
    Path(id): Path<StudentId>,
) -> Result<Json<ApiResponse<StudentResponse>>, AppError> {
    let student = StudentService::get_student(&state.db, id).await?;
    Ok(Json(ApiResponse::success(student.into())))
}

/// Get a student by roll number
#[utoipa::path(
    get,
    path = "/api/students/roll/{roll_number}",
    params(("roll_number" = String, Path, description = "Roll number")),
    responses(
        (status = 200, description = "Student details", body = StudentResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state))]
pub async fn get_student_by_roll_number(
    State(state): State<AppState>,
    Path(roll_number): Path<String>,
) -> Result<Json<ApiResponse<StudentResponse>>, AppError> {
    let student = StudentService::get_student_by_roll_number(&state.db, &roll_number).await?;
    Ok(Json(ApiResponse::success(student.into())))
}

/// Search students by name or roll number
#[utoipa::path(
    get,
    path = "/api/students/search",
    params(StudentSearchParams),
    responses(
        (status = 200, description = "Matching students", body = Vec<StudentResponse>)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state))]
pub async fn search_students(
    State(state): State<AppState>,
    Query(params): Query<StudentSearchParams>,
) -> Result<Json<ApiResponse<Vec<StudentResponse>>>, AppError> {
    let students = StudentService::search_students(&state.db, &params.keyword).await?;
    Ok(Json(ApiResponse::success(to_responses(students))))
}

/// List students with a given status
#[utoipa::path(
    get,
    path = "/api/students/status/{status}",
    params(("status" = StudentStatus, Path, description = "Student status")),
    responses(
        (status = 200, description = "Students with the status", body = Vec<StudentResponse>)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state))]
pub async fn get_students_by_status(
    State(state): State<AppState>,
    Path(status): Path<StudentStatus>,
) -> Result<Json<ApiResponse<Vec<StudentResponse>>>, AppError> {
    let students = StudentService::get_students_by_status(&state.db, status).await?;
    Ok(Json(ApiResponse::success(to_responses(students))))
}

/// Update a student's profile
#[utoipa::path(
    put,
    path = "/api/students/{id}",
    params(("id" = Uuid, Path, description = "Student ID")),
    request_body = UpdateStudentDto,
    responses(
        (status = 200, description = "Student updated", body = StudentResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state, dto))]
pub async fn update_student(
    State(state): State<AppState>,
    Path(id): Path<StudentId>,
    ValidatedJson(dto): ValidatedJson<UpdateStudentDto>,
) -> Result<Json<ApiResponse<StudentResponse>>, AppError> {
    let student = StudentService::update_student(&state.db, id, dto).await?;
    Ok(Json(ApiResponse::with_message(
        "Student updated successfully",
        student.into(),
    )))
}

/// Change a student's status
#[utoipa::path(
    patch,
    path = "/api/students/{id}/status",
    params(("id" = Uuid, Path, description = "Student ID")),
    request_body = UpdateStudentStatusDto,
    responses(
        (status = 200, description = "Status updated", body = StudentResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state, dto))]
pub async fn update_student_status(
    State(state): State<AppState>,
    Path(id): Path<StudentId>,
    ValidatedJson(dto): ValidatedJson<UpdateStudentStatusDto>,
) -> Result<Json<ApiResponse<StudentResponse>>, AppError> {
    let student =
        StudentService::update_status(&state.db, state.occupancy_policy, id, dto.status).await?;
    Ok(Json(ApiResponse::with_message(
        "Student status updated",
        student.into(),
    )))
}

/// Assign a room to an active student
#[utoipa::path(
    patch,
    path = "/api/students/{id}/room",
    params(("id" = Uuid, Path, description = "Student ID")),
    request_body = AssignRoomDto,
    responses(
        (status = 200, description = "Room assigned", body = StudentResponse),
        (status = 400, description = "Student is not active or room is full", body = ErrorResponse),
        (status = 404, description = "Student or room not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state, dto))]
pub async fn assign_room(
    State(state): State<AppState>,
    Path(id): Path<StudentId>,
    ValidatedJson(dto): ValidatedJson<AssignRoomDto>,
) -> Result<Json<ApiResponse<StudentResponse>>, AppError> {
    let student =
        StudentService::assign_room(&state.db, state.occupancy_policy, id, dto.room_id).await?;
    Ok(Json(ApiResponse::with_message(
        "Room assigned successfully",
        student.into(),
    )))
}

/// Remove a student's room assignment
#[utoipa::path(
    delete,
    path = "/api/students/{id}/room",
    params(("id" = Uuid, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Room vacated", body = StudentResponse),
        (status = 400, description = "Student has no room assigned", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state))]
pub async fn vacate_room(
    State(state): State<AppState>,
    Path(id): Path<StudentId>,
) -> Result<Json<ApiResponse<StudentResponse>>, AppError> {
    let student = StudentService::vacate_room(&state.db, state.occupancy_policy, id).await?;
    Ok(Json(ApiResponse::with_message(
        "Room vacated successfully",
        student.into(),
    )))
}

/// Delete a student and disable their account
#[utoipa::path(
    delete,
    path = "/api/students/{id}",
    params(("id" = Uuid, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student deleted", body = DeletedResource),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state))]
pub async fn delete_student(
    State(state): State<AppState>,
    Path(id): Path<StudentId>,
) -> Result<Json<ApiResponse<DeletedResource>>, AppError> {
    StudentService::delete_student(&state.db, state.occupancy_policy, id).await?;
    Ok(Json(ApiResponse::with_message(
        "Student deleted successfully",
        DeletedResource::new(id),
    )))
}
