use axum::Json;
use tracing::instrument;

use dormex_core::{ApiResponse, AppError, ErrorResponse};

use crate::middleware::auth::AuthUser;
use crate::modules::users::model::UserProfile;

/// Get the authenticated user's profile
#[utoipa::path(
    get,
    path = "/api/users/me",
    responses(
        (status = 200, description = "Current user, wrapped in the response envelope", body = UserProfile),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Account disabled", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(auth_user), fields(user_id = %auth_user.user_id()))]
pub async fn get_me(auth_user: AuthUser) -> Result<Json<ApiResponse<UserProfile>>, AppError> {
    Ok(Json(ApiResponse::success(UserProfile::from(auth_user.user))))
}
