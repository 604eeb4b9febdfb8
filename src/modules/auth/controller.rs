use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::Redirect,
};
use tracing::{instrument, warn};
use url::Url;

use dormex_auth::{create_oauth_state_token, verify_oauth_state_token};
use dormex_core::{ApiResponse, AppError, ErrorResponse};
use dormex_models::UserRole;

use crate::modules::auth::model::{
    AuthResponse, LoginRequest, OAuthCallbackParams, RefreshTokenRequest, RegisterRequest,
};
use crate::modules::auth::oauth::{GOOGLE_PROVIDER, GoogleOAuth};
use crate::modules::auth::service::AuthService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Login with email and password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 403, description = "Account disabled", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, AppError> {
    let response = AuthService::login(&state.db, dto, &state.jwt_config).await?;
    Ok(Json(ApiResponse::with_message("Login successful", response)))
}

/// Register a new student account (admin only)
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Student registered", body = AuthResponse),
        (status = 400, description = "Validation error or email already registered", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn register_student(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AuthResponse>>), AppError> {
    let response =
        AuthService::register(&state.db, dto, UserRole::Student, &state.jwt_config).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "Student registered successfully",
            response,
        )),
    ))
}

/// Register a new admin account (admin only)
#[utoipa::path(
    post,
    path = "/api/auth/register/admin",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Admin registered", body = AuthResponse),
        (status = 400, description = "Validation error or email already registered", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn register_admin(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AuthResponse>>), AppError> {
    let response = AuthService::register(&state.db, dto, UserRole::Admin, &state.jwt_config).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "Admin registered successfully",
            response,
        )),
    ))
}

/// Exchange a refresh token for a new token pair
#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    request_body = RefreshTokenRequest,
    responses(
        (status = 200, description = "Token refreshed", body = AuthResponse),
        (status = 401, description = "Invalid or expired refresh token", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn refresh_token(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<RefreshTokenRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, AppError> {
    let response = AuthService::refresh(&state.db, dto, &state.jwt_config).await?;
    Ok(Json(ApiResponse::with_message("Token refreshed", response)))
}

fn google_client(state: &AppState) -> Result<&GoogleOAuth, AppError> {
    state
        .google_oauth
        .as_ref()
        .ok_or_else(|| AppError::internal_error("Google OAuth2 is not configured"))
}

/// Start Google sign-in
#[utoipa::path(
    get,
    path = "/api/auth/oauth2/google",
    responses(
        (status = 303, description = "Redirect to Google's consent page"),
        (status = 500, description = "Google OAuth2 is not configured", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state))]
pub async fn google_login(State(state): State<AppState>) -> Result<Redirect, AppError> {
    let google = google_client(&state)?;
    let csrf_state = create_oauth_state_token(GOOGLE_PROVIDER, &state.jwt_config)?;
    let url = google.authorize_url(csrf_state);

    Ok(Redirect::to(url.as_str()))
}

/// Frontend URL the callback redirects to, with `params` as the query.
pub fn frontend_callback_url(frontend_origin: &str, params: &[(&str, &str)]) -> Result<Url, AppError> {
    let base = format!("{}/oauth2/callback", frontend_origin.trim_end_matches('/'));
    Url::parse_with_params(&base, params).map_err(AppError::internal)
}

async fn complete_google_login(
    state: &AppState,
    params: OAuthCallbackParams,
) -> Result<Url, AppError> {
    if let Some(error) = params.error {
        return Err(AppError::unauthorized(format!("Google sign-in failed: {}", error)));
    }

    let csrf_state = params
        .state
        .ok_or_else(|| AppError::unauthorized("Missing OAuth2 state"))?;
    verify_oauth_state_token(&csrf_state, GOOGLE_PROVIDER, &state.jwt_config)?;

    let code = params
        .code
        .ok_or_else(|| AppError::unauthorized("Missing authorization code"))?;

    let profile = google_client(state)?
        .fetch_user(code, &state.http_client)
        .await?;
    let user = AuthService::find_or_create_google_user(&state.db, profile).await?;
    let tokens = AuthService::issue_tokens(&user, &state.jwt_config)?;

    frontend_callback_url(
        state.cors_config.frontend_origin(),
        &[
            ("token", tokens.access_token.as_str()),
            ("refreshToken", tokens.refresh_token.as_str()),
        ],
    )
}

/// Google sign-in callback
///
/// Redirects to the frontend with `token` and `refreshToken` on success, or
/// with `error` on failure.
#[utoipa::path(
    get,
    path = "/api/auth/oauth2/callback/google",
    params(OAuthCallbackParams),
    responses(
        (status = 303, description = "Redirect to the frontend callback page")
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, params))]
pub async fn google_callback(
    State(state): State<AppState>,
    Query(params): Query<OAuthCallbackParams>,
) -> Result<Redirect, AppError> {
    match complete_google_login(&state, params).await {
        Ok(url) => Ok(Redirect::to(url.as_str())),
        Err(err) => {
            warn!(error = %err, "Google sign-in failed");
            let message = if err.status.is_server_error() {
                "Authentication failed".to_string()
            } else {
                err.message()
            };
            let url = frontend_callback_url(
                state.cors_config.frontend_origin(),
                &[("error", message.as_str())],
            )?;
            Ok(Redirect::to(url.as_str()))
        }
    }
}
