use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
};

use dormex_auth::{Claims, verify_token};
use dormex_core::AppError;
use dormex_models::{User, UserId, UserRole};

use crate::modules::users::service::UserService;
use crate::state::AppState;

/// The caller behind a valid bearer token, loaded from the database.
///
/// The access-policy layer resolves it once per request and stores it in
/// the request extensions; extracting it again in a handler is free.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub claims: Claims,
    pub user: User,
}

impl AuthUser {
    pub fn user_id(&self) -> UserId {
        self.user.id
    }

    pub fn role(&self) -> UserRole {
        self.user.role
    }

    pub fn is_admin(&self) -> bool {
        self.user.is_admin()
    }

    pub fn email(&self) -> &str {
        &self.user.email
    }
}

pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::unauthorized("Missing authorization header"))?;

    auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::unauthorized("Invalid authorization header format"))
}

/// Verifies `token` and loads its user. Disabled accounts are forbidden.
pub async fn authenticate(state: &AppState, token: &str) -> Result<AuthUser, AppError> {
    let claims = verify_token(token, &state.jwt_config)?;

    let user_id: UserId = claims
        .sub
        .parse()
        .map_err(|_| AppError::unauthorized("Invalid user ID in token"))?;

    let user = UserService::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::unauthorized("User no longer exists"))?;

    if !user.enabled {
        return Err(AppError::forbidden("Account is disabled"));
    }

    Ok(AuthUser { claims, user })
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(auth_user) = parts.extensions.get::<AuthUser>() {
            return Ok(auth_user.clone());
        }

        let token = bearer_token(&parts.headers)?;
        let auth_user = authenticate(state, token).await?;
        parts.extensions.insert(auth_user.clone());

        Ok(auth_user)
    }
}
