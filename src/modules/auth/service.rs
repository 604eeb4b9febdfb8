use anyhow::Context;
use sqlx::PgPool;
use tracing::{info, instrument};

use dormex_auth::{create_access_token, create_refresh_token, verify_refresh_token};
use dormex_config::JwtConfig;
use dormex_core::{AppError, hash_password, verify_password};
use dormex_models::{AuthProvider, User, UserId, UserRole, UserSummary};

use crate::modules::auth::model::{
    AuthResponse, GoogleUserInfo, LoginRequest, RefreshTokenRequest, RegisterRequest,
};
use crate::modules::users::service::{USER_COLUMNS, UserService};

pub struct AuthService;

impl AuthService {
    /// Mints an access/refresh pair for `user`.
    pub fn issue_tokens(user: &User, jwt_config: &JwtConfig) -> Result<AuthResponse, AppError> {
        let access_token = create_access_token(user.id.into_inner(), &user.email, jwt_config)?;
        let refresh_token = create_refresh_token(user.id.into_inner(), &user.email, jwt_config)?;

        Ok(AuthResponse::bearer(
            access_token,
            refresh_token,
            jwt_config.access_token_expiry,
            UserSummary::from(user),
        ))
    }

    #[instrument(skip(db, dto, jwt_config), fields(email = %dto.email, role = role.as_str()))]
    pub async fn register(
        db: &PgPool,
        dto: RegisterRequest,
        role: UserRole,
        jwt_config: &JwtConfig,
    ) -> Result<AuthResponse, AppError> {
        if UserService::email_exists(db, &dto.email).await? {
            return Err(AppError::conflict("Email already registered"));
        }

        let password_hash = hash_password(&dto.password)?;
        let user = UserService::insert(
            db,
            &dto.name,
            &dto.email,
            Some(&password_hash),
            role,
            AuthProvider::Local,
            None,
        )
        .await?;

        info!(user_id = %user.id, "User registered");
        Self::issue_tokens(&user, jwt_config)
    }

    #[instrument(skip(db, dto, jwt_config), fields(email = %dto.email))]
    pub async fn login(
        db: &PgPool,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<AuthResponse, AppError> {
        let invalid = || AppError::unauthorized("Invalid email or password");

        let user = UserService::find_by_email(db, &dto.email)
            .await?
            .ok_or_else(invalid)?;

        // OAuth2 accounts have no password to check against.
        let hash = user.password.as_deref().ok_or_else(invalid)?;
        if !verify_password(&dto.password, hash)? {
            return Err(invalid());
        }

        if !user.enabled {
            return Err(AppError::forbidden("Account is disabled"));
        }

        Self::issue_tokens(&user, jwt_config)
    }

    #[instrument(skip(db, dto, jwt_config))]
    pub async fn refresh(
        db: &PgPool,
        dto: RefreshTokenRequest,
        jwt_config: &JwtConfig,
    ) -> Result<AuthResponse, AppError> {
        let claims = verify_refresh_token(&dto.refresh_token, jwt_config)?;

        let user_id: UserId = claims
            .sub
            .parse()
            .map_err(|_| AppError::unauthorized("Invalid or expired refresh token"))?;

        let user = UserService::find_by_id(db, user_id)
            .await?
            .ok_or_else(|| AppError::unauthorized("User no longer exists"))?;

        if !user.enabled {
            return Err(AppError::forbidden("Account is disabled"));
        }

        Self::issue_tokens(&user, jwt_config)
    }

    /// Finds the account for a Google profile, creating a STUDENT account on
    /// first sight. Known accounts get their name and picture refreshed.
    #[instrument(skip(db, profile), fields(email = %profile.email))]
    pub async fn find_or_create_google_user(
        db: &PgPool,
        profile: GoogleUserInfo,
    ) -> Result<User, AppError> {
        if let Some(existing) = UserService::find_by_email(db, &profile.email).await? {
            if !existing.enabled {
                return Err(AppError::forbidden("Account is disabled"));
            }

            let user = sqlx::query_as::<_, User>(&format!(
                "UPDATE users \
                 SET name = COALESCE($2, name), \
                     profile_picture = COALESCE($3, profile_picture), \
                     updated_at = NOW() \
                 WHERE id = $1 \
                 RETURNING {USER_COLUMNS}"
            ))
            .bind(existing.id)
            .bind(profile.name.as_deref())
            .bind(profile.picture.as_deref())
            .fetch_one(db)
            .await
            .context("Failed to update OAuth2 user")
            .map_err(AppError::database)?;

            return Ok(user);
        }

        let name = profile
            .name
            .clone()
            .unwrap_or_else(|| profile.email.split('@').next().unwrap_or_default().to_string());

        let user = UserService::insert(
            db,
            &name,
            &profile.email,
            None,
            UserRole::Student,
            AuthProvider::Google,
            profile.picture.as_deref(),
        )
        .await?;

        info!(user_id = %user.id, "Created user from Google sign-in");
        Ok(user)
    }
}
