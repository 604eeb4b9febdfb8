use anyhow::Context;
use sqlx::{PgExecutor, PgPool};
use tracing::instrument;

use dormex_core::AppError;
use dormex_models::UserId;

use crate::modules::users::model::{AuthProvider, User, UserRole};

pub(crate) const USER_COLUMNS: &str = "id, name, email, password, role, auth_provider, enabled, \
     profile_picture, created_at, updated_at";

pub struct UserService;

impl UserService {
    #[instrument(skip(db))]
    pub async fn find_by_id(db: &PgPool, id: UserId) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch user by ID")
        .map_err(AppError::database)?;

        Ok(user)
    }

    #[instrument(skip(db))]
    pub async fn find_by_email(db: &PgPool, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(db)
        .await
        .context("Failed to fetch user by email")
        .map_err(AppError::database)?;

        Ok(user)
    }

    pub async fn email_exists<'e>(db: impl PgExecutor<'e>, email: &str) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
            .bind(email)
            .fetch_one(db)
            .await
            .context("Failed to check email")
            .map_err(AppError::database)?;

        Ok(exists)
    }

    /// Inserts a user. `password_hash` is `None` for OAuth2 accounts.
    pub async fn insert<'e>(
        db: impl PgExecutor<'e>,
        name: &str,
        email: &str,
        password_hash: Option<&str>,
        role: UserRole,
        auth_provider: AuthProvider,
        profile_picture: Option<&str>,
    ) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (name, email, password, role, auth_provider, profile_picture) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(role)
        .bind(auth_provider)
        .bind(profile_picture)
        .fetch_one(db)
        .await?;

        Ok(user)
    }

    pub async fn set_enabled<'e>(
        db: impl PgExecutor<'e>,
        id: UserId,
        enabled: bool,
    ) -> Result<(), AppError> {
        sqlx::query("UPDATE users SET enabled = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(enabled)
            .execute(db)
            .await
            .context("Failed to update user status")
            .map_err(AppError::database)?;

        Ok(())
    }
}
