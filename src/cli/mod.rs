//! Administrator bootstrap, shared by server startup and `dormex-cli`.

use anyhow::bail;
use sqlx::PgPool;
use tracing::{debug, info, instrument};

use dormex_config::AdminConfig;
use dormex_core::hash_password;
use dormex_models::{AuthProvider, User, UserRole};

use crate::modules::users::service::UserService;

/// Creates a local ADMIN account. Fails if the email is already registered.
#[instrument(skip(db, password))]
pub async fn create_admin(
    db: &PgPool,
    name: &str,
    email: &str,
    password: &str,
) -> anyhow::Result<User> {
    if UserService::email_exists(db, email).await? {
        bail!("User with this email already exists");
    }

    let password_hash = hash_password(password)?;
    let user = UserService::insert(
        db,
        name,
        email,
        Some(&password_hash),
        UserRole::Admin,
        AuthProvider::Local,
        None,
    )
    .await?;

    info!(user_id = %user.id, "Admin account created");
    Ok(user)
}

/// Creates the configured admin on startup unless the account already exists
/// or no password is configured. Safe to run on every start.
pub async fn ensure_default_admin(db: &PgPool, config: &AdminConfig) -> anyhow::Result<()> {
    let Some(password) = config.password.as_deref() else {
        debug!("ADMIN_PASSWORD not set, skipping admin bootstrap");
        return Ok(());
    };

    if UserService::email_exists(db, &config.email).await? {
        debug!(email = %config.email, "Admin account already exists");
        return Ok(());
    }

    create_admin(db, &config.name, &config.email, password).await?;
    Ok(())
}
