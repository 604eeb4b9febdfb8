use std::env;

/// Administrator account created on startup when no user with `email` exists.
#[derive(Clone, Debug)]
pub struct AdminConfig {
    pub email: String,
    pub name: String,
    /// Bootstrap is skipped when unset.
    pub password: Option<String>,
}

impl AdminConfig {
    pub fn from_env() -> Self {
        Self {
            email: env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@dormex.com".to_string()),
            name: env::var("ADMIN_NAME").unwrap_or_else(|_| "System Admin".to_string()),
            password: env::var("ADMIN_PASSWORD").ok().filter(|p| !p.is_empty()),
        }
    }
}
