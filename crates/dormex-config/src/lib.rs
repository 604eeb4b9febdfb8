//! # Dormex Config
//!
//! Configuration types for the Dormex API, loaded from environment variables:
//!
//! - [`server`]: bind address and database pool settings
//! - [`jwt`]: JWT signing secret and token lifetimes
//! - [`cors`]: allowed origins, methods and headers
//! - [`admin`]: bootstrap administrator account
//! - [`oauth`]: Google OAuth2 client credentials
//! - [`occupancy`]: whether room assignment drives occupancy counters
//!
//! # Example
//!
//! ```ignore
//! use dormex_config::{CorsConfig, JwtConfig, OccupancyPolicy};
//!
//! let jwt_config = JwtConfig::from_env();
//! let cors_config = CorsConfig::from_env();
//! let policy = OccupancyPolicy::from_env();
//! ```

pub mod admin;
pub mod cors;
pub mod jwt;
pub mod oauth;
pub mod occupancy;
pub mod server;

pub use admin::AdminConfig;
pub use cors::CorsConfig;
pub use jwt::JwtConfig;
pub use oauth::GoogleOAuthConfig;
pub use occupancy::OccupancyPolicy;
pub use server::{DatabaseConfig, ServerConfig};

use std::env;
use std::str::FromStr;

/// Reads `key` and parses it, falling back to `default` when unset or malformed.
pub(crate) fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

/// Splits a comma separated variable into trimmed, non-empty entries.
pub(crate) fn env_list(key: &str, default: &str) -> Vec<String> {
    env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
