//! Application-side configuration.
//!
//! Environment-driven settings live in the `dormex-config` crate; this module
//! turns them into live resources such as the database pool.
//!
//! # Example
//!
//! ```ignore
//! use dormex_config::DatabaseConfig;
//! use crate::config::database::{init_db_pool, run_migrations};
//!
//! let config = DatabaseConfig::from_env()?;
//! let db = init_db_pool(&config).await?;
//! run_migrations(&db).await?;
//! ```

pub mod database;
