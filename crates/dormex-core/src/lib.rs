//! # Dormex Core
//!
//! Core types, errors, and utilities for the Dormex API.
//!
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`response`]: The `{ message, data }` success envelope
//! - [`password`]: Password hashing and verification
//!
//! # Example
//!
//! ```ignore
//! use dormex_core::{ApiResponse, AppError, hash_password};
//!
//! let error = AppError::not_found_entity("Room", "id", room_id);
//! let hash = hash_password("secure_password")?;
//! let body = ApiResponse::with_message("Room created", room);
//! ```

pub mod errors;
pub mod password;
pub mod response;

pub use errors::{AppError, ErrorKind, ErrorResponse};
pub use password::{hash_password, verify_password};
pub use response::{ApiResponse, DeletedResource};
