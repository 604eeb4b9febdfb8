//! Request authentication and authorization.
//!
//! - [`auth`]: the [`auth::AuthUser`] extractor and bearer token handling
//! - [`role`]: the route access table and the layer that enforces it
//!
//! # Flow
//!
//! 1. The router matches the request to a route template
//! 2. [`role::enforce_access_policy`] looks the template up in
//!    [`role::ACCESS_POLICY`]
//! 3. For non-public routes the bearer token is verified, the user is loaded
//!    and its role checked
//! 4. The handler receives the caller through the `AuthUser` extractor

pub mod auth;
pub mod role;
