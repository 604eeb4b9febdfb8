//! # Dormex Auth
//!
//! JWT claims and token utilities for the Dormex API.
//!
//! - [`claims`]: claim structures for access, refresh and OAuth2 state tokens
//! - [`jwt`]: token creation and verification

pub mod claims;
pub mod jwt;

pub use claims::{Claims, OAuthStateClaims, TokenType};
pub use jwt::{
    create_access_token, create_oauth_state_token, create_refresh_token, verify_oauth_state_token,
    verify_refresh_token, verify_token,
};
