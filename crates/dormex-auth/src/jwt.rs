//! JWT creation and verification.
//!
//! All tokens are HS256 and signed with [`JwtConfig::secret`]. Access and
//! refresh tokens share one claim shape; verification checks the
//! `token_type` claim so neither can stand in for the other.
//!
//! # Example
//!
//! ```ignore
//! use dormex_auth::{create_access_token, verify_token};
//! use dormex_config::JwtConfig;
//!
//! let config = JwtConfig::from_env();
//! let token = create_access_token(user_id, "admin@dormex.com", &config)?;
//! let claims = verify_token(&token, &config)?;
//! ```

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use dormex_config::JwtConfig;
use dormex_core::AppError;

use crate::claims::{Claims, OAuthStateClaims, TokenType};

/// Lifetime of the OAuth2 `state` token in seconds.
const OAUTH_STATE_EXPIRY: usize = 600;

fn encode_claims<T: serde::Serialize>(claims: &T, jwt_config: &JwtConfig) -> Result<String, AppError> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(|e| AppError::internal_error(format!("Failed to create token: {}", e)))
}

fn decode_claims(token: &str, jwt_config: &JwtConfig) -> Option<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &Validation::default(),
    )
    .ok()
    .map(|data| data.claims)
}

/// Creates an access token valid for `access_token_expiry` seconds.
pub fn create_access_token(
    user_id: Uuid,
    email: &str,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    let now = Utc::now().timestamp() as usize;

    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        token_type: TokenType::Access,
        exp: now + jwt_config.access_token_expiry as usize,
        iat: now,
        jti: None,
    };

    encode_claims(&claims, jwt_config)
}

/// Creates a refresh token valid for `refresh_token_expiry` seconds.
///
/// Each refresh token carries a fresh `jti`, so two tokens minted in the same
/// second still differ.
pub fn create_refresh_token(
    user_id: Uuid,
    email: &str,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    let now = Utc::now().timestamp() as usize;

    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        token_type: TokenType::Refresh,
        exp: now + jwt_config.refresh_token_expiry as usize,
        iat: now,
        jti: Some(Uuid::new_v4().to_string()),
    };

    encode_claims(&claims, jwt_config)
}

/// Verifies a bearer token. Refresh tokens are rejected.
pub fn verify_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, AppError> {
    match decode_claims(token, jwt_config) {
        Some(claims) if claims.token_type == TokenType::Access => Ok(claims),
        _ => Err(AppError::unauthorized("Invalid or expired token")),
    }
}

/// Verifies a refresh token. Access tokens are rejected.
pub fn verify_refresh_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, AppError> {
    match decode_claims(token, jwt_config) {
        Some(claims) if claims.token_type == TokenType::Refresh => Ok(claims),
        _ => Err(AppError::unauthorized("Invalid or expired refresh token")),
    }
}

/// Creates the signed `state` value sent to the OAuth2 provider.
pub fn create_oauth_state_token(provider: &str, jwt_config: &JwtConfig) -> Result<String, AppError> {
    let now = Utc::now().timestamp() as usize;

    let claims = OAuthStateClaims {
        nonce: Uuid::new_v4().to_string(),
        provider: provider.to_string(),
        exp: now + OAUTH_STATE_EXPIRY,
        iat: now,
    };

    encode_claims(&claims, jwt_config)
}

/// Checks the `state` returned by the provider on callback.
pub fn verify_oauth_state_token(
    token: &str,
    provider: &str,
    jwt_config: &JwtConfig,
) -> Result<OAuthStateClaims, AppError> {
    let decoded = decode::<OAuthStateClaims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::unauthorized("Invalid or expired OAuth2 state"))?;

    if decoded.claims.provider != provider {
        return Err(AppError::unauthorized("OAuth2 state was issued for another provider"));
    }

    Ok(decoded.claims)
}
