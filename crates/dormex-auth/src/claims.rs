//! JWT claim structures.
//!
//! - [`Claims`]: access and refresh token claims, told apart by [`TokenType`]
//! - [`OAuthStateClaims`]: short-lived CSRF state for the OAuth2 redirect

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    Access,
    Refresh,
}

/// Claims carried by access and refresh tokens.
///
/// Roles are not embedded: the role gate reloads the user on every request,
/// so disabling an account or changing a role takes effect immediately.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    /// User ID (subject claim)
    pub sub: String,
    pub email: String,
    pub token_type: TokenType,
    /// Unix timestamp
    pub exp: usize,
    /// Unix timestamp
    pub iat: usize,
    /// Unique per refresh token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
}

/// Signed `state` parameter for the Google authorization redirect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthStateClaims {
    pub nonce: String,
    pub provider: String,
    pub exp: usize,
    pub iat: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_serialize_token_type() {
        let claims = Claims {
            sub: "user-id-123".to_string(),
            email: "warden@dormex.com".to_string(),
            token_type: TokenType::Access,
            exp: 1234567890,
            iat: 1234567800,
            jti: None,
        };
        let serialized = serde_json::to_string(&claims).unwrap();
        assert!(serialized.contains(r#""token_type":"access""#));
        assert!(!serialized.contains("jti"));
    }

    #[test]
    fn test_claims_deserialize_refresh() {
        let json = r#"{"sub":"u-1","email":"s@dormex.com","token_type":"refresh","exp":9999999999,"iat":9999999900,"jti":"abc"}"#;
        let claims: Claims = serde_json::from_str(json).unwrap();
        assert_eq!(claims.token_type, TokenType::Refresh);
        assert_eq!(claims.jti.as_deref(), Some("abc"));
    }
}
