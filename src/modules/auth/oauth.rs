//! Google OAuth2 authorization-code client.

use oauth2::basic::{BasicClient, BasicErrorResponseType, BasicTokenType};
use oauth2::{
    AuthUrl, AuthorizationCode, Client, ClientId, ClientSecret, CsrfToken, EmptyExtraTokenFields,
    EndpointNotSet, EndpointSet, RedirectUrl, RevocationErrorResponseType, Scope,
    StandardErrorResponse, StandardRevocableToken, StandardTokenIntrospectionResponse,
    StandardTokenResponse, TokenResponse, TokenUrl,
};
use tracing::instrument;
use url::Url;

use dormex_config::GoogleOAuthConfig;
use dormex_config::oauth::{GOOGLE_AUTH_URL, GOOGLE_TOKEN_URL, GOOGLE_USERINFO_URL};
use dormex_core::AppError;

use crate::modules::auth::model::GoogleUserInfo;

pub(crate) type OAuth2Client = Client<
    StandardErrorResponse<BasicErrorResponseType>,
    StandardTokenResponse<EmptyExtraTokenFields, BasicTokenType>,
    StandardTokenIntrospectionResponse<EmptyExtraTokenFields, BasicTokenType>,
    StandardRevocableToken,
    StandardErrorResponse<RevocationErrorResponseType>,
    EndpointSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointSet,
>;

pub const GOOGLE_PROVIDER: &str = "google";

#[derive(Clone)]
pub struct GoogleOAuth {
    client: OAuth2Client,
}

impl GoogleOAuth {
    pub fn new(config: GoogleOAuthConfig) -> anyhow::Result<Self> {
        let client = BasicClient::new(ClientId::new(config.client_id))
            .set_client_secret(ClientSecret::new(config.client_secret))
            .set_auth_uri(AuthUrl::new(GOOGLE_AUTH_URL.to_string())?)
            .set_token_uri(TokenUrl::new(GOOGLE_TOKEN_URL.to_string())?)
            .set_redirect_uri(RedirectUrl::new(config.redirect_url)?);

        Ok(Self { client })
    }

    /// Consent page URL carrying `state` for the callback to verify.
    pub fn authorize_url(&self, state: String) -> Url {
        let (url, _) = self
            .client
            .authorize_url(move || CsrfToken::new(state))
            .add_scope(Scope::new("openid".to_string()))
            .add_scope(Scope::new("email".to_string()))
            .add_scope(Scope::new("profile".to_string()))
            .url();

        url
    }

    /// Exchanges the authorization code and fetches the user's profile.
    #[instrument(skip_all)]
    pub async fn fetch_user(
        &self,
        code: String,
        http_client: &reqwest::Client,
    ) -> Result<GoogleUserInfo, AppError> {
        let token = self
            .client
            .exchange_code(AuthorizationCode::new(code))
            .request_async(http_client)
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "Google code exchange failed");
                AppError::unauthorized("Failed to exchange authorization code")
            })?;

        let user_info = http_client
            .get(GOOGLE_USERINFO_URL)
            .header(
                "Authorization",
                format!("Bearer {}", token.access_token().secret()),
            )
            .send()
            .await
            .map_err(AppError::internal)?
            .error_for_status()
            .map_err(AppError::internal)?
            .json::<GoogleUserInfo>()
            .await
            .map_err(AppError::internal)?;

        Ok(user_info)
    }
}
