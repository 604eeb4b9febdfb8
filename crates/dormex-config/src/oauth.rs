use std::env;

pub const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
pub const GOOGLE_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v3/userinfo";

#[derive(Clone, Debug)]
pub struct GoogleOAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_url: String,
}

impl GoogleOAuthConfig {
    /// Returns `None` unless both client id and secret are configured.
    pub fn from_env() -> Option<Self> {
        let client_id = env::var("GOOGLE_CLIENT_ID").ok().filter(|v| !v.is_empty())?;
        let client_secret = env::var("GOOGLE_CLIENT_SECRET")
            .ok()
            .filter(|v| !v.is_empty())?;
        let redirect_url = env::var("GOOGLE_REDIRECT_URL").unwrap_or_else(|_| {
            "http://localhost:8080/api/auth/oauth2/callback/google".to_string()
        });

        Some(Self {
            client_id,
            client_secret,
            redirect_url,
        })
    }
}
