use crate::env_list;

#[derive(Clone, Debug)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub allowed_methods: Vec<String>,
    /// `["*"]` means any header.
    pub allowed_headers: Vec<String>,
}

impl CorsConfig {
    pub fn from_env() -> Self {
        Self {
            allowed_origins: env_list("ALLOWED_ORIGINS", "http://localhost:3000"),
            allowed_methods: env_list("ALLOWED_METHODS", "GET,POST,PUT,DELETE,PATCH,OPTIONS"),
            allowed_headers: env_list("ALLOWED_HEADERS", "*"),
        }
    }

    /// Base URL the OAuth2 flow redirects the browser back to.
    pub fn frontend_origin(&self) -> &str {
        self.allowed_origins
            .first()
            .map(String::as_str)
            .unwrap_or("http://localhost:3000")
    }

    pub fn allows_any_header(&self) -> bool {
        self.allowed_headers.iter().any(|h| h == "*")
    }
}
