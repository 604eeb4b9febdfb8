use sqlx::PgPool;

use crate::config::database::init_db_pool;
use crate::modules::auth::oauth::GoogleOAuth;
use dormex_config::{
    AdminConfig, CorsConfig, DatabaseConfig, GoogleOAuthConfig, JwtConfig, OccupancyPolicy,
};

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub jwt_config: JwtConfig,
    pub cors_config: CorsConfig,
    pub admin_config: AdminConfig,
    pub occupancy_policy: OccupancyPolicy,
    /// `None` when Google credentials are not configured.
    pub google_oauth: Option<GoogleOAuth>,
    /// Redirects are disabled; used for provider calls only.
    pub http_client: reqwest::Client,
}

impl AppState {
    /// Builds state around an existing pool, reading everything else from the
    /// environment.
    pub fn from_pool(db: PgPool) -> anyhow::Result<Self> {
        let google_oauth = GoogleOAuthConfig::from_env()
            .map(GoogleOAuth::new)
            .transpose()?;

        let http_client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        Ok(Self {
            db,
            jwt_config: JwtConfig::from_env(),
            cors_config: CorsConfig::from_env(),
            admin_config: AdminConfig::from_env(),
            occupancy_policy: OccupancyPolicy::from_env(),
            google_oauth,
            http_client,
        })
    }
}

pub async fn init_app_state() -> anyhow::Result<AppState> {
    let database_config = DatabaseConfig::from_env()
        .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;
    let db = init_db_pool(&database_config).await?;

    AppState::from_pool(db)
}
