use anyhow::Context;
use dotenvy::dotenv;
use tracing::info;

use dormex::cli::ensure_default_admin;
use dormex::config::database::run_migrations;
use dormex::logging::init_tracing;
use dormex::router::init_router;
use dormex::state::init_app_state;
use dormex_config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_tracing();

    let state = init_app_state().await?;
    run_migrations(&state.db)
        .await
        .context("Failed to run database migrations")?;
    ensure_default_admin(&state.db, &state.admin_config).await?;

    let server = ServerConfig::from_env();
    let app = init_router(state);

    let listener = tokio::net::TcpListener::bind(&server.addr)
        .await
        .with_context(|| format!("Failed to bind {}", server.addr))?;

    info!(addr = %server.addr, "Server running");
    info!("Swagger UI available at http://{}/swagger-ui", server.addr);
    info!("Scalar UI available at http://{}/scalar", server.addr);

    axum::serve(listener, app).await?;
    Ok(())
}
