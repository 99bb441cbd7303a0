use anyhow::Context;
use metcal_api::config::AppConfig;
use metcal_api::{logging, serve, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so DATABASE_PATH, JWT_SECRET_KEY, etc. can live next to the binary
    let _ = dotenvy::dotenv();

    let config = AppConfig::from_env().context("invalid configuration")?;
    let _log_guard = logging::init(&config.logging)?;
    tracing::info!("Starting Metcal asset API in {:?} mode", config.environment);

    let state = AppState::initialize(&config)
        .await
        .context("failed to open database")?;

    let bind_addr = config.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    tracing::info!("Listening on http://{}", bind_addr);

    serve(listener, state).await.context("server error")?;
    tracing::info!("Server stopped");
    Ok(())
}
