use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use sqlx::SqlitePool;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer};

use crate::auth::{CredentialStore, TokenService};
use crate::config::AppConfig;
use crate::database::{seed, AssetStore, DatabaseError, DatabaseManager};
use crate::handlers::{protected, public};
use crate::middleware::{jwt_auth_middleware, panic_response, request_log_middleware};

/// Services shared by every request, built once at startup
#[derive(Clone)]
pub struct AppState {
    pub tokens: TokenService,
    pub credentials: CredentialStore,
    pub assets: AssetStore,
    pub pool: SqlitePool,
}

impl AppState {
    /// Open the database (seeding it when configured) and wire up the services
    pub async fn initialize(config: &AppConfig) -> Result<Self, DatabaseError> {
        let pool = DatabaseManager::connect(&config.database).await?;
        if config.database.seed_on_startup {
            seed::initialize(&pool, &config.seed).await?;
        }

        Ok(Self {
            tokens: TokenService::new(config.jwt.clone()),
            credentials: CredentialStore::new(pool.clone()),
            assets: AssetStore::new(pool.clone()),
            pool,
        })
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(public::root))
        .route("/health", get(public::health))
        .route("/api/token", post(public::issue_token))
        // Protected
        .merge(asset_routes(state.clone()))
        .fallback(public::not_found)
        // After merge so the protected method routers are covered too
        .method_not_allowed_fallback(public::method_not_allowed)
        // Global middleware, innermost first
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(middleware::from_fn(request_log_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn asset_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/api/assets", get(protected::list_assets))
        .route("/api/asset", post(protected::create_asset))
        .route(
            "/api/asset/:id",
            get(protected::get_asset).put(protected::update_asset),
        )
        .route_layer(middleware::from_fn_with_state(state, jwt_auth_middleware))
}

/// Serve until Ctrl-C, exposing peer addresses to the request log
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    axum::serve(
        listener,
        app(state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
