#![allow(dead_code)]

use std::net::SocketAddr;

use anyhow::{Context, Result};
use metcal_api::config::AppConfig;
use metcal_api::AppState;
use serde_json::{json, Value};
use tempfile::TempDir;

/// An API server running on the test's runtime against its own database file
pub struct TestServer {
    pub base_url: String,
    pub client: reqwest::Client,
    // Removed with the server's database when dropped
    _db_dir: TempDir,
}

impl TestServer {
    pub async fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let db_dir = tempfile::tempdir().context("failed to create temp dir")?;

        let mut config = AppConfig::development();
        config.server.host = "127.0.0.1".to_string();
        config.server.port = port;
        config.database.path = db_dir.path().join("asset.db");
        config.jwt.secret = "integration-test-secret".to_string();

        let state = AppState::initialize(&config)
            .await
            .context("failed to initialize app state")?;

        let listener = tokio::net::TcpListener::bind(config.server.bind_addr())
            .await
            .context("failed to bind test listener")?;

        tokio::spawn(async move {
            let app = metcal_api::app(state).into_make_service_with_connect_info::<SocketAddr>();
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self {
            base_url: format!("http://127.0.0.1:{}", port),
            client: reqwest::Client::new(),
            _db_dir: db_dir,
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Log in as the seeded admin and return the access token
    pub async fn admin_token(&self) -> Result<String> {
        let res = self
            .client
            .post(self.url("/api/token"))
            .json(&json!({ "username": "admin", "password": "password" }))
            .send()
            .await?;
        anyhow::ensure!(res.status().is_success(), "login failed: {}", res.status());

        let body: Value = res.json().await?;
        body["access_token"]
            .as_str()
            .map(str::to_string)
            .context("response had no access_token")
    }
}
