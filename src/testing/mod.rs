use sqlx::SqlitePool;

use crate::auth::{CredentialStore, TokenService};
use crate::config::AppConfig;
use crate::database::{seed, AssetStore, DatabaseManager};
use crate::server::AppState;

/// Fresh in-memory database with the schema applied
pub struct TestDatabase {
    pub pool: SqlitePool,
}

impl TestDatabase {
    pub async fn new() -> anyhow::Result<Self> {
        let pool = DatabaseManager::connect_in_memory()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to open test database: {}", e))?;
        Ok(Self { pool })
    }

    /// Same database, with the default admin user and sample assets
    pub async fn seeded() -> anyhow::Result<Self> {
        let db = Self::new().await?;
        seed::initialize(&db.pool, &AppConfig::development().seed).await?;
        Ok(db)
    }

    pub fn state(&self) -> AppState {
        let config = AppConfig::development();
        AppState {
            tokens: TokenService::new(config.jwt),
            credentials: CredentialStore::new(self.pool.clone()),
            assets: AssetStore::new(self.pool.clone()),
            pool: self.pool.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_databases_are_isolated() {
        let seeded = TestDatabase::seeded().await.unwrap();
        let empty = TestDatabase::new().await.unwrap();

        let seeded_assets = AssetStore::new(seeded.pool.clone()).get_all().await.unwrap();
        let empty_assets = AssetStore::new(empty.pool.clone()).get_all().await.unwrap();

        assert_eq!(seeded_assets.len(), 2);
        assert!(empty_assets.is_empty());
    }
}
