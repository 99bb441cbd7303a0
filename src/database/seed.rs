// Initial data for an empty database: one admin user and two sample assets

use chrono::NaiveDate;
use sqlx::SqlitePool;
use tracing::info;

use super::assets::AssetStore;
use super::manager::DatabaseError;
use super::models::NewAsset;
use crate::auth::CredentialStore;
use crate::config::SeedConfig;

pub fn sample_assets() -> Vec<NewAsset> {
    vec![
        NewAsset {
            name: "Thermal Camera".to_string(),
            category: Some("Diagnostics".to_string()),
            owner: Some("Maintenance".to_string()),
            status: Some("active".to_string()),
            location: Some("Warehouse A".to_string()),
            value: Some(2850.00),
            purchase_date: NaiveDate::from_ymd_opt(2023, 5, 17),
            metadata: Some("Calibrated Q4".to_string()),
        },
        NewAsset {
            name: "Server Rack".to_string(),
            category: Some("IT".to_string()),
            owner: Some("Infrastructure".to_string()),
            status: Some("active".to_string()),
            location: Some("Data Center 2".to_string()),
            value: Some(12400.00),
            purchase_date: NaiveDate::from_ymd_opt(2022, 11, 3),
            metadata: Some("42U, dual PDU".to_string()),
        },
    ]
}

/// Returns true when the admin user was created
pub async fn seed_admin_user(pool: &SqlitePool, seed: &SeedConfig) -> Result<bool, DatabaseError> {
    let credentials = CredentialStore::new(pool.clone());
    if credentials.count().await? > 0 {
        info!("admin user already present, skipping seed");
        return Ok(false);
    }

    info!(username = %seed.admin_username, "seeding default admin user");
    credentials
        .create_user(&seed.admin_username, &seed.admin_password, "admin")
        .await?;
    Ok(true)
}

/// Returns the number of sample assets inserted
pub async fn seed_assets(pool: &SqlitePool) -> Result<usize, DatabaseError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(1) FROM asset")
        .fetch_one(pool)
        .await?;
    if count > 0 {
        info!("asset table already contains records, skipping seed");
        return Ok(0);
    }

    info!("seeding sample asset records");
    let store = AssetStore::new(pool.clone());
    let samples = sample_assets();
    for asset in &samples {
        store.create(asset).await?;
    }
    Ok(samples.len())
}

pub async fn initialize(pool: &SqlitePool, seed: &SeedConfig) -> Result<(), DatabaseError> {
    seed_admin_user(pool, seed).await?;
    seed_assets(pool).await?;
    info!("database initialization complete");
    Ok(())
}
