use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use super::manager::DatabaseError;
use super::models::{Asset, AssetChanges, NewAsset};

const ASSET_COLUMNS: &str =
    "id, name, category, owner, status, location, value, purchase_date, metadata, created_at, updated_at";

/// Single-table persistence for assets. Every operation is one SQL statement.
#[derive(Clone)]
pub struct AssetStore {
    pool: SqlitePool,
}

impl AssetStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, asset: &NewAsset) -> Result<Asset, DatabaseError> {
        let sql = format!(
            "INSERT INTO asset (name, category, owner, status, location, value, purchase_date, metadata) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?) RETURNING {ASSET_COLUMNS}"
        );

        let created = sqlx::query_as::<_, Asset>(&sql)
            .bind(asset.name.as_str())
            .bind(asset.category.as_deref())
            .bind(asset.owner.as_deref())
            .bind(asset.status.as_deref())
            .bind(asset.location.as_deref())
            .bind(asset.value)
            .bind(asset.purchase_date)
            .bind(asset.metadata.as_deref())
            .fetch_one(&self.pool)
            .await?;

        Ok(created)
    }

    pub async fn get_one(&self, id: i64) -> Result<Asset, DatabaseError> {
        let sql = format!("SELECT {ASSET_COLUMNS} FROM asset WHERE id = ?");

        sqlx::query_as::<_, Asset>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound("Asset not found".to_string()))
    }

    /// All assets, newest first
    pub async fn get_all(&self) -> Result<Vec<Asset>, DatabaseError> {
        let sql = format!("SELECT {ASSET_COLUMNS} FROM asset ORDER BY id DESC");

        let assets = sqlx::query_as::<_, Asset>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(assets)
    }

    /// Overwrite the columns present in `changes` and stamp `updated_at`
    pub async fn update(&self, id: i64, changes: AssetChanges) -> Result<Asset, DatabaseError> {
        macro_rules! set_if_present {
            ($set:expr, $column:literal, $value:expr) => {
                if let Some(value) = $value {
                    $set.push(concat!($column, " = ")).push_bind_unseparated(value);
                }
            };
        }

        let mut builder = QueryBuilder::<Sqlite>::new("UPDATE asset SET ");
        let mut set = builder.separated(", ");
        set_if_present!(set, "name", changes.name);
        set_if_present!(set, "category", changes.category);
        set_if_present!(set, "owner", changes.owner);
        set_if_present!(set, "status", changes.status);
        set_if_present!(set, "location", changes.location);
        set_if_present!(set, "value", changes.value);
        set_if_present!(set, "purchase_date", changes.purchase_date);
        set_if_present!(set, "metadata", changes.metadata);
        set.push("updated_at = CURRENT_TIMESTAMP");

        builder.push(" WHERE id = ");
        builder.push_bind(id);
        builder.push(format!(" RETURNING {ASSET_COLUMNS}"));

        builder
            .build_query_as::<Asset>()
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound("Asset not found".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestDatabase;
    use chrono::NaiveDate;

    fn thermal_camera() -> NewAsset {
        NewAsset {
            name: "Thermal Camera".to_string(),
            category: Some("Diagnostics".to_string()),
            owner: Some("Maintenance".to_string()),
            status: Some("active".to_string()),
            location: Some("Warehouse A".to_string()),
            value: Some(2850.0),
            purchase_date: NaiveDate::from_ymd_opt(2023, 5, 17),
            metadata: Some("Calibrated Q4".to_string()),
        }
    }

    #[tokio::test]
    async fn create_then_get_returns_same_fields() {
        let db = TestDatabase::new().await.unwrap();
        let store = AssetStore::new(db.pool.clone());

        let input = thermal_camera();
        let created = store.create(&input).await.unwrap();
        let fetched = store.get_one(created.id).await.unwrap();

        assert_eq!(created, fetched);
        assert_eq!(fetched.name, input.name);
        assert_eq!(fetched.category, input.category);
        assert_eq!(fetched.owner, input.owner);
        assert_eq!(fetched.status, input.status);
        assert_eq!(fetched.location, input.location);
        assert_eq!(fetched.value, input.value);
        assert_eq!(fetched.purchase_date, input.purchase_date);
        assert_eq!(fetched.metadata, input.metadata);
        assert!(fetched.updated_at.is_none());
    }

    #[tokio::test]
    async fn ids_are_assigned_in_sequence() {
        let db = TestDatabase::new().await.unwrap();
        let store = AssetStore::new(db.pool.clone());

        let first = store.create(&thermal_camera()).await.unwrap();
        let second = store
            .create(&NewAsset {
                name: "Server Rack".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        assert!(second.id > first.id);
        assert_eq!(second.category, None);

        let all = store.get_all().await.unwrap();
        let ids: Vec<i64> = all.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[tokio::test]
    async fn get_missing_is_not_found() {
        let db = TestDatabase::new().await.unwrap();
        let store = AssetStore::new(db.pool.clone());

        assert!(matches!(
            store.get_one(999).await,
            Err(DatabaseError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn update_merges_provided_fields() {
        let db = TestDatabase::new().await.unwrap();
        let store = AssetStore::new(db.pool.clone());
        let created = store.create(&thermal_camera()).await.unwrap();

        let updated = store
            .update(
                created.id,
                AssetChanges {
                    status: Some("retired".to_string()),
                    value: Some(100.5),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.status.as_deref(), Some("retired"));
        assert_eq!(updated.value, Some(100.5));
        assert_eq!(updated.name, created.name);
        assert_eq!(updated.location, created.location);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at.is_some());

        let reread = store.get_one(created.id).await.unwrap();
        assert_eq!(reread, updated);
    }

    #[tokio::test]
    async fn update_missing_is_not_found() {
        let db = TestDatabase::new().await.unwrap();
        let store = AssetStore::new(db.pool.clone());

        let result = store
            .update(
                42,
                AssetChanges {
                    name: Some("Ghost".to_string()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(DatabaseError::NotFound(_))));
        assert!(store.get_all().await.unwrap().is_empty());
    }
}
