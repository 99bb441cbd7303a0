use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::StatusCode,
    Extension, Json,
};

use crate::api::ValidatedJson;
use crate::database::{Asset, AssetChanges, NewAsset};
use crate::error::{ApiError, ApiResult};
use crate::middleware::AuthUser;
use crate::server::AppState;

/// Non-numeric ids can never match a row
fn asset_id(path: Result<Path<i64>, PathRejection>) -> ApiResult<i64> {
    path.map(|Path(id)| id)
        .map_err(|_| ApiError::not_found("Asset not found"))
}

/// GET /api/assets - all assets, newest first
pub async fn list_assets(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Json<Vec<Asset>>> {
    let assets = state.assets.get_all().await?;
    tracing::debug!(subject = %user.subject, count = assets.len(), "listed assets");
    Ok(Json(assets))
}

/// GET /api/asset/:id
pub async fn get_asset(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Asset>> {
    let id = asset_id(path)?;
    let asset = state.assets.get_one(id).await?;
    tracing::debug!(subject = %user.subject, id, "fetched asset");
    Ok(Json(asset))
}

/// POST /api/asset - 201 with the stored row
pub async fn create_asset(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ValidatedJson(asset): ValidatedJson<NewAsset>,
) -> ApiResult<(StatusCode, Json<Asset>)> {
    let created = state.assets.create(&asset).await?;
    tracing::info!(subject = %user.subject, id = created.id, name = %created.name, "created asset");
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /api/asset/:id - merge the provided fields into the stored row
pub async fn update_asset(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    path: Result<Path<i64>, PathRejection>,
    ValidatedJson(changes): ValidatedJson<AssetChanges>,
) -> ApiResult<Json<Asset>> {
    let id = asset_id(path)?;
    let updated = state.assets.update(id, changes).await?;
    tracing::info!(subject = %user.subject, id, "updated asset");
    Ok(Json(updated))
}
