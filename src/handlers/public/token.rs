use axum::{extract::State, Json};

use crate::api::{TokenRequest, TokenResponse, ValidatedJson};
use crate::error::{ApiError, ApiResult};
use crate::server::AppState;

/// POST /api/token - Exchange username and password for a bearer token
///
/// Expected Input:
/// ```json
/// { "username": "admin", "password": "password" }
/// ```
///
/// Expected Output (Success):
/// ```json
/// { "access_token": "eyJhbGciOiJIUzI1NiI...", "token_type": "bearer", "expires_in": 86400 }
/// ```
///
/// Unknown usernames and wrong passwords both answer 401 "Invalid credentials".
pub async fn issue_token(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<TokenRequest>,
) -> ApiResult<Json<TokenResponse>> {
    let authenticated = state
        .credentials
        .verify(&request.username, &request.password)
        .await?;

    if !authenticated {
        tracing::warn!(username = %request.username, "failed_login");
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    let issued = state.tokens.issue(&request.username)?;
    tracing::info!(username = %request.username, expires_in = issued.expires_in, "issued access token");

    Ok(Json(issued.into()))
}
