use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::auth::AuthError;
use crate::error::ApiError;
use crate::server::AppState;

/// Authenticated identity extracted from the bearer token
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub subject: String,
}

/// Bearer authentication for protected routes.
///
/// On success the verified [`AuthUser`] is inserted into the request
/// extensions for handlers, and into the response extensions so the request
/// log can report who made the call.
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(request.headers()).map_err(|e| {
        tracing::warn!(path = %request.uri().path(), "missing bearer token");
        e
    })?;

    let subject = state.tokens.verify(token).map_err(|e| {
        tracing::warn!(path = %request.uri().path(), reason = %e, "rejected bearer token");
        e
    })?;

    let auth_user = AuthUser { subject };
    request.extensions_mut().insert(auth_user.clone());

    let mut response = next.run(request).await;
    response.extensions_mut().insert(auth_user);
    Ok(response)
}

/// Extract the token from an `Authorization: Bearer <token>` header
fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let auth_str = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(AuthError::Missing)?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim()),
        _ => Err(AuthError::Missing),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn extracts_bearer_token() {
        let headers = headers_with("Bearer abc.def.ghi");
        assert_eq!(extract_bearer_token(&headers).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn missing_or_malformed_header_is_missing() {
        assert!(matches!(
            extract_bearer_token(&HeaderMap::new()),
            Err(AuthError::Missing)
        ));
        assert!(matches!(
            extract_bearer_token(&headers_with("Basic YWRtaW46cGFzc3dvcmQ=")),
            Err(AuthError::Missing)
        ));
        assert!(matches!(
            extract_bearer_token(&headers_with("Bearer   ")),
            Err(AuthError::Missing)
        ));
    }
}
