use axum::{
    extract::{ConnectInfo, Request},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use std::net::SocketAddr;
use std::time::Instant;

use super::auth::AuthUser;

/// Log one line per request once the response is ready, whatever its status
pub async fn request_log_middleware(request: Request, next: Next) -> Response {
    let started = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let client_ip = client_ip(request.headers(), peer);

    let response = next.run(request).await;

    let duration_ms = (started.elapsed().as_secs_f64() * 100_000.0).round() / 100.0;
    let user = response
        .extensions()
        .get::<AuthUser>()
        .map(|u| u.subject.as_str())
        .unwrap_or("anonymous");

    tracing::info!(
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        duration_ms,
        ip = %client_ip,
        user = %user,
        "request"
    );

    response
}

/// First `X-Forwarded-For` hop when behind a proxy, else the socket peer
fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|ip| ip.trim().to_string())
        .filter(|ip| !ip.is_empty())
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| "-".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn prefers_first_forwarded_hop() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.7, 10.0.0.1"),
        );
        let peer = Some(SocketAddr::from(([127, 0, 0, 1], 5000)));
        assert_eq!(client_ip(&headers, peer), "203.0.113.7");
    }

    #[test]
    fn falls_back_to_peer_then_dash() {
        let peer = Some(SocketAddr::from(([192, 168, 1, 20], 5000)));
        assert_eq!(client_ip(&HeaderMap::new(), peer), "192.168.1.20");
        assert_eq!(client_ip(&HeaderMap::new(), None), "-");
    }
}
