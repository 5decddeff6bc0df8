//! Integration tests for the cross-cutting HTTP surface.

mod common;

use std::net::SocketAddr;

use axum::body::Body;
use axum::extract::connect_info::MockConnectInfo;
use axum::http::{header, Method, Request, StatusCode};
use carehome_api::middleware::init_metrics;
use common::{
    create_test_app, default_app, flaky_app, get_request, json_request, parse_response_body,
    test_config,
};
use serde_json::json;
use tower::ServiceExt;

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health() {
    let app = default_app().await;
    let response = app.send(get_request("/api/health", None)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_response_body(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["store"]["reachable"], true);
    assert!(body["store"]["latencyMs"].is_u64());
    assert_eq!(body["ai"]["configured"], false);
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_probes() {
    let app = default_app().await;

    let live = app.send(get_request("/api/health/live", None)).await;
    assert_eq!(live.status(), StatusCode::OK);
    assert_eq!(parse_response_body(live).await, json!({"status": "alive"}));

    let ready = app.send(get_request("/api/health/ready", None)).await;
    assert_eq!(ready.status(), StatusCode::OK);
    assert_eq!(parse_response_body(ready).await, json!({"status": "ready"}));
}

#[tokio::test]
async fn test_health_unreachable_store() {
    let app = flaky_app().await;

    let response = app.send(get_request("/api/health", None)).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(parse_response_body(response).await["store"]["reachable"], false);

    let ready = app.send(get_request("/api/health/ready", None)).await;
    assert_eq!(ready.status(), StatusCode::SERVICE_UNAVAILABLE);
}

// ============================================================================
// Routing and headers
// ============================================================================

#[tokio::test]
async fn test_unknown_route() {
    let app = default_app().await;
    let response = app.send(get_request("/api/nope", None)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        parse_response_body(response).await,
        json!({"error": "not_found", "message": "Route not found"})
    );
}

#[tokio::test]
async fn test_security_headers() {
    let app = default_app().await;
    let response = app.send(get_request("/api/health/live", None)).await;

    let headers = response.headers();
    assert_eq!(headers.get("x-content-type-options").unwrap(), "nosniff");
    assert_eq!(headers.get("x-frame-options").unwrap(), "DENY");
    assert_eq!(headers.get("x-xss-protection").unwrap(), "1; mode=block");
    assert!(headers.get(header::STRICT_TRANSPORT_SECURITY).is_none());
}

#[tokio::test]
async fn test_hsts_when_enabled() {
    let mut config = test_config();
    config.security.hsts_enabled = true;
    let app = create_test_app(config, None).await;

    let response = app.send(get_request("/api/health/live", None)).await;
    assert!(response
        .headers()
        .get(header::STRICT_TRANSPORT_SECURITY)
        .is_some());
}

#[tokio::test]
async fn test_request_id_echoed_or_generated() {
    let app = default_app().await;

    let request = Request::builder()
        .uri("/api/health/live")
        .header("x-request-id", "req-abc-123")
        .body(Body::empty())
        .unwrap();
    let response = app.send(request).await;
    assert_eq!(response.headers().get("x-request-id").unwrap(), "req-abc-123");

    let response = app.send(get_request("/api/health/live", None)).await;
    let generated = response.headers().get("x-request-id").unwrap().to_str().unwrap();
    assert!(uuid::Uuid::parse_str(generated).is_ok());
}

#[tokio::test]
async fn test_cors_allows_credentials() {
    let app = default_app().await;
    let request = Request::builder()
        .uri("/api/health/live")
        .header(header::ORIGIN, "http://localhost:5173")
        .body(Body::empty())
        .unwrap();
    let response = app.send(request).await;

    let headers = response.headers();
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "http://localhost:5173"
    );
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(),
        "true"
    );
}

// ============================================================================
// Rate limiting
// ============================================================================

#[tokio::test]
async fn test_rate_limit() {
    let mut config = test_config();
    config.security.rate_limit_per_minute = 2;
    let app = create_test_app(config, None).await;

    let login = || {
        json_request(
            Method::POST,
            "/api/login",
            json!({"username": "ghost", "password": "x"}),
            None,
        )
    };

    assert_eq!(app.send(login()).await.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(app.send(login()).await.status(), StatusCode::UNAUTHORIZED);

    let limited = app.send(login()).await;
    assert_eq!(limited.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(limited.headers().get(header::RETRY_AFTER).is_some());
    assert_eq!(parse_response_body(limited).await["error"], "rate_limited");

    // Probes are not limited
    let live = app.send(get_request("/api/health/live", None)).await;
    assert_eq!(live.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_rate_limit_ignores_rotating_bogus_cookies() {
    let mut config = test_config();
    config.security.rate_limit_per_minute = 2;
    let app = create_test_app(config, None).await;

    let mut limited = 0;
    for i in 0..20 {
        let cookie = format!("carehome.sid=bogus{}", i);
        let response = app
            .send(json_request(
                Method::POST,
                "/api/login",
                json!({"username": "admin", "password": format!("guess{}", i)}),
                Some(&cookie),
            ))
            .await;
        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            limited += 1;
        }
    }
    assert_eq!(limited, 18);
}

#[tokio::test]
async fn test_rate_limit_buckets_per_peer_address() {
    let mut config = test_config();
    config.security.rate_limit_per_minute = 1;
    let app = create_test_app(config, None).await;

    let from = |addr: &str| {
        let peer: SocketAddr = addr.parse().unwrap();
        app.router.clone().layer(MockConnectInfo(peer))
    };
    let login = || {
        json_request(
            Method::POST,
            "/api/login",
            json!({"username": "ghost", "password": "x"}),
            None,
        )
    };

    let first = from("192.0.2.1:40000");
    let second = from("192.0.2.2:40000");

    let response = first.clone().oneshot(login()).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let response = first.oneshot(login()).await.unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

    // Another client is unaffected
    let response = second.oneshot(login()).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_rate_limit_live_session_has_own_bucket() {
    let mut config = test_config();
    config.security.rate_limit_per_minute = 2;
    let app = create_test_app(config, None).await;

    // Login itself counts against the anonymous bucket
    let cookie = app.login_admin().await;

    let anonymous = app
        .send(json_request(
            Method::POST,
            "/api/login",
            json!({"username": "ghost", "password": "x"}),
            None,
        ))
        .await;
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);
    let anonymous = app
        .send(json_request(
            Method::POST,
            "/api/login",
            json!({"username": "ghost", "password": "x"}),
            None,
        ))
        .await;
    assert_eq!(anonymous.status(), StatusCode::TOO_MANY_REQUESTS);

    for _ in 0..2 {
        let response = app.send(get_request("/api/user", Some(&cookie))).await;
        assert_eq!(response.status(), StatusCode::OK);
    }
    let response = app.send(get_request("/api/user", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
}

// ============================================================================
// Metrics
// ============================================================================

#[tokio::test]
async fn test_metrics_endpoint() {
    let installed = init_metrics();
    let app = default_app().await;
    app.send(get_request("/api/health/live", None)).await;

    let response = app.send(get_request("/metrics", None)).await;
    if installed {
        assert_eq!(response.status(), StatusCode::OK);
    } else {
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
