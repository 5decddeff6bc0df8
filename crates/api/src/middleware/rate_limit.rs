//! Rate limiting middleware.
//!
//! Per-client limiting with a keyed GCRA limiter. A client is identified by
//! the hash of a live session token, else the first `X-Forwarded-For` hop,
//! else the peer address. Cookies that do not resolve to a session are
//! ignored, so rotating them never yields a fresh bucket.

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{header, HeaderMap, HeaderValue, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use governor::{
    clock::{Clock, DefaultClock},
    state::keyed::DefaultKeyedStateStore,
    Quota, RateLimiter as GovRateLimiter,
};
use serde_json::json;
use shared::crypto::sha256_hex;
use std::net::SocketAddr;
use std::num::NonZeroU32;

use crate::app::AppState;

type KeyedRateLimiter = GovRateLimiter<String, DefaultKeyedStateStore<String>, DefaultClock>;

/// Rate limiter state shared across all requests.
pub struct RateLimiterState {
    limiter: KeyedRateLimiter,
    clock: DefaultClock,
    rate_limit_per_minute: u32,
}

impl RateLimiterState {
    /// Create a limiter, or `None` when `rate_limit_per_minute` is 0 (disabled).
    pub fn new(rate_limit_per_minute: u32) -> Option<Self> {
        let per_minute = NonZeroU32::new(rate_limit_per_minute)?;
        Some(Self {
            limiter: GovRateLimiter::keyed(Quota::per_minute(per_minute)),
            clock: DefaultClock::default(),
            rate_limit_per_minute,
        })
    }

    pub fn rate_limit_per_minute(&self) -> u32 {
        self.rate_limit_per_minute
    }

    /// Check if a request from `key` should be allowed.
    /// Returns Ok(()) if allowed, or Err with retry-after seconds if rate limited.
    pub fn check(&self, key: &str) -> Result<(), u64> {
        self.limiter.check_key(&key.to_string()).map_err(|not_until| {
            // Minimum 1 second
            not_until.wait_time_from(self.clock.now()).as_secs().max(1)
        })
    }

    /// Drop state for clients whose buckets have fully refilled.
    pub fn retain_recent(&self) {
        self.limiter.retain_recent();
    }

    /// Number of clients currently tracked.
    pub fn tracked_clients(&self) -> usize {
        self.limiter.len()
    }
}

impl std::fmt::Debug for RateLimiterState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiterState")
            .field("rate_limit_per_minute", &self.rate_limit_per_minute)
            .field("tracked_clients", &self.tracked_clients())
            .finish()
    }
}

/// Derive the rate-limit bucket for a request.
///
/// `live_session` must only carry a token that resolved to a session.
pub fn client_key(
    headers: &HeaderMap,
    live_session: Option<&str>,
    peer: Option<SocketAddr>,
) -> String {
    if let Some(token) = live_session {
        return format!("session:{}", sha256_hex(token));
    }

    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty());

    match (forwarded, peer) {
        (Some(ip), _) => format!("ip:{}", ip),
        (None, Some(addr)) => format!("ip:{}", addr.ip()),
        (None, None) => "anonymous".to_string(),
    }
}

/// Middleware that applies per-client rate limiting.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    peer: Option<ConnectInfo<SocketAddr>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(ref rate_limiter) = state.rate_limiter {
        let token = state.cookies.extract_token(req.headers()).map(str::to_string);
        let live_session = match token {
            Some(token) => state.sessions.resolve(&token).await.map(|_| token),
            None => None,
        };
        let peer = peer.map(|ConnectInfo(addr)| addr);

        let key = client_key(req.headers(), live_session.as_deref(), peer);
        if let Err(retry_after) = rate_limiter.check(&key) {
            tracing::debug!(retry_after, "Rate limit exceeded");
            return rate_limited_response(rate_limiter.rate_limit_per_minute(), retry_after);
        }
    }

    next.run(req).await
}

/// Create a rate limited response with proper headers and body.
fn rate_limited_response(limit: u32, retry_after: u64) -> Response {
    let body = json!({
        "error": "rate_limited",
        "message": format!("Rate limit of {} requests/minute exceeded", limit),
        "retryAfter": retry_after
    });

    let mut response = (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response();
    response
        .headers_mut()
        .insert(header::RETRY_AFTER, HeaderValue::from(retry_after));

    response
}
