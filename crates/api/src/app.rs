use std::any::Any;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    error_handling::HandleErrorLayer,
    http::{header, HeaderName, HeaderValue, Method},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    BoxError, Router,
};
use domain::services::AiAssistant;
use persistence::EntityStore;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    compression::CompressionLayer,
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::Config;
use crate::error::ApiError;
use crate::middleware::{
    metrics_handler, metrics_middleware, rate_limit_middleware, require_session,
    security_headers_middleware, trace_id, RateLimiterState,
};
use crate::routes::{ai, auth, daily_logs, documents, events, health, incidents, residents, staff};
use crate::services::{cookies::CookieHelper, sessions::SessionStore};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn EntityStore>,
    pub sessions: Arc<SessionStore>,
    pub cookies: CookieHelper,
    pub ai: Arc<AiAssistant>,
    pub config: Arc<Config>,
    pub rate_limiter: Option<Arc<RateLimiterState>>,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn EntityStore>, ai: AiAssistant) -> Self {
        let sessions = SessionStore::new(Duration::from_secs(config.session.ttl_secs));
        let cookies = CookieHelper::new(&config.session);
        let rate_limiter = RateLimiterState::new(config.security.rate_limit_per_minute).map(Arc::new);

        Self {
            store,
            sessions: Arc::new(sessions),
            cookies,
            ai: Arc::new(ai),
            config: Arc::new(config),
            rate_limiter,
        }
    }
}

pub fn create_app(state: AppState) -> Router {
    let config = state.config.clone();
    let cors = cors_layer(&config.security.cors_origins);

    // Everything under /api except login and register needs a session
    let protected_routes = Router::new()
        .route("/api/logout", post(auth::logout))
        .route("/api/user", get(auth::current_user))
        .route(
            "/api/residents",
            get(residents::list_residents).post(residents::create_resident),
        )
        .route("/api/residents/:id", get(residents::get_resident))
        .route("/api/staff", get(staff::list_staff).post(staff::create_staff))
        .route("/api/staff/:id", get(staff::get_staff))
        .route(
            "/api/daily-logs",
            get(daily_logs::list_daily_logs).post(daily_logs::create_daily_log),
        )
        .route("/api/daily-logs/:id", get(daily_logs::get_daily_log))
        .route(
            "/api/incidents",
            get(incidents::list_incidents).post(incidents::create_incident),
        )
        .route("/api/incidents/:id", get(incidents::get_incident))
        .route("/api/events", get(events::list_events).post(events::create_event))
        .route("/api/events/:id", get(events::get_event))
        .route(
            "/api/documents",
            get(documents::list_documents).post(documents::create_document),
        )
        .route("/api/documents/:id", get(documents::get_document))
        .route("/api/ai/suggestions", post(ai::suggestions))
        .route("/api/ai/prompt", post(ai::prompt))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_session));

    let auth_routes = Router::new()
        .route("/api/login", post(auth::login))
        .route("/api/register", post(auth::register));

    // Rate limiting covers the API surface, not probes or the scrape endpoint
    let api_routes = Router::new()
        .merge(auth_routes)
        .merge(protected_routes)
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ));

    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/live", get(health::live))
        .route("/api/health/ready", get(health::ready))
        .route("/metrics", get(metrics_handler));

    Router::new()
        .merge(api_routes)
        .merge(public_routes)
        .fallback(route_not_found)
        // Global middleware (order matters: bottom layers run first)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            security_headers_middleware,
        ))
        .layer(CompressionLayer::new())
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_middleware_error))
                .timeout(Duration::from_secs(config.server.request_timeout_secs)),
        )
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}

/// Builds the CORS layer. With no configured origins any origin is
/// mirrored back so that credentialed requests still work in development.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new().allow_credentials(true);

    if origins.is_empty() {
        return cors
            .allow_origin(AllowOrigin::mirror_request())
            .allow_methods(AllowMethods::mirror_request())
            .allow_headers(AllowHeaders::mirror_request());
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    cors.allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCEPT,
            HeaderName::from_static("x-request-id"),
        ])
}

async fn route_not_found() -> ApiError {
    ApiError::NotFound("Route not found".to_string())
}

async fn handle_middleware_error(err: BoxError) -> ApiError {
    if err.is::<tower::timeout::error::Elapsed>() {
        tracing::warn!("Request exceeded the server timeout");
        ApiError::Timeout
    } else {
        tracing::error!(error = %err, "Unhandled middleware error");
        ApiError::Internal("Internal server error".to_string())
    }
}

fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = payload
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| payload.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");
    tracing::error!(panic = %detail, "Request handler panicked");

    ApiError::Internal("Internal server error".to_string()).into_response()
}
