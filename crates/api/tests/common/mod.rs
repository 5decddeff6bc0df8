//! Common test utilities for integration tests.
//!
//! Every app built here runs on the in-memory store with a scripted text
//! generator, so the tests need no network and no external services.

// Not every integration test binary uses every helper.
#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request},
    response::Response,
    Router,
};
use carehome_api::{
    app::{create_app, AppState},
    config::{
        AiConfig, BootstrapConfig, Config, LoggingConfig, SecurityConfig, ServerConfig,
        SessionConfig,
    },
    services::bootstrap_users,
};
use domain::models::{
    DailyLog, Document, Event, Incident, NewDailyLog, NewDocument, NewEvent, NewIncident,
    NewResident, NewStaff, NewUser, Resident, Staff, User,
};
use domain::services::{AiAssistant, MockTextGenerator, TextGenerator};
use persistence::{EntityStore, MemoryStore, StoreError};
use serde_json::Value;
use tower::ServiceExt;

pub const COOKIE_NAME: &str = "carehome.sid";
pub const ADMIN_PASSWORD: &str = "admin123";
pub const STAFF_PASSWORD: &str = "staff123";

/// Test configuration: rate limiting off, short AI timeout.
pub fn test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 5000,
            request_timeout_secs: 30,
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
            format: "pretty".to_string(),
        },
        security: SecurityConfig {
            cors_origins: vec![],
            rate_limit_per_minute: 0, // Disable rate limiting for tests
            hsts_enabled: false,
        },
        session: SessionConfig {
            ttl_secs: 3600,
            prune_interval_secs: 300,
            secure_cookie: false,
            cookie_name: COOKIE_NAME.to_string(),
        },
        ai: AiConfig {
            api_key: None,
            timeout_ms: 200,
            ..AiConfig::default()
        },
        bootstrap: BootstrapConfig {
            enabled: true,
            admin_password: ADMIN_PASSWORD.to_string(),
            staff_password: STAFF_PASSWORD.to_string(),
        },
    }
}

/// A router plus the state behind it.
#[derive(Clone)]
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Logs in and returns a `Cookie` header value.
    pub async fn login(&self, username: &str, password: &str) -> String {
        let response = self
            .send(json_request(
                Method::POST,
                "/api/login",
                serde_json::json!({"username": username, "password": password}),
                None,
            ))
            .await;
        assert_eq!(response.status(), 200, "login as {} failed", username);
        session_cookie(&response).expect("login response has no session cookie")
    }

    pub async fn login_admin(&self) -> String {
        self.login("admin", ADMIN_PASSWORD).await
    }
}

/// App on a fresh memory store. `generator: None` runs AI in fallback mode.
pub async fn create_test_app(
    config: Config,
    generator: Option<Arc<dyn TextGenerator>>,
) -> TestApp {
    create_test_app_with_store(config, Arc::new(MemoryStore::new()), generator).await
}

pub async fn create_test_app_with_store(
    config: Config,
    store: Arc<dyn EntityStore>,
    generator: Option<Arc<dyn TextGenerator>>,
) -> TestApp {
    config.validate().expect("invalid test config");
    bootstrap_users(store.as_ref(), &config.bootstrap)
        .await
        .expect("bootstrap failed");

    let ai = AiAssistant::new(generator, config.ai.timeout());
    let state = AppState::new(config, store, ai);
    TestApp {
        router: create_app(state.clone()),
        state,
    }
}

/// App with no AI credential.
pub async fn default_app() -> TestApp {
    create_test_app(test_config(), None).await
}

/// App whose text generator is the given mock.
pub async fn app_with_generator(generator: MockTextGenerator) -> TestApp {
    create_test_app(test_config(), Some(Arc::new(generator))).await
}

/// Helper to create a JSON request, optionally carrying a session cookie.
pub fn json_request(method: Method, uri: &str, body: Value, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

/// Helper to create a raw-body POST request.
pub fn raw_request(uri: &str, body: &'static str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body)).unwrap()
}

/// Helper to create a GET request.
pub fn get_request(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(Method::GET).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

/// Helper to parse JSON response body.
pub async fn parse_response_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap_or(Value::Null)
}

/// The `name=value` part of the session Set-Cookie header, if any.
pub fn session_cookie(response: &Response) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| v.split(';').next())
        .find(|pair| pair.starts_with(&format!("{}=", COOKIE_NAME)))
        .map(str::to_string)
}

/// Resident payload from the walkthrough scenario.
pub fn resident_payload() -> Value {
    serde_json::json!({
        "name": "Alex Matthews",
        "age": 14,
        "dateOfBirth": "2010-01-15",
        "gender": "Male",
        "room": "12",
        "status": "present",
        "admissionDate": "2023-03-20"
    })
}

/// Store whose user operations work and whose entity operations fail.
///
/// Lets a test authenticate and then observe the 500 paths.
#[derive(Default)]
pub struct FlakyStore {
    users: MemoryStore,
}

fn unavailable<T>() -> Result<T, StoreError> {
    Err(StoreError::Unavailable("simulated outage".to_string()))
}

#[async_trait]
impl EntityStore for FlakyStore {
    async fn create_user(&self, user: NewUser) -> Result<User, StoreError> {
        self.users.create_user(user).await
    }
    async fn get_user(&self, id: i32) -> Result<Option<User>, StoreError> {
        self.users.get_user(id).await
    }
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        self.users.find_user_by_username(username).await
    }
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        self.users.find_user_by_email(email).await
    }

    async fn create_resident(&self, _: NewResident) -> Result<Resident, StoreError> {
        unavailable()
    }
    async fn get_resident(&self, _: i32) -> Result<Option<Resident>, StoreError> {
        unavailable()
    }
    async fn list_residents(&self) -> Result<Vec<Resident>, StoreError> {
        unavailable()
    }

    async fn create_staff(&self, _: NewStaff) -> Result<Staff, StoreError> {
        unavailable()
    }
    async fn get_staff(&self, _: i32) -> Result<Option<Staff>, StoreError> {
        unavailable()
    }
    async fn list_staff(&self) -> Result<Vec<Staff>, StoreError> {
        unavailable()
    }

    async fn create_daily_log(&self, _: NewDailyLog) -> Result<DailyLog, StoreError> {
        unavailable()
    }
    async fn get_daily_log(&self, _: &str) -> Result<Option<DailyLog>, StoreError> {
        unavailable()
    }
    async fn list_daily_logs(&self) -> Result<Vec<DailyLog>, StoreError> {
        unavailable()
    }

    async fn create_incident(&self, _: NewIncident) -> Result<Incident, StoreError> {
        unavailable()
    }
    async fn get_incident(&self, _: &str) -> Result<Option<Incident>, StoreError> {
        unavailable()
    }
    async fn list_incidents(&self) -> Result<Vec<Incident>, StoreError> {
        unavailable()
    }

    async fn create_event(&self, _: NewEvent) -> Result<Event, StoreError> {
        unavailable()
    }
    async fn get_event(&self, _: &str) -> Result<Option<Event>, StoreError> {
        unavailable()
    }
    async fn list_events(&self) -> Result<Vec<Event>, StoreError> {
        unavailable()
    }

    async fn create_document(&self, _: NewDocument) -> Result<Document, StoreError> {
        unavailable()
    }
    async fn get_document(&self, _: &str) -> Result<Option<Document>, StoreError> {
        unavailable()
    }
    async fn list_documents(&self) -> Result<Vec<Document>, StoreError> {
        unavailable()
    }

    async fn ping(&self) -> Result<(), StoreError> {
        unavailable()
    }
}

/// App backed by a [`FlakyStore`].
pub async fn flaky_app() -> TestApp {
    create_test_app_with_store(test_config(), Arc::new(FlakyStore::default()), None).await
}
