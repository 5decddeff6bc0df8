//! Authentication routes: login, register, logout and current user.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use domain::models::{FromPayload, LoginRequest, NewUser, RegisterRequest, UserProfile};
use serde::Serialize;
use shared::password::{burn_verification, hash_password, verify_password};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{CurrentUser, JsonPayload};
use crate::middleware::metrics::record_login_attempt;

const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// Response body for logout.
#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub message: String,
}

/// Log in with username and password.
///
/// POST /api/login
///
/// Unknown usernames and wrong passwords produce the same 401.
pub async fn login(
    State(state): State<AppState>,
    JsonPayload(raw): JsonPayload,
) -> Result<(HeaderMap, Json<UserProfile>), ApiError> {
    let request = LoginRequest::from_payload(&raw).map_err(|errors| {
        record_login_attempt("invalid_request");
        ApiError::invalid("Invalid login data", errors)
    })?;

    let Some(user) = state.store.find_user_by_username(&request.username).await? else {
        burn_verification(&request.password);
        record_login_attempt("invalid_credentials");
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    };

    if !verify_password(&request.password, &user.password_hash)? {
        record_login_attempt("invalid_credentials");
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }

    let token = state.sessions.create(user.id).await;
    let mut headers = HeaderMap::new();
    state.cookies.add_session_cookie(&mut headers, &token);

    record_login_attempt("success");
    tracing::info!(user_id = user.id, username = %user.username, "User logged in");

    Ok((headers, Json(UserProfile::from(&user))))
}

/// Register a new account and log it in.
///
/// POST /api/register
pub async fn register(
    State(state): State<AppState>,
    JsonPayload(raw): JsonPayload,
) -> Result<(StatusCode, HeaderMap, Json<UserProfile>), ApiError> {
    let request = RegisterRequest::from_payload(&raw)
        .map_err(|errors| ApiError::invalid("Invalid user data", errors))?;

    if state
        .store
        .find_user_by_username(&request.username)
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict("Username already exists".to_string()));
    }
    if state.store.find_user_by_email(&request.email).await?.is_some() {
        return Err(ApiError::Conflict("Email already exists".to_string()));
    }

    let new_user = NewUser {
        username: request.username,
        email: request.email,
        password_hash: hash_password(&request.password)?,
        role: request.role,
        name: request.name,
        position: request.position,
    };

    // A concurrent registration can still win the race; the store re-checks
    // uniqueness under its lock and reports a conflict.
    let user = state
        .store
        .create_user(new_user)
        .await
        .map_err(|e| ApiError::store("Failed to create user", e))?;

    let token = state.sessions.create(user.id).await;
    let mut headers = HeaderMap::new();
    state.cookies.add_session_cookie(&mut headers, &token);

    tracing::info!(user_id = user.id, role = %user.role, "User registered");

    Ok((StatusCode::CREATED, headers, Json(UserProfile::from(&user))))
}

/// End the current session.
///
/// POST /api/logout
pub async fn logout(
    State(state): State<AppState>,
    current: CurrentUser,
) -> (HeaderMap, Json<LogoutResponse>) {
    state.sessions.revoke(&current.session_token).await;

    let mut headers = HeaderMap::new();
    state.cookies.add_clear_cookie(&mut headers);

    tracing::info!(user_id = current.user.id, "User logged out");

    (
        headers,
        Json(LogoutResponse {
            message: "Logged out".to_string(),
        }),
    )
}

/// Profile of the logged-in user.
///
/// GET /api/user
pub async fn current_user(current: CurrentUser) -> Json<UserProfile> {
    Json(UserProfile::from(&current.user))
}
