//! Session authentication middleware.
//!
//! Resolves the session cookie to a live session and an existing user, and
//! rejects the request with 401 otherwise.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::session::CurrentUser;
use crate::middleware::trace_id::get_request_id;

/// Middleware that requires a valid session.
///
/// On success a [`CurrentUser`] is stored in request extensions for
/// downstream handlers.
pub async fn require_session(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let Some(token) = state.cookies.extract_token(req.headers()).map(str::to_string) else {
        return unauthorized_response();
    };

    let Some(session) = state.sessions.resolve(&token).await else {
        tracing::debug!(
            request_id = %get_request_id(req.extensions()),
            "Unknown or expired session"
        );
        return unauthorized_response();
    };

    match state.store.get_user(session.user_id).await {
        Ok(Some(user)) => {
            req.extensions_mut().insert(CurrentUser {
                user,
                session_token: token,
            });
            next.run(req).await
        }
        Ok(None) => {
            tracing::warn!(user_id = session.user_id, "Session refers to a missing user");
            state.sessions.revoke(&token).await;
            unauthorized_response()
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}

fn unauthorized_response() -> Response {
    ApiError::Unauthorized("Unauthorized".to_string()).into_response()
}
