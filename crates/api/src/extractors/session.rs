//! Authenticated-user extractor.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use domain::models::User;

use crate::error::ApiError;

/// The user behind the request's session.
///
/// Inserted into request extensions by
/// [`require_session`](crate::middleware::require_session); extracting it on
/// a route without that middleware always fails with 401.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
    /// Raw token from the session cookie.
    pub session_token: String,
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(|| ApiError::Unauthorized("Unauthorized".to_string()))
    }
}
