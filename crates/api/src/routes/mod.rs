//! HTTP route handlers.

pub mod ai;
pub mod auth;
pub mod daily_logs;
pub mod documents;
pub mod events;
pub mod health;
pub mod incidents;
pub mod residents;
pub mod staff;

use domain::models::FromPayload;
use serde_json::Value;

use crate::error::ApiError;

/// Validates a create payload, reporting failures under `message`.
pub(crate) fn parse_payload<T: FromPayload>(raw: &Value, message: &str) -> Result<T, ApiError> {
    T::from_payload(raw).map_err(|errors| ApiError::invalid(message, errors))
}

/// Parses an integer path id. Unparseable ids are indistinguishable from
/// absent ones.
pub(crate) fn parse_int_id(raw: &str, not_found: &str) -> Result<i32, ApiError> {
    raw.parse::<i32>()
        .map_err(|_| ApiError::NotFound(not_found.to_string()))
}
