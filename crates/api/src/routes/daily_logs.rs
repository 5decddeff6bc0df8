//! Daily log routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::{DailyLog, NewDailyLog};

use super::parse_payload;
use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::JsonPayload;

/// GET /api/daily-logs
pub async fn list_daily_logs(
    State(state): State<AppState>,
) -> Result<Json<Vec<DailyLog>>, ApiError> {
    let logs = state
        .store
        .list_daily_logs()
        .await
        .map_err(|e| ApiError::store("Failed to fetch daily logs", e))?;
    Ok(Json(logs))
}

/// GET /api/daily-logs/:id
pub async fn get_daily_log(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DailyLog>, ApiError> {
    state
        .store
        .get_daily_log(&id)
        .await
        .map_err(|e| ApiError::store("Failed to fetch daily log", e))?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Daily log not found".to_string()))
}

/// POST /api/daily-logs
///
/// The timestamp is assigned by the store; a `timestamp` in the body is ignored.
pub async fn create_daily_log(
    State(state): State<AppState>,
    JsonPayload(raw): JsonPayload,
) -> Result<(StatusCode, Json<DailyLog>), ApiError> {
    let new_log: NewDailyLog = parse_payload(&raw, "Invalid daily log data")?;
    let log = state
        .store
        .create_daily_log(new_log)
        .await
        .map_err(|e| ApiError::store("Failed to create daily log", e))?;

    tracing::info!(log_id = %log.id, "Daily log created");
    Ok((StatusCode::CREATED, Json(log)))
}
