//! Staff routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::{NewStaff, Staff};

use super::{parse_int_id, parse_payload};
use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::JsonPayload;

/// GET /api/staff
pub async fn list_staff(State(state): State<AppState>) -> Result<Json<Vec<Staff>>, ApiError> {
    let staff = state
        .store
        .list_staff()
        .await
        .map_err(|e| ApiError::store("Failed to fetch staff", e))?;
    Ok(Json(staff))
}

/// GET /api/staff/:id
pub async fn get_staff(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Staff>, ApiError> {
    let id = parse_int_id(&id, "Staff member not found")?;
    state
        .store
        .get_staff(id)
        .await
        .map_err(|e| ApiError::store("Failed to fetch staff member", e))?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Staff member not found".to_string()))
}

/// POST /api/staff
///
/// A second record with the same email (case-insensitive) is a 409.
pub async fn create_staff(
    State(state): State<AppState>,
    JsonPayload(raw): JsonPayload,
) -> Result<(StatusCode, Json<Staff>), ApiError> {
    let new_staff: NewStaff = parse_payload(&raw, "Invalid staff data")?;
    let staff = state
        .store
        .create_staff(new_staff)
        .await
        .map_err(|e| ApiError::store("Failed to create staff member", e))?;

    tracing::info!(staff_id = staff.id, "Staff member created");
    Ok((StatusCode::CREATED, Json(staff)))
}
