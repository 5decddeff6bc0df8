//! Resident routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::{NewResident, Resident};

use super::{parse_int_id, parse_payload};
use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::JsonPayload;

/// List all residents.
///
/// GET /api/residents
pub async fn list_residents(State(state): State<AppState>) -> Result<Json<Vec<Resident>>, ApiError> {
    let residents = state
        .store
        .list_residents()
        .await
        .map_err(|e| ApiError::store("Failed to fetch residents", e))?;
    Ok(Json(residents))
}

/// Get a resident by id.
///
/// GET /api/residents/:id
pub async fn get_resident(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Resident>, ApiError> {
    let id = parse_int_id(&id, "Resident not found")?;
    state
        .store
        .get_resident(id)
        .await
        .map_err(|e| ApiError::store("Failed to fetch resident", e))?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Resident not found".to_string()))
}

/// Create a resident.
///
/// POST /api/residents
pub async fn create_resident(
    State(state): State<AppState>,
    JsonPayload(raw): JsonPayload,
) -> Result<(StatusCode, Json<Resident>), ApiError> {
    let new_resident: NewResident = parse_payload(&raw, "Invalid resident data")?;
    let resident = state
        .store
        .create_resident(new_resident)
        .await
        .map_err(|e| ApiError::store("Failed to create resident", e))?;

    tracing::info!(resident_id = resident.id, "Resident created");
    Ok((StatusCode::CREATED, Json(resident)))
}
