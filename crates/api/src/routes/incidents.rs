//! Incident report routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::{Incident, NewIncident};

use super::parse_payload;
use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::JsonPayload;

/// GET /api/incidents
pub async fn list_incidents(
    State(state): State<AppState>,
) -> Result<Json<Vec<Incident>>, ApiError> {
    let incidents = state
        .store
        .list_incidents()
        .await
        .map_err(|e| ApiError::store("Failed to fetch incidents", e))?;
    Ok(Json(incidents))
}

/// GET /api/incidents/:id
pub async fn get_incident(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Incident>, ApiError> {
    state
        .store
        .get_incident(&id)
        .await
        .map_err(|e| ApiError::store("Failed to fetch incident", e))?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Incident not found".to_string()))
}

/// POST /api/incidents
pub async fn create_incident(
    State(state): State<AppState>,
    JsonPayload(raw): JsonPayload,
) -> Result<(StatusCode, Json<Incident>), ApiError> {
    let new_incident: NewIncident = parse_payload(&raw, "Invalid incident data")?;
    let incident = state
        .store
        .create_incident(new_incident)
        .await
        .map_err(|e| ApiError::store("Failed to create incident", e))?;

    tracing::info!(
        incident_id = %incident.id,
        severity = %incident.report.severity,
        "Incident reported"
    );
    Ok((StatusCode::CREATED, Json(incident)))
}
