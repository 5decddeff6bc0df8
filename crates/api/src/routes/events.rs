//! Calendar event routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::{Event, NewEvent};

use super::parse_payload;
use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::JsonPayload;

/// GET /api/events
pub async fn list_events(State(state): State<AppState>) -> Result<Json<Vec<Event>>, ApiError> {
    let events = state
        .store
        .list_events()
        .await
        .map_err(|e| ApiError::store("Failed to fetch events", e))?;
    Ok(Json(events))
}

/// GET /api/events/:id
pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Event>, ApiError> {
    state
        .store
        .get_event(&id)
        .await
        .map_err(|e| ApiError::store("Failed to fetch event", e))?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Event not found".to_string()))
}

/// POST /api/events
pub async fn create_event(
    State(state): State<AppState>,
    JsonPayload(raw): JsonPayload,
) -> Result<(StatusCode, Json<Event>), ApiError> {
    let new_event: NewEvent = parse_payload(&raw, "Invalid event data")?;
    let event = state
        .store
        .create_event(new_event)
        .await
        .map_err(|e| ApiError::store("Failed to create event", e))?;

    tracing::info!(event_id = %event.id, "Event created");
    Ok((StatusCode::CREATED, Json(event)))
}
