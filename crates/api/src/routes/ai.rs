//! AI-assist routes.
//!
//! Both endpoints answer 200 whenever the request itself is well formed;
//! upstream failures surface only as `aiAvailable: false`.

use axum::{extract::State, Json};
use domain::services::{PromptOutcome, SuggestionsOutcome};
use serde_json::Value;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::JsonPayload;
use crate::middleware::metrics::record_ai_request;

/// Reads a non-empty string field from the body.
fn required_text<'a>(raw: &'a Value, field: &str) -> Option<&'a str> {
    raw.get(field)
        .and_then(Value::as_str)
        .filter(|text| !text.trim().is_empty())
}

/// Suggest follow-up notes for an incident.
///
/// POST /api/ai/suggestions
pub async fn suggestions(
    State(state): State<AppState>,
    JsonPayload(raw): JsonPayload,
) -> Result<Json<SuggestionsOutcome>, ApiError> {
    let description = required_text(&raw, "incidentDescription").ok_or_else(|| {
        ApiError::BadRequest("Invalid request. Please provide an incident description.".to_string())
    })?;

    let outcome = state.ai.suggest_incident_notes(description).await;
    record_ai_request("suggestions", outcome.ai_available);

    Ok(Json(outcome))
}

/// Answer a free-form prompt.
///
/// POST /api/ai/prompt
pub async fn prompt(
    State(state): State<AppState>,
    JsonPayload(raw): JsonPayload,
) -> Result<Json<PromptOutcome>, ApiError> {
    let prompt = required_text(&raw, "prompt").ok_or_else(|| {
        ApiError::BadRequest("Invalid request. Please provide a prompt.".to_string())
    })?;

    let outcome = state.ai.answer_prompt(prompt).await;
    record_ai_request("prompt", outcome.ai_available);

    Ok(Json(outcome))
}
