//! Document metadata routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::{Document, NewDocument};

use super::parse_payload;
use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::JsonPayload;

/// GET /api/documents
pub async fn list_documents(
    State(state): State<AppState>,
) -> Result<Json<Vec<Document>>, ApiError> {
    let documents = state
        .store
        .list_documents()
        .await
        .map_err(|e| ApiError::store("Failed to fetch documents", e))?;
    Ok(Json(documents))
}

/// GET /api/documents/:id
pub async fn get_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Document>, ApiError> {
    state
        .store
        .get_document(&id)
        .await
        .map_err(|e| ApiError::store("Failed to fetch document", e))?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Document not found".to_string()))
}

/// POST /api/documents
///
/// Records metadata only; file bytes are stored elsewhere and referenced by `path`.
pub async fn create_document(
    State(state): State<AppState>,
    JsonPayload(raw): JsonPayload,
) -> Result<(StatusCode, Json<Document>), ApiError> {
    let new_document: NewDocument = parse_payload(&raw, "Invalid document data")?;
    let document = state
        .store
        .create_document(new_document)
        .await
        .map_err(|e| ApiError::store("Failed to create document", e))?;

    tracing::info!(document_id = %document.id, "Document created");
    Ok((StatusCode::CREATED, Json(document)))
}
