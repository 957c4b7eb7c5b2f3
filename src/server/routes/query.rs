//! Query and management endpoints

use axum::{extract::State, Json};

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::{
    ChatRequest, ChatResponse, DeleteRequest, DeleteResponse, DocumentsResponse, SourcesResponse,
};

/// POST /api/chat - Answer a question grounded in the indexed notebook
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>> {
    if request.message.trim().is_empty() {
        return Err(Error::EmptyContent("message".to_string()));
    }
    let response = state.chat().respond(request).await?;
    Ok(Json(response))
}

/// GET /api/sources - List ingested sources with chunk counts and previews
pub async fn list_sources(State(state): State<AppState>) -> Result<Json<SourcesResponse>> {
    let listing = state.retrieval().list_sources().await?;
    Ok(Json(listing))
}

/// GET /api/documents - List every stored chunk grouped by source type
pub async fn list_documents(State(state): State<AppState>) -> Result<Json<DocumentsResponse>> {
    let listing = state.retrieval().list_documents().await?;
    Ok(Json(listing))
}

/// DELETE /api/documents - Delete everything matching the filter
pub async fn delete_documents(
    State(state): State<AppState>,
    Json(request): Json<DeleteRequest>,
) -> Result<Json<DeleteResponse>> {
    let deleted = state.retrieval().delete_by_filter(&request.filter).await?;

    Ok(Json(DeleteResponse {
        message: format!("Successfully deleted {deleted} documents"),
        deleted,
    }))
}
