//! API routes for the notebook server

pub mod ingest;
pub mod query;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes(max_upload_size: usize) -> Router<AppState> {
    Router::new()
        // Ingestion
        .route("/text", post(ingest::add_text))
        .route(
            "/upload",
            post(ingest::upload_file).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        .route("/website", post(ingest::add_website))
        .route("/youtube", post(ingest::add_video))
        // Query
        .route("/chat", post(query::chat))
        // Management
        .route("/sources", get(query::list_sources))
        .route(
            "/documents",
            get(query::list_documents).delete(query::delete_documents),
        )
}
