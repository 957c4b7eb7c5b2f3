//! Ingestion endpoints: raw text, file uploads, websites, and videos

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::{IngestResponse, SourceType, TextIngestRequest, UrlRequest};

/// POST /api/text - Index a raw text submission
pub async fn add_text(
    State(state): State<AppState>,
    Json(request): Json<TextIngestRequest>,
) -> Result<Json<IngestResponse>> {
    let limit = state.config().ingest.max_text_chars;
    if request.text.chars().count() > limit {
        return Err(Error::TooLarge {
            what: "text input",
            limit,
        });
    }

    let label = request.source.as_deref().unwrap_or("text-input");
    let records = state.adapter().extract_text(&request.text, label)?;
    let source = records[0].metadata.source.clone();
    let chunks = state.indexing().index_records(records).await?;

    tracing::info!(source = %source, chunks, "indexed text submission");

    Ok(Json(IngestResponse {
        message: "Text content added successfully".to_string(),
        source,
        source_type: SourceType::Text,
        chunks,
        segments: None,
    }))
}

/// POST /api/upload - Index an uploaded file
pub async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<IngestResponse>> {
    while let Some(field) = multipart.next_field().await.map_err(|e| Error::FileParse {
        filename: "upload".to_string(),
        reason: e.to_string(),
    })? {
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };

        let data = field.bytes().await.map_err(|e| Error::FileParse {
            filename: filename.clone(),
            reason: e.to_string(),
        })?;

        tracing::info!(file = %filename, bytes = data.len(), "processing upload");

        let records = state.adapter().extract_file(&filename, &data)?;
        let source_type = records[0].metadata.source_type;
        let chunks = state.indexing().index_records(records).await?;

        return Ok(Json(IngestResponse {
            message: "File uploaded and processed successfully".to_string(),
            source: filename,
            source_type,
            chunks,
            segments: None,
        }));
    }

    Err(Error::FileParse {
        filename: "upload".to_string(),
        reason: "request contained no file field".to_string(),
    })
}

/// POST /api/website - Fetch a page and index its visible text
pub async fn add_website(
    State(state): State<AppState>,
    Json(request): Json<UrlRequest>,
) -> Result<Json<IngestResponse>> {
    let records = state.adapter().extract_website(&request.url).await?;
    let chunks = state.indexing().index_records(records).await?;

    Ok(Json(IngestResponse {
        message: "Website content added successfully".to_string(),
        source: request.url,
        source_type: SourceType::Website,
        chunks,
        segments: None,
    }))
}

/// POST /api/youtube - Fetch a video transcript and index it
pub async fn add_video(
    State(state): State<AppState>,
    Json(request): Json<UrlRequest>,
) -> Result<Json<IngestResponse>> {
    let records = state.adapter().extract_video(&request.url).await?;
    let segments = records[0].metadata.extras.get("segments").and_then(Value::as_u64);
    let chunks = state.indexing().index_records(records).await?;

    Ok(Json(IngestResponse {
        message: "YouTube video transcript added successfully".to_string(),
        source: request.url,
        source_type: SourceType::Youtube,
        chunks,
        segments,
    }))
}
