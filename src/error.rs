//! Error taxonomy for the ingestion and retrieval pipeline

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// All errors that can cross the pipeline boundary
#[derive(Debug, Error)]
pub enum Error {
    /// File extension outside the supported set
    #[error("unsupported file type: .{extension}. Supported types: {allowed}")]
    UnsupportedType { extension: String, allowed: String },

    /// A source adapter produced no usable text
    #[error("no text content found in {0}")]
    EmptyContent(String),

    /// A file could not be parsed by its format adapter
    #[error("failed to parse {filename}: {reason}")]
    FileParse { filename: String, reason: String },

    /// A network fetch failed or returned a non-success status
    #[error("failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    /// A URL was malformed or did not match the expected host pattern
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// A video has no transcript to ingest
    #[error("no transcript available for video {0}")]
    NoTranscript(String),

    /// Invalid caller-supplied configuration (e.g. overlap >= chunk size)
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The vector index has no collection or no stored chunks yet
    #[error("vector index is not initialized; add some content first")]
    NotInitialized,

    /// Unscoped delete-all is never permitted implicitly
    #[error("a non-empty filter is required for deletion")]
    FilterRequired,

    /// A request payload exceeded a configured limit
    #[error("{what} too large: maximum is {limit}")]
    TooLarge { what: &'static str, limit: usize },

    /// Catch-all for embedding, completion, and vector index failures
    #[error("{service} error: {message}")]
    ExternalService {
        service: &'static str,
        message: String,
    },

    /// I/O failure
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Build an `ExternalService` error from any displayable failure
    pub fn external(service: &'static str, err: impl std::fmt::Display) -> Self {
        Self::ExternalService {
            service,
            message: err.to_string(),
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Self::UnsupportedType { .. }
            | Self::InvalidUrl(_)
            | Self::FilterRequired
            | Self::Configuration(_) => StatusCode::BAD_REQUEST,
            Self::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::EmptyContent(_) | Self::FileParse { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NoTranscript(_) => StatusCode::NOT_FOUND,
            Self::NotInitialized => StatusCode::CONFLICT,
            Self::Fetch { .. } | Self::ExternalService { .. } => StatusCode::BAD_GATEWAY,
            Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("request failed: {}", self);
        } else {
            tracing::debug!("request rejected: {}", self);
        }

        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}
