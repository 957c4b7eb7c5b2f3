//! Notebook server binary
//!
//! Run with: cargo run --bin rag-notebook-server [config.toml]

use std::path::PathBuf;

use rag_notebook::{config::NotebookConfig, server::NotebookServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rag_notebook=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = NotebookConfig::load(config_path.as_deref())?;

    tracing::info!("configuration loaded");
    tracing::info!("  - embedding model: {}", config.openai.embed_model);
    tracing::info!("  - chat model: {}", config.openai.chat_model);
    tracing::info!("  - qdrant collection: {}", config.qdrant.collection);
    tracing::info!("  - chunk size: {}", config.chunking.chunk_size);

    let server = NotebookServer::new(config)?;

    println!("\nServer starting...");
    println!("  API: http://{}", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("\nEndpoints:");
    println!("  POST   /api/text      - Add raw text");
    println!("  POST   /api/upload    - Upload a file (pdf, txt, csv, docx, vtt)");
    println!("  POST   /api/website   - Add a web page");
    println!("  POST   /api/youtube   - Add a video transcript");
    println!("  POST   /api/chat      - Ask a question");
    println!("  GET    /api/sources   - List ingested sources");
    println!("  GET    /api/documents - List stored chunks by type");
    println!("  DELETE /api/documents - Delete by metadata filter");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
