//! Document ingestion server

use axum::{Router, routing::post};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod routes;

/// Server state
pub struct AppState {
    /// Directory holding per-request scratch copies of uploaded files
    pub upload_dir: PathBuf,
}

/// Build the ingestion router over the given state
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/documents", post(routes::upload_document))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and serve the ingestion endpoint
pub async fn start_server(port: u16, upload_dir: PathBuf) -> anyhow::Result<()> {
    std::fs::create_dir_all(&upload_dir)?;
    let app = router(Arc::new(AppState { upload_dir }));

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Starting server on {}", addr);
    println!("🌍 Ingestion endpoint running at http://{}/documents", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
