//! Web server for the analysis dashboard.
//!
//! Exposes the analysis, export and listing operations as a JSON API:
//! - Structured and streamed text analysis
//! - Image analysis
//! - Document generation as data URLs
//! - Outline and recent-analyses helpers for rendering

mod handlers;
mod routes;

pub use handlers::{error_response, status_for};
pub use routes::create_router;

use std::net::SocketAddr;

use crate::config::Settings;
use crate::services::AnalysisService;

/// Shared state for the web server.
#[derive(Clone)]
pub struct AppState {
    pub analysis: AnalysisService,
}

impl AppState {
    pub fn new(settings: &Settings) -> anyhow::Result<Self> {
        Ok(Self {
            analysis: AnalysisService::new(settings.llm.clone())?,
        })
    }
}

/// Start the web server.
pub async fn serve(settings: &Settings, addr: SocketAddr) -> anyhow::Result<()> {
    let state = AppState::new(settings)?;
    let app = create_router(state);

    tracing::info!("Starting server at http://{}", addr);
    tracing::info!(
        "Text endpoint: {}, vision endpoint: {}",
        settings.llm.endpoint,
        settings.llm.vision_endpoint()
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
