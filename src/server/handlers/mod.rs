//! HTTP request handlers for the web server.

mod analysis_api;
mod api;
mod export_api;
mod helpers;

// Re-export handlers for use by the router
pub use analysis_api::{api_data_analysis, api_data_analysis_stream, api_image_analysis};
pub use api::{api_recent_analyses, health};
pub use export_api::{api_document_generation, api_outline};
pub use helpers::{error_response, status_for};
