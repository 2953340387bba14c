//! Insightboard - AI analysis dashboard backend.
//!
//! Forwards free-form text or an image to a completion endpoint, shapes the
//! reply into an analysis result, and exports results as plain text, CSV or
//! HTML documents packed into data URLs.

pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod llm;
pub mod markdown;
pub mod models;
pub mod server;
pub mod services;
pub mod view_state;

pub use error::AnalysisError;
