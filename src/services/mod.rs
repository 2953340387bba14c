//! Service layer for analysis business logic.
//!
//! Domain logic lives here, separate from the HTTP and CLI surfaces that
//! drive it.

mod analysis;
mod image;

pub use analysis::{outline, AnalysisService};
pub use image::{image_prompt, normalize_headings, normalize_image_data_url};
