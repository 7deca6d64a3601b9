//! Application state

use crate::config::PipelineConfig;

/// State shared across handlers.
///
/// Artifacts are loaded per request: they are written once by a training run
/// and read-only afterwards, so the handlers always see the latest trained
/// model without any cache invalidation.
pub struct AppState {
    pub pipeline: PipelineConfig,
}

impl AppState {
    pub fn new(pipeline: PipelineConfig) -> Self {
        Self { pipeline }
    }
}
