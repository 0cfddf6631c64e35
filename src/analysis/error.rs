use crate::analysis::store::StoreError;
use crate::engine::HeatmapError;

/// Service-level failures. Each variant maps to one HTTP status class.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// Bad request shape or content; the client can fix it.
    #[error("{0}")]
    Validation(String),

    /// Internal processing failure.
    #[error("Heatmap generation error: {0}")]
    HeatmapGeneration(String),

    /// Unknown, malformed or already delivered handle.
    #[error("heatmap not found: {0}")]
    NotFound(String),
}

impl AnalysisError {
    pub fn unsupported_type() -> AnalysisError {
        AnalysisError::Validation("Only JPG/PNG images supported".into())
    }

    pub fn invalid_image(cause: impl std::fmt::Display) -> AnalysisError {
        AnalysisError::Validation(format!("Invalid image: {}", cause))
    }
}

impl From<HeatmapError> for AnalysisError {
    fn from(e: HeatmapError) -> Self {
        AnalysisError::HeatmapGeneration(e.to_string())
    }
}

impl From<StoreError> for AnalysisError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(handle) => AnalysisError::NotFound(handle.to_string()),
            other => AnalysisError::HeatmapGeneration(other.to_string()),
        }
    }
}
