pub mod engine;
pub mod analysis;
pub mod client;
pub mod config;

// Convenience re-exports
pub use engine::{compute_heatmap, HeatmapError, HeatmapParams, PixelBuffer};
pub use analysis::{
    AnalysisError, AnalysisResult, AnalysisService, HeatmapHandle, HeatmapStore,
    PlaceholderVerdict, VerdictStrategy,
};
pub use client::{ClientError, DetectionClient};
pub use config::{ServiceConfig, StoreKind, DEFAULT_ADDR, DEFAULT_TIMEOUT};
