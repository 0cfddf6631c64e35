use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::Span;

use crate::analysis::service::DEFAULT_JPEG_QUALITY;
use crate::analysis::{AnalysisService, DirStore, HeatmapStore, MemoryStore, PlaceholderVerdict};

/// Address shared by the server and the client unless overridden.
pub const DEFAULT_ADDR: &str = "127.0.0.1:3200";

/// Per-call timeout the client applies to each of its two requests.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Where the service keeps heatmaps until they are fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreKind {
    Memory,
    Dir(PathBuf),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("confidence must be within [0, 1], got {0}")]
    Confidence(f32),

    #[error("JPEG quality must be within 1..=100, got {0}")]
    JpegQuality(u8),

    #[error("bind address must not be empty")]
    EmptyBind,

    #[error("could not open heatmap directory: {0}")]
    Store(#[from] crate::analysis::StoreError),
}

/// Validated server configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub bind: String,
    pub store: StoreKind,
    pub jpeg_quality: u8,
    pub verdict_fake: bool,
    pub verdict_confidence: f32,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        ServiceConfig {
            bind: DEFAULT_ADDR.to_owned(),
            store: StoreKind::Memory,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            verdict_fake: false,
            verdict_confidence: 0.0,
        }
    }
}

impl ServiceConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bind.trim().is_empty() {
            return Err(ConfigError::EmptyBind);
        }
        if !(0.0..=1.0).contains(&self.verdict_confidence) {
            return Err(ConfigError::Confidence(self.verdict_confidence));
        }
        if self.jpeg_quality == 0 || self.jpeg_quality > 100 {
            return Err(ConfigError::JpegQuality(self.jpeg_quality));
        }
        Ok(())
    }

    /// Validates the configuration and wires up the analysis service.
    pub fn build_service(&self, span: Span) -> Result<AnalysisService, ConfigError> {
        self.validate()?;
        let store: Arc<dyn HeatmapStore> = match &self.store {
            StoreKind::Memory => Arc::new(MemoryStore::new()),
            StoreKind::Dir(dir) => Arc::new(DirStore::open(dir.clone())?),
        };
        Ok(AnalysisService::new(store)
            .with_verdict(PlaceholderVerdict::new(self.verdict_fake, self.verdict_confidence))
            .with_jpeg_quality(self.jpeg_quality)
            .with_span(span))
    }
}
