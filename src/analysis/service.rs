use std::io::Cursor;
use std::sync::Arc;

use image::codecs::jpeg::JpegEncoder;
use tracing::{debug, info, warn, Span};

use crate::analysis::decode::{decode_upload, has_supported_extension};
use crate::analysis::error::AnalysisError;
use crate::analysis::handle::HeatmapHandle;
use crate::analysis::result::AnalysisResult;
use crate::analysis::store::HeatmapStore;
use crate::analysis::verdict::{PlaceholderVerdict, VerdictStrategy};
use crate::engine::{compute_heatmap_with, HeatmapParams, PixelBuffer};

pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Runs uploads through the heatmap engine and keeps the results until the
/// caller collects them.
///
/// Holds no per-request state; one instance is shared by all request
/// threads. Log events are emitted under the span given at construction.
pub struct AnalysisService {
    store: Arc<dyn HeatmapStore>,
    verdict: Box<dyn VerdictStrategy>,
    params: HeatmapParams,
    jpeg_quality: u8,
    span: Span,
}

impl AnalysisService {
    pub fn new(store: Arc<dyn HeatmapStore>) -> AnalysisService {
        AnalysisService {
            store,
            verdict: Box::new(PlaceholderVerdict::default()),
            params: HeatmapParams::default(),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            span: Span::none(),
        }
    }

    pub fn with_verdict(mut self, verdict: impl VerdictStrategy + 'static) -> Self {
        self.verdict = Box::new(verdict);
        self
    }

    pub fn with_params(mut self, params: HeatmapParams) -> Self {
        self.params = params;
        self
    }

    /// Quality is clamped to 1–100.
    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality.clamp(1, 100);
        self
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn store(&self) -> &Arc<dyn HeatmapStore> {
        &self.store
    }

    /// Validates, decodes and analyses one upload.
    ///
    /// The extension is checked before any decoding. On success the encoded
    /// heatmap is stored and its handle returned inside the result; on any
    /// failure nothing is stored.
    pub fn analyze(&self, bytes: &[u8], filename: &str) -> Result<AnalysisResult, AnalysisError> {
        if !has_supported_extension(filename) {
            debug!(parent: &self.span, filename, "rejected upload extension");
            return Err(AnalysisError::unsupported_type());
        }

        let image = decode_upload(bytes).map_err(|cause| {
            debug!(parent: &self.span, filename, %cause, "rejected undecodable upload");
            AnalysisError::invalid_image(cause)
        })?;

        let heatmap = compute_heatmap_with(&image, &self.params).map_err(|e| {
            warn!(parent: &self.span, filename, error = %e, "heatmap generation failed");
            AnalysisError::from(e)
        })?;

        let verdict = self.verdict.judge(&image, &heatmap);
        let (width, height) = (heatmap.width, heatmap.height);
        let encoded = self.encode_jpeg(heatmap)?;
        let size = encoded.len();
        let handle = self.store.insert(encoded)?;

        info!(
            parent: &self.span,
            filename,
            width,
            height,
            bytes = size,
            handle = %handle,
            is_fake = verdict.is_fake,
            confidence = verdict.confidence,
            "analysis complete"
        );
        Ok(AnalysisResult::new(verdict, handle))
    }

    /// Hands over the stored heatmap for `handle` and forgets it.
    pub fn retrieve_heatmap(&self, handle: &HeatmapHandle) -> Result<Vec<u8>, AnalysisError> {
        let bytes = self.store.take(handle)?;
        debug!(parent: &self.span, handle = %handle, bytes = bytes.len(), "heatmap delivered");
        Ok(bytes)
    }

    /// Parses a raw handle string and retrieves it; malformed handles are
    /// reported as not found.
    pub fn retrieve_heatmap_str(&self, raw: &str) -> Result<Vec<u8>, AnalysisError> {
        let handle: HeatmapHandle = raw
            .parse()
            .map_err(|_| AnalysisError::NotFound(raw.to_owned()))?;
        self.retrieve_heatmap(&handle)
    }

    fn encode_jpeg(&self, heatmap: PixelBuffer) -> Result<Vec<u8>, AnalysisError> {
        let rgb = heatmap.into_rgb_image()?;
        let mut out = Cursor::new(Vec::new());
        JpegEncoder::new_with_quality(&mut out, self.jpeg_quality)
            .encode_image(&rgb)
            .map_err(crate::engine::HeatmapError::from)?;
        Ok(out.into_inner())
    }
}
