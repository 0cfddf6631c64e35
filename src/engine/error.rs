/// Failures inside the heatmap pipeline.
///
/// Any of these aborts the whole computation; the engine never returns a
/// partially processed buffer.
#[derive(Debug, thiserror::Error)]
pub enum HeatmapError {
    #[error("unsupported channel count {0} (expected 1, 3 or 4)")]
    UnsupportedChannels(u8),

    #[error("image has no pixels ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    #[error("pixel buffer holds {actual} samples, expected {expected}")]
    BufferSize { expected: usize, actual: usize },

    #[error("color-mapped buffer is {actual:?}, expected {expected:?} after resize")]
    Resize { expected: (u32, u32), actual: (u32, u32) },

    #[error("failed to encode heatmap: {0}")]
    Encode(#[from] image::ImageError),
}
