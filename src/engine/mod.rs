pub mod pixel_buffer;
pub mod normalize;
pub mod edges;
pub mod colormap;
pub mod blend;
pub mod heatmap;
pub mod error;

pub use pixel_buffer::PixelBuffer;
pub use heatmap::{compute_heatmap, compute_heatmap_with, HeatmapParams};
pub use colormap::{jet, JetPalette};
pub use error::HeatmapError;
