use crate::engine::blend::add_weighted;
use crate::engine::colormap::{fit_to, JetPalette};
use crate::engine::edges::{edge_mask, HIGH_THRESHOLD, LOW_THRESHOLD};
use crate::engine::error::HeatmapError;
use crate::engine::normalize::{luma, to_canonical_rgb};
use crate::engine::pixel_buffer::PixelBuffer;

/// Tunables for the edge-overlay pipeline.
///
/// # Fields
/// - `low_threshold` / `high_threshold` — Canny hysteresis bounds
/// - `image_weight`   — weight of the original image in the blend
/// - `overlay_weight` — weight of the color-mapped edge mask
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatmapParams {
    pub low_threshold: f32,
    pub high_threshold: f32,
    pub image_weight: f32,
    pub overlay_weight: f32,
}

impl Default for HeatmapParams {
    fn default() -> Self {
        HeatmapParams {
            low_threshold: LOW_THRESHOLD,
            high_threshold: HIGH_THRESHOLD,
            image_weight: 0.7,
            overlay_weight: 0.3,
        }
    }
}

/// Builds the edge-overlay heatmap for `image` with default parameters.
///
/// The result is always 3-channel and has the input's width and height.
pub fn compute_heatmap(image: &PixelBuffer) -> Result<PixelBuffer, HeatmapError> {
    compute_heatmap_with(image, &HeatmapParams::default())
}

/// Same as [`compute_heatmap`] with explicit parameters.
pub fn compute_heatmap_with(
    image: &PixelBuffer,
    params: &HeatmapParams,
) -> Result<PixelBuffer, HeatmapError> {
    let rgb = to_canonical_rgb(image)?;
    let (width, height) = rgb.dimensions();

    let gray = luma(&rgb);
    let mask = edge_mask(&gray, params.low_threshold, params.high_threshold);

    let mapped = JetPalette::new().apply(&mask);
    let mapped = fit_to(mapped, width, height)?;

    let blended = add_weighted(&rgb, params.image_weight, &mapped, params.overlay_weight);
    Ok(PixelBuffer::from(blended))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::colormap::jet;

    fn checkerboard(width: u32, height: u32, channels: u8) -> PixelBuffer {
        let mut data = Vec::with_capacity((width * height) as usize * channels as usize);
        for y in 0..height {
            for x in 0..width {
                let v = if (x / 8 + y / 8) % 2 == 0 { 20 } else { 230 };
                for c in 0..channels {
                    data.push(if c == 3 { 255 } else { v });
                }
            }
        }
        PixelBuffer::new(width, height, channels, data)
    }

    #[test]
    fn output_matches_input_dimensions_for_all_layouts() {
        for channels in [1u8, 3, 4] {
            let input = checkerboard(37, 21, channels);
            let out = compute_heatmap(&input).unwrap();
            assert_eq!((out.width, out.height, out.channels), (37, 21, 3));
            assert_eq!(out.data.len(), 37 * 21 * 3);
        }
    }

    #[test]
    fn solid_gray_blends_with_palette_floor() {
        let input = PixelBuffer::filled(100, 100, &[128, 128, 128]);
        let out = compute_heatmap(&input).unwrap();
        let floor = jet(0);
        let expected: Vec<u8> = (0..3)
            .map(|c| (0.7f32 * 128.0 + 0.3 * f32::from(floor[c])).round() as u8)
            .collect();
        assert_eq!(expected, vec![90, 90, 128]);
        assert!(out.data.chunks_exact(3).all(|px| px == expected.as_slice()));
    }

    #[test]
    fn deterministic() {
        let input = checkerboard(64, 48, 3);
        let a = compute_heatmap(&input).unwrap();
        let b = compute_heatmap(&input).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn edges_tint_toward_red() {
        let input = checkerboard(64, 64, 3);
        let out = compute_heatmap(&input).unwrap();
        let flat = PixelBuffer::filled(64, 64, &[20, 20, 20]);
        let flat_out = compute_heatmap(&flat).unwrap();
        // Somewhere along a tile boundary the red channel rises above the
        // flat-image baseline for the same source intensity.
        let baseline = flat_out.pixel(0, 0)[0];
        let raised = (0..64).any(|y| (0..64).any(|x| {
            input.pixel(x, y)[0] == 20 && out.pixel(x, y)[0] > baseline
        }));
        assert!(raised);
    }

    #[test]
    fn grayscale_and_rgb_gray_agree() {
        let gray = checkerboard(32, 32, 1);
        let rgb = checkerboard(32, 32, 3);
        assert_eq!(compute_heatmap(&gray).unwrap(), compute_heatmap(&rgb).unwrap());
    }

    #[test]
    fn rejects_unsupported_channels() {
        let input = PixelBuffer::filled(8, 8, &[1, 2]);
        assert!(matches!(compute_heatmap(&input), Err(HeatmapError::UnsupportedChannels(2))));
    }

    #[test]
    fn rejects_empty_image() {
        let input = PixelBuffer::new(0, 0, 3, Vec::new());
        assert!(matches!(compute_heatmap(&input), Err(HeatmapError::EmptyImage { .. })));
    }

    #[test]
    fn tiny_images_still_produce_output() {
        let input = PixelBuffer::filled(1, 1, &[7]);
        let out = compute_heatmap(&input).unwrap();
        assert_eq!((out.width, out.height), (1, 1));
    }

    #[test]
    fn custom_weights_are_honoured() {
        let input = PixelBuffer::filled(10, 10, &[100, 100, 100]);
        let params = HeatmapParams { image_weight: 1.0, overlay_weight: 0.0, ..HeatmapParams::default() };
        let out = compute_heatmap_with(&input, &params).unwrap();
        assert!(out.data.iter().all(|&v| v == 100));
    }
}
