use image::imageops::{self, FilterType};
use image::{GrayImage, Rgb, RgbImage};

use crate::engine::error::HeatmapError;

/// Jet color ramp: dark blue at 0, through cyan, green and yellow, to dark
/// red at 255.
///
/// Each channel is a clamped triangle `1.5 - |4v - k|` with `k` = 3, 2, 1
/// for red, green, blue and `v = value / 255`.
pub fn jet(value: u8) -> Rgb<u8> {
    let v = f32::from(value) / 255.0;
    let channel = |k: f32| ((1.5 - (4.0 * v - k).abs()).clamp(0.0, 1.0) * 255.0).round() as u8;
    Rgb([channel(3.0), channel(2.0), channel(1.0)])
}

/// Precomputed jet palette indexed by intensity.
pub struct JetPalette {
    table: [Rgb<u8>; 256],
}

impl JetPalette {
    pub fn new() -> JetPalette {
        let mut table = [Rgb([0, 0, 0]); 256];
        for (i, entry) in table.iter_mut().enumerate() {
            *entry = jet(i as u8);
        }
        JetPalette { table }
    }

    pub fn color(&self, value: u8) -> Rgb<u8> {
        self.table[value as usize]
    }

    /// Maps every mask value through the palette.
    pub fn apply(&self, mask: &GrayImage) -> RgbImage {
        let mut out = RgbImage::new(mask.width(), mask.height());
        for (src, dst) in mask.pixels().zip(out.pixels_mut()) {
            *dst = self.color(src[0]);
        }
        out
    }
}

impl Default for JetPalette {
    fn default() -> Self {
        JetPalette::new()
    }
}

/// Resamples `mapped` to exactly `width x height` (nearest neighbour).
///
/// Returns the buffer untouched when the size already matches.
pub fn fit_to(mapped: RgbImage, width: u32, height: u32) -> Result<RgbImage, HeatmapError> {
    if mapped.dimensions() == (width, height) {
        return Ok(mapped);
    }
    if width == 0 || height == 0 {
        return Err(HeatmapError::EmptyImage { width, height });
    }
    let resized = imageops::resize(&mapped, width, height, FilterType::Nearest);
    if resized.dimensions() != (width, height) {
        return Err(HeatmapError::Resize {
            expected: (width, height),
            actual: resized.dimensions(),
        });
    }
    Ok(resized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn ramp_endpoints() {
        assert_eq!(jet(0), Rgb([0, 0, 128]));
        assert_eq!(jet(255), Rgb([128, 0, 0]));
    }

    #[test]
    fn ramp_passes_through_green() {
        let mid = jet(128);
        assert!(mid[1] == 255, "green should saturate mid-ramp: {mid:?}");
        assert!(mid[0] > 100 && mid[2] > 100);
    }

    #[test]
    fn ramp_moves_from_blue_to_red() {
        let low = jet(32);
        let high = jet(224);
        assert!(low[2] > low[0]);
        assert!(high[0] > high[2]);
    }

    #[test]
    fn palette_matches_function() {
        let palette = JetPalette::new();
        for v in [0u8, 1, 63, 64, 127, 191, 254, 255] {
            assert_eq!(palette.color(v), jet(v));
        }
    }

    #[test]
    fn apply_maps_binary_mask() {
        let mask = GrayImage::from_fn(2, 1, |x, _| Luma([if x == 0 { 0 } else { 255 }]));
        let mapped = JetPalette::new().apply(&mask);
        assert_eq!(*mapped.get_pixel(0, 0), jet(0));
        assert_eq!(*mapped.get_pixel(1, 0), jet(255));
    }

    #[test]
    fn fit_to_resizes_mismatched_buffer() {
        let mapped = RgbImage::from_pixel(7, 3, jet(0));
        let fitted = fit_to(mapped, 20, 11).unwrap();
        assert_eq!(fitted.dimensions(), (20, 11));
        assert!(fitted.pixels().all(|p| *p == jet(0)));
    }

    #[test]
    fn fit_to_rejects_empty_target() {
        let mapped = RgbImage::from_pixel(2, 2, jet(0));
        assert!(matches!(fit_to(mapped, 0, 5), Err(HeatmapError::EmptyImage { .. })));
    }
}
