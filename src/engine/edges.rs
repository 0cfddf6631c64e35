use image::GrayImage;
use imageproc::edges::canny;

/// Default hysteresis thresholds on the 0–255 intensity scale.
pub const LOW_THRESHOLD: f32 = 100.0;
pub const HIGH_THRESHOLD: f32 = 200.0;

/// Canny edge mask: 255 on edges, 0 elsewhere, same size as `gray`.
///
/// Non-maximum suppression only visits interior pixels, so anything thinner
/// than 3 pixels in either direction has no edges at all.
pub fn edge_mask(gray: &GrayImage, low: f32, high: f32) -> GrayImage {
    let (width, height) = gray.dimensions();
    if width < 3 || height < 3 {
        return GrayImage::new(width, height);
    }
    canny(gray, low, high)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn flat_image_has_no_edges() {
        let gray = GrayImage::from_pixel(40, 30, Luma([128]));
        let mask = edge_mask(&gray, LOW_THRESHOLD, HIGH_THRESHOLD);
        assert_eq!(mask.dimensions(), (40, 30));
        assert!(mask.pixels().all(|p| p.0 == [0]));
    }

    #[test]
    fn hard_step_produces_binary_edges() {
        let gray = GrayImage::from_fn(40, 40, |x, _| if x < 20 { Luma([0]) } else { Luma([255]) });
        let mask = edge_mask(&gray, LOW_THRESHOLD, HIGH_THRESHOLD);
        assert!(mask.pixels().any(|p| p.0 == [255]));
        assert!(mask.pixels().all(|p| p.0 == [0] || p.0 == [255]));
        // Columns far from the step stay quiet.
        assert!((0..40).all(|y| mask.get_pixel(5, y).0 == [0]));
        assert!((0..40).all(|y| mask.get_pixel(35, y).0 == [0]));
    }

    #[test]
    fn thin_images_yield_empty_mask() {
        let gray = GrayImage::from_fn(2, 9, |x, _| Luma([(x * 255) as u8]));
        let mask = edge_mask(&gray, LOW_THRESHOLD, HIGH_THRESHOLD);
        assert_eq!(mask.dimensions(), (2, 9));
        assert!(mask.pixels().all(|p| p.0 == [0]));
    }
}
