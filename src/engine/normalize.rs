use image::{GrayImage, Luma, RgbImage};

use crate::engine::error::HeatmapError;
use crate::engine::pixel_buffer::PixelBuffer;

/// Brings a 1-, 3- or 4-channel buffer to canonical RGB.
///
/// Gray is replicated into all three channels; alpha is dropped, not
/// composited.
pub fn to_canonical_rgb(input: &PixelBuffer) -> Result<RgbImage, HeatmapError> {
    input.validate()?;

    let data: Vec<u8> = match input.channels {
        1 => input.data.iter().flat_map(|&v| [v, v, v]).collect(),
        3 => input.data.clone(),
        4 => input.data.chunks_exact(4).flat_map(|px| [px[0], px[1], px[2]]).collect(),
        n => return Err(HeatmapError::UnsupportedChannels(n)),
    };

    let expected = input.pixel_count() * 3;
    let actual = data.len();
    RgbImage::from_raw(input.width, input.height, data)
        .ok_or(HeatmapError::BufferSize { expected, actual })
}

/// BT.601 luma: 0.299 R + 0.587 G + 0.114 B, rounded to the nearest level.
pub fn luma(rgb: &RgbImage) -> GrayImage {
    let mut gray = GrayImage::new(rgb.width(), rgb.height());
    for (src, dst) in rgb.pixels().zip(gray.pixels_mut()) {
        let y = 0.299 * f32::from(src[0]) + 0.587 * f32::from(src[1]) + 0.114 * f32::from(src[2]);
        *dst = Luma([y.round().clamp(0.0, 255.0) as u8]);
    }
    gray
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gray_is_replicated() {
        let buf = PixelBuffer::new(2, 1, 1, vec![10, 200]);
        let rgb = to_canonical_rgb(&buf).unwrap();
        assert_eq!(rgb.get_pixel(0, 0).0, [10, 10, 10]);
        assert_eq!(rgb.get_pixel(1, 0).0, [200, 200, 200]);
    }

    #[test]
    fn alpha_is_dropped() {
        let buf = PixelBuffer::new(1, 1, 4, vec![1, 2, 3, 0]);
        let rgb = to_canonical_rgb(&buf).unwrap();
        assert_eq!(rgb.get_pixel(0, 0).0, [1, 2, 3]);
    }

    #[test]
    fn two_channels_are_rejected() {
        let buf = PixelBuffer::new(1, 1, 2, vec![1, 2]);
        assert!(matches!(
            to_canonical_rgb(&buf),
            Err(HeatmapError::UnsupportedChannels(2))
        ));
    }

    #[test]
    fn luma_weights() {
        let rgb = RgbImage::from_raw(3, 1, vec![255, 0, 0, 0, 255, 0, 0, 0, 255]).unwrap();
        let gray = luma(&rgb);
        assert_eq!(gray.get_pixel(0, 0).0, [76]);
        assert_eq!(gray.get_pixel(1, 0).0, [150]);
        assert_eq!(gray.get_pixel(2, 0).0, [29]);
    }

    #[test]
    fn luma_of_neutral_gray_is_identity() {
        let rgb = RgbImage::from_pixel(4, 4, image::Rgb([128, 128, 128]));
        assert!(luma(&rgb).pixels().all(|p| p.0 == [128]));
    }
}
