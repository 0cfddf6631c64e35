use image::{DynamicImage, RgbImage};

use crate::engine::error::HeatmapError;

/// Interleaved 8-bit pixel buffer.
///
/// `data` holds `width * height * channels` samples in row-major order.
/// The engine accepts 1, 3 or 4 channels; other counts are representable so
/// that decoding never has to guess, but are rejected by `compute_heatmap`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    pub width: u32,
    pub height: u32,
    pub channels: u8,
    pub data: Vec<u8>,
}

impl PixelBuffer {
    pub fn new(width: u32, height: u32, channels: u8, data: Vec<u8>) -> PixelBuffer {
        PixelBuffer { width, height, channels, data }
    }

    /// Buffer where every pixel carries the same samples.
    pub fn filled(width: u32, height: u32, pixel: &[u8]) -> PixelBuffer {
        let count = width as usize * height as usize;
        let data = pixel.iter().copied().cycle().take(count * pixel.len()).collect();
        PixelBuffer { width, height, channels: pixel.len() as u8, data }
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Samples of the pixel at (x, y).
    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        let c = self.channels as usize;
        let start = (y as usize * self.width as usize + x as usize) * c;
        &self.data[start..start + c]
    }

    /// Checks that the dimensions are non-zero and agree with the sample count.
    pub fn validate(&self) -> Result<(), HeatmapError> {
        if self.width == 0 || self.height == 0 {
            return Err(HeatmapError::EmptyImage { width: self.width, height: self.height });
        }
        let expected = self.pixel_count() * self.channels as usize;
        if self.data.len() != expected {
            return Err(HeatmapError::BufferSize { expected, actual: self.data.len() });
        }
        Ok(())
    }

    /// Flattens a decoded image into a buffer, keeping its channel layout.
    ///
    /// 16-bit and float images are narrowed to 8 bits per sample.
    pub fn from_dynamic(img: DynamicImage) -> PixelBuffer {
        let (width, height) = (img.width(), img.height());
        let color = img.color();
        let (channels, data) = match (color.channel_count(), color.has_alpha()) {
            (1, _) => (1, img.into_luma8().into_raw()),
            (2, _) => (2, img.into_luma_alpha8().into_raw()),
            (_, true) => (4, img.into_rgba8().into_raw()),
            _ => (3, img.into_rgb8().into_raw()),
        };
        PixelBuffer { width, height, channels, data }
    }

    /// Converts a 3-channel buffer into an `RgbImage` for encoding.
    pub fn into_rgb_image(self) -> Result<RgbImage, HeatmapError> {
        if self.channels != 3 {
            return Err(HeatmapError::UnsupportedChannels(self.channels));
        }
        let (width, height) = (self.width, self.height);
        let expected = self.pixel_count() * 3;
        let actual = self.data.len();
        RgbImage::from_raw(width, height, self.data)
            .ok_or(HeatmapError::BufferSize { expected, actual })
    }
}

impl From<RgbImage> for PixelBuffer {
    fn from(img: RgbImage) -> PixelBuffer {
        let (width, height) = img.dimensions();
        PixelBuffer { width, height, channels: 3, data: img.into_raw() }
    }
}
