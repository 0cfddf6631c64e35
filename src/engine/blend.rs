use image::RgbImage;

/// Per-channel weighted sum `round(clamp(a * alpha + b * beta))`.
///
/// Both images must have the same dimensions; the caller guarantees this by
/// resizing `overlay` first.
pub fn add_weighted(base: &RgbImage, alpha: f32, overlay: &RgbImage, beta: f32) -> RgbImage {
    debug_assert_eq!(base.dimensions(), overlay.dimensions());
    let mut out = RgbImage::new(base.width(), base.height());
    for ((a, b), dst) in base.pixels().zip(overlay.pixels()).zip(out.pixels_mut()) {
        for ch in 0..3 {
            dst[ch] = blend_sample(a[ch], alpha, b[ch], beta);
        }
    }
    out
}

/// One blended sample, rounded to nearest and clamped to 0–255.
pub fn blend_sample(a: u8, alpha: f32, b: u8, beta: f32) -> u8 {
    let v = alpha * f32::from(a) + beta * f32::from(b);
    v.clamp(0.0, 255.0).round() as u8
}
