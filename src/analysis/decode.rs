use std::io::Cursor;
use std::path::Path;

use image::{ImageFormat, ImageReader};

use crate::engine::PixelBuffer;

/// Upload extensions the service accepts (compared case-insensitively).
pub const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Returns true when `filename` ends in one of `SUPPORTED_EXTENSIONS`.
pub fn has_supported_extension(filename: &str) -> bool {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| SUPPORTED_EXTENSIONS.iter().any(|s| e.eq_ignore_ascii_case(s)))
        .unwrap_or(false)
}

/// JPEG end-of-image marker.
const JPEG_EOI: [u8; 2] = [0xFF, 0xD9];

/// Validates and decodes an uploaded payload.
///
/// The first reader sniffs the format and decodes the whole payload as an
/// integrity check. A JPEG must also end in its EOI marker: the decoder
/// pads a truncated entropy stream rather than failing. Pixels are then
/// decoded from a second reader over the same bytes. Errors are plain
/// messages meant for the client.
pub fn decode_upload(bytes: &[u8]) -> Result<PixelBuffer, String> {
    if bytes.is_empty() {
        return Err("empty payload".into());
    }

    verify(bytes)?;

    let decoded = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| e.to_string())?
        .decode()
        .map_err(|e| e.to_string())?;

    Ok(PixelBuffer::from_dynamic(decoded))
}

fn verify(bytes: &[u8]) -> Result<(), String> {
    let probe = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| e.to_string())?;
    match probe.format() {
        Some(ImageFormat::Png) => {}
        Some(ImageFormat::Jpeg) => {
            if !has_jpeg_trailer(bytes) {
                return Err("image file is truncated".into());
            }
        }
        Some(other) => return Err(format!("unsupported image format {:?}", other)),
        None => return Err("unrecognised image data".into()),
    }

    let image = probe.decode().map_err(|e| e.to_string())?;
    if image.width() == 0 || image.height() == 0 {
        return Err(format!("image has no pixels ({}x{})", image.width(), image.height()));
    }
    Ok(())
}

/// True when the payload ends in EOI, ignoring trailing NUL or whitespace
/// padding.
fn has_jpeg_trailer(bytes: &[u8]) -> bool {
    let end = bytes
        .iter()
        .rposition(|&b| b != 0 && !b.is_ascii_whitespace())
        .map_or(0, |i| i + 1);
    bytes[..end].ends_with(&JPEG_EOI)
}
