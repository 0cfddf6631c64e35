use std::io::Read;

use tiny_http::Request;
use tracing::warn;

use crate::routes::{error_response, json_error, json_response, HttpResponse};
use crate::state::SharedService;
use crate::util::multipart::{extract_boundary, extract_file_part};

/// Uploads beyond this size are refused without being decoded.
pub const MAX_UPLOAD_BYTES: u64 = 64 * 1024 * 1024;

// ---------------------------------------------------------------------------
// POST /detect
// ---------------------------------------------------------------------------

pub fn handle_post(request: &mut Request, service: &SharedService) -> HttpResponse {
    let content_type = request.headers().iter()
        .find(|h| h.field.equiv("Content-Type"))
        .map(|h| h.value.as_str().to_owned())
        .unwrap_or_default();

    if !content_type.starts_with("multipart/form-data") {
        return json_error(400, "No file provided");
    }
    let boundary = match extract_boundary(&content_type) {
        Some(b) => b,
        None => return json_error(400, "No file provided"),
    };

    if request.body_length().map_or(false, |len| len as u64 > MAX_UPLOAD_BYTES) {
        return json_error(400, "Upload too large");
    }
    let mut body: Vec<u8> = Vec::new();
    if let Err(e) = request.as_reader().take(MAX_UPLOAD_BYTES + 1).read_to_end(&mut body) {
        warn!(error = %e, "failed to read request body");
        return json_error(400, "Could not read request body");
    }
    if body.len() as u64 > MAX_UPLOAD_BYTES {
        return json_error(400, "Upload too large");
    }

    let part = match extract_file_part(&body, &boundary, "file") {
        Some(p) => p,
        None => return json_error(400, "No file provided"),
    };

    match service.analyze(&part.bytes, &part.filename) {
        Ok(result) => json_response(200, &result),
        Err(e) => error_response(&e),
    }
}
