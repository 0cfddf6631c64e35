use crate::routes::{error_response, jpeg_response, HttpResponse};
use crate::state::SharedService;

/// `GET /heatmap/{handle}`
///
/// Serves the stored JPEG once; the artifact is gone afterwards.
pub fn handle_get(handle: &str, service: &SharedService) -> HttpResponse {
    match service.retrieve_heatmap_str(handle) {
        Ok(bytes) => jpeg_response(bytes),
        Err(e) => error_response(&e),
    }
}
