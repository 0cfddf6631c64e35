use std::io::Cursor;
use std::panic::{self, AssertUnwindSafe};

use serde::Serialize;
use tiny_http::{Header, Method, Request, Response, StatusCode};
use tracing::{error, info, info_span};

use fakescope::AnalysisError;

use crate::handlers;
use crate::state::SharedService;

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

pub type HttpResponse = Response<Cursor<Vec<u8>>>;

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

fn bytes_response(status: u16, content_type: &[u8], bytes: Vec<u8>) -> HttpResponse {
    let len = bytes.len();
    let header = Header::from_bytes(&b"Content-Type"[..], content_type)
        .expect("static content-type header is valid");
    Response::new(StatusCode(status), vec![header], Cursor::new(bytes), Some(len), None)
}

pub fn json_response<T: Serialize>(status: u16, body: &T) -> HttpResponse {
    match serde_json::to_vec(body) {
        Ok(bytes) => bytes_response(status, b"application/json", bytes),
        Err(_) => internal_error(),
    }
}

pub fn json_error(status: u16, message: &str) -> HttpResponse {
    json_response(status, &ErrorBody { error: message })
}

pub fn jpeg_response(bytes: Vec<u8>) -> HttpResponse {
    bytes_response(200, b"image/jpeg", bytes)
}

pub fn not_found() -> HttpResponse {
    json_error(404, "not found")
}

pub fn internal_error() -> HttpResponse {
    let body = br#"{"error":"Internal server error"}"#.to_vec();
    bytes_response(500, b"application/json", body)
}

/// Maps a service failure onto its status code and JSON error body.
pub fn error_response(err: &AnalysisError) -> HttpResponse {
    let status = match err {
        AnalysisError::Validation(_) => 400,
        AnalysisError::HeatmapGeneration(_) => 500,
        AnalysisError::NotFound(_) => 404,
    };
    json_error(status, &err.to_string())
}

// ---------------------------------------------------------------------------
// Request dispatcher
// ---------------------------------------------------------------------------

/// Routes one request and always answers it.
///
/// A panic inside a handler is logged and turned into a 500 so that a single
/// bad request never goes unanswered.
pub fn dispatch(mut request: Request, service: SharedService) {
    let method = request.method().clone();
    let url = request.url().to_owned();
    let path = url.split('?').next().unwrap_or("").to_owned();

    let span = info_span!("request", method = %method, path = %path);
    let _enter = span.enter();

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| route(&mut request, &method, &path, &service)));
    let response = match outcome {
        Ok(resp) => resp,
        Err(_) => {
            error!("handler panicked");
            internal_error()
        }
    };

    info!(status = response.status_code().0, "responded");
    if let Err(e) = request.respond(response) {
        error!(error = %e, "failed to write response");
    }
}

fn route(request: &mut Request, method: &Method, path: &str, service: &SharedService) -> HttpResponse {
    if *method == Method::Get {
        if let Some(handle) = path.strip_prefix("/heatmap/") {
            return handlers::heatmap::handle_get(handle, service);
        }
    }

    match (method, path) {
        (Method::Post, "/detect") => handlers::detect::handle_post(request, service),
        (Method::Get, "/health") => handlers::health::handle_get(),
        _ => not_found(),
    }
}
