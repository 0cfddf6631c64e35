use std::path::Path;
use std::time::Duration;

use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::{Client, Response};
use serde::Deserialize;
use tracing::{debug, info, Span};

use crate::analysis::decode::has_supported_extension;
use crate::analysis::AnalysisResult;
use crate::client::error::ClientError;

/// What one round trip yields: the verdict plus the downloaded heatmap.
#[derive(Debug, Clone)]
pub struct Detection {
    pub result: AnalysisResult,
    /// JPEG bytes as served by `GET /heatmap/{handle}`.
    pub heatmap: Vec<u8>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Blocking client for the detection server.
///
/// Performs two sequential calls per image (upload, then heatmap fetch), each
/// bounded by the configured timeout. Nothing is retried.
pub struct DetectionClient {
    addr: String,
    http: Client,
    span: Span,
}

impl DetectionClient {
    /// `addr` is a `host:port` pair, as the server binds it.
    pub fn new(addr: &str, timeout: Duration) -> Result<DetectionClient, ClientError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        Ok(DetectionClient { addr: addr.to_owned(), http, span: Span::none() })
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Reads `path` from disk and submits it.
    pub fn detect_file(&self, path: &Path) -> Result<Detection, ClientError> {
        let filename = path
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or_default()
            .to_owned();
        if !has_supported_extension(&filename) {
            return Err(ClientError::UnsupportedType(filename));
        }
        let bytes = std::fs::read(path)?;
        self.detect(bytes, &filename)
    }

    /// Uploads `bytes` as `filename`, then downloads the resulting heatmap.
    pub fn detect(&self, bytes: Vec<u8>, filename: &str) -> Result<Detection, ClientError> {
        let result = self.upload(bytes, filename)?;
        let heatmap = self.fetch_heatmap(result.heatmap.as_str())?;
        info!(
            parent: &self.span,
            filename,
            is_fake = result.is_fake,
            confidence = result.confidence,
            "detection finished"
        );
        Ok(Detection { result, heatmap })
    }

    /// `POST /detect` with a multipart `file` field.
    pub fn upload(&self, bytes: Vec<u8>, filename: &str) -> Result<AnalysisResult, ClientError> {
        let size = bytes.len();
        let form = Form::new().part("file", Part::bytes(bytes).file_name(filename.to_owned()));
        debug!(parent: &self.span, filename, bytes = size, "uploading image");

        let resp = self
            .http
            .post(self.url("/detect"))
            .multipart(form)
            .send()
            .map_err(|e| ClientError::from_reqwest(e, &self.addr))?;

        let status = resp.status().as_u16();
        if status != 200 {
            let message = self.error_text(resp)?;
            return Err(ClientError::Backend { status, message });
        }
        resp.json::<AnalysisResult>()
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }

    /// `GET /heatmap/{handle}`.
    pub fn fetch_heatmap(&self, handle: &str) -> Result<Vec<u8>, ClientError> {
        let resp = self
            .http
            .get(self.url(&format!("/heatmap/{}", handle)))
            .send()
            .map_err(|e| ClientError::from_reqwest(e, &self.addr))?;

        let status = resp.status().as_u16();
        if status != 200 {
            let message = self.error_text(resp)?;
            return Err(ClientError::Heatmap { status, message });
        }
        let bytes = resp.bytes().map_err(|e| ClientError::from_reqwest(e, &self.addr))?;
        debug!(parent: &self.span, handle, bytes = bytes.len(), "heatmap downloaded");
        Ok(bytes.to_vec())
    }

    /// The backend's `error` field, or the raw body when it is not JSON.
    fn error_text(&self, resp: Response) -> Result<String, ClientError> {
        let body = resp.text().map_err(|e| ClientError::from_reqwest(e, &self.addr))?;
        Ok(match serde_json::from_str::<ErrorBody>(&body) {
            Ok(parsed) => parsed.error,
            Err(_) => body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;

    #[test]
    fn refuses_unsupported_extension_locally() {
        let client = DetectionClient::new("127.0.0.1:9", Duration::from_secs(1)).unwrap();
        let err = client.detect_file(Path::new("clip.gif")).unwrap_err();
        assert!(matches!(err, ClientError::UnsupportedType(ref f) if f == "clip.gif"));
    }

    #[test]
    fn closed_port_is_a_connect_error() {
        // Bind then drop to find a port nothing listens on.
        let port = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap().port();
        let addr = format!("127.0.0.1:{}", port);
        let client = DetectionClient::new(&addr, Duration::from_secs(5)).unwrap();
        let err = client.detect(vec![1, 2, 3], "a.png").unwrap_err();
        assert!(matches!(err, ClientError::Connect { .. }), "got {err:?}");
    }

    #[test]
    fn silent_server_is_a_timeout() {
        // Accepts the connection but never answers.
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        let hold = std::thread::spawn(move || {
            let conn = listener.accept();
            std::thread::sleep(Duration::from_secs(2));
            drop(conn);
        });
        let client = DetectionClient::new(&addr, Duration::from_millis(300)).unwrap();
        let err = client.detect(vec![1, 2, 3], "a.png").unwrap_err();
        assert!(matches!(err, ClientError::Timeout), "got {err:?}");
        hold.join().unwrap();
    }
}
