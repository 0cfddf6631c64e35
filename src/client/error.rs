/// Caller-side failures. Connection refusal, timeouts and every other
/// transport problem are kept apart so each can be reported differently.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Only JPG/PNG images supported: {0}")]
    UnsupportedType(String),

    #[error("Backend server unavailable at {addr}. Please ensure the server is running.")]
    Connect { addr: String },

    #[error("Request timed out. Try a smaller image or check your connection.")]
    Timeout,

    #[error("Transport error: {0}")]
    Transport(String),

    /// Non-200 answer; `message` is the backend's `error` text verbatim.
    #[error("Backend error ({status}): {message}")]
    Backend { status: u16, message: String },

    #[error("Failed to get heatmap ({status}): {message}")]
    Heatmap { status: u16, message: String },

    #[error("Unexpected response from backend: {0}")]
    InvalidResponse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// Splits a reqwest failure into connect / timeout / other.
    pub fn from_reqwest(e: reqwest::Error, addr: &str) -> ClientError {
        if e.is_timeout() {
            ClientError::Timeout
        } else if e.is_connect() {
            ClientError::Connect { addr: addr.to_owned() }
        } else {
            ClientError::Transport(e.to_string())
        }
    }
}
