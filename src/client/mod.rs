pub mod detection_client;
pub mod error;

pub use detection_client::{Detection, DetectionClient};
pub use error::ClientError;
