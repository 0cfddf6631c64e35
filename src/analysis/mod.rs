pub mod decode;
pub mod error;
pub mod handle;
pub mod result;
pub mod service;
pub mod store;
pub mod verdict;

pub use error::AnalysisError;
pub use handle::HeatmapHandle;
pub use result::AnalysisResult;
pub use service::AnalysisService;
pub use store::{DirStore, HeatmapStore, MemoryStore, StoreError};
pub use verdict::{PlaceholderVerdict, Verdict, VerdictStrategy};
