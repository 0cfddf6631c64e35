use std::sync::Arc;

use fakescope::AnalysisService;

/// The service shared by every request thread.
///
/// No lock is needed: the service has no per-request state and its heatmap
/// store synchronises internally.
pub type SharedService = Arc<AnalysisService>;
