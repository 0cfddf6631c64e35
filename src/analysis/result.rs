use serde::{Deserialize, Serialize};

use crate::analysis::handle::HeatmapHandle;
use crate::analysis::verdict::Verdict;

/// Outcome of one `/detect` request.
///
/// Serializes to the wire shape `{"is_fake", "confidence", "heatmap_filename"}`;
/// `heatmap_filename` is the handle to pass to `GET /heatmap/{handle}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub is_fake: bool,
    pub confidence: f32,
    #[serde(rename = "heatmap_filename")]
    pub heatmap: HeatmapHandle,
}

impl AnalysisResult {
    pub fn new(verdict: Verdict, heatmap: HeatmapHandle) -> AnalysisResult {
        AnalysisResult { is_fake: verdict.is_fake, confidence: verdict.confidence, heatmap }
    }
}
