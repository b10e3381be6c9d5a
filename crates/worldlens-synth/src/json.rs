//! Lenient parsing of generative-model completions.
//!
//! Completions are expected but not guaranteed to contain a JSON
//! object. Parsing never panics and never propagates past the synthesis
//! boundary; any failure surfaces as `None` and the caller degrades.

use serde::Deserialize;

/// One claim as emitted by the model.
#[derive(Debug, Deserialize)]
pub struct RawPoint {
    #[serde(default)]
    pub point: String,
    #[serde(default)]
    pub elaboration: Option<String>,
    #[serde(default = "default_confidence")]
    pub confidence: f64,
    #[serde(default)]
    pub supporting_evidence: Vec<String>,
}

fn default_confidence() -> f64 {
    0.5
}

#[derive(Debug, Deserialize)]
struct RawResponse {
    #[serde(default)]
    worldview_points: Vec<RawPoint>,
}

/// Extract the outermost JSON object from a completion and parse its
/// `worldview_points` array. Returns `None` when no parseable object is
/// present or the array is empty.
pub fn parse_points(completion: &str) -> Option<Vec<RawPoint>> {
    let start = completion.find('{')?;
    let end = completion.rfind('}')?;
    if end <= start {
        return None;
    }
    let candidate = &completion[start..=end];
    let parsed: RawResponse = serde_json::from_str(candidate).ok()?;
    if parsed.worldview_points.is_empty() {
        None
    } else {
        Some(parsed.worldview_points)
    }
}
