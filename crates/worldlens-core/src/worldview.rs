//! Synthesized worldview data model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Synthesis tier requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Depth {
    /// Cluster labels only; no extraction data, no generative calls.
    Quick,
    /// Clusters enriched with extraction statistics; no generative calls.
    Medium,
    /// Generative-model synthesis grounded in extraction evidence.
    Deep,
}

impl std::fmt::Display for Depth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Quick => write!(f, "quick"),
            Self::Medium => write!(f, "medium"),
            Self::Deep => write!(f, "deep"),
        }
    }
}

/// How a worldview was actually produced.
///
/// Differs from [`Depth`] when a deep request degraded to the
/// statistical path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SynthesisMethod {
    LabelOnly,
    Statistical,
    ModelGrounded,
}

impl std::fmt::Display for SynthesisMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LabelOnly => write!(f, "label_only"),
            Self::Statistical => write!(f, "statistical"),
            Self::ModelGrounded => write!(f, "model_grounded"),
        }
    }
}

/// One synthesized, evidence-backed claim about the subject's beliefs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldviewPoint {
    pub point: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elaboration: Option<String>,
    /// Confidence in [0, 1].
    pub confidence: f64,
    pub evidence: Vec<String>,
    pub sources: Vec<String>,
}

/// An ordered set of worldview points for one subject.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Worldview {
    pub subject: String,
    pub points: Vec<WorldviewPoint>,
    pub method: SynthesisMethod,
    pub depth: Depth,
    #[serde(rename = "source_videos")]
    pub source_documents: Vec<String>,
    #[serde(default)]
    pub generated_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_tags() {
        assert_eq!(
            serde_json::to_string(&SynthesisMethod::ModelGrounded).unwrap(),
            "\"model_grounded\""
        );
        assert_eq!(serde_json::to_string(&Depth::Quick).unwrap(), "\"quick\"");
    }
}
