//! Quote-grounded synthesis: beliefs derived directly from scored
//! quotes, bypassing extraction and clustering.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use worldlens_core::WorldviewPoint;
use worldlens_quotes::{Quote, QuoteCollection};

use crate::generator::TextGenerator;
use crate::json::parse_points;
use crate::prompt::quote_grounded_prompt;

/// Result of the quote-grounded path.
///
/// The scored quotes are always carried, even when generation fails, so
/// the caller never loses extracted evidence. A populated `error` with
/// empty `points` marks a failed run; a populated `error` with quotes
/// present marks a partial one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteGroundedOutcome {
    pub subject: String,
    pub worldview_points: Vec<WorldviewPoint>,
    pub quotes: Vec<Quote>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Derive distinctive beliefs directly from a quote collection.
pub fn synthesize_from_quotes(
    collection: &QuoteCollection,
    subject: &str,
    n_points: usize,
    generator: &dyn TextGenerator,
) -> QuoteGroundedOutcome {
    if collection.quotes.is_empty() {
        warn!("quote-grounded synthesis requested with zero quotes");
        return QuoteGroundedOutcome {
            subject: subject.to_string(),
            worldview_points: Vec::new(),
            quotes: Vec::new(),
            error: Some("no quotable sentences found".to_string()),
        };
    }

    if !generator.is_available() {
        return QuoteGroundedOutcome {
            subject: subject.to_string(),
            worldview_points: Vec::new(),
            quotes: collection.quotes.clone(),
            error: Some(format!("generative backend '{}' unavailable", generator.name())),
        };
    }

    let prompt = quote_grounded_prompt(&collection.quotes, subject, n_points);
    let completion = match generator.complete(&prompt) {
        Ok(text) => text,
        Err(e) => {
            warn!(error = %e, "quote-grounded generation failed, keeping quotes");
            return QuoteGroundedOutcome {
                subject: subject.to_string(),
                worldview_points: Vec::new(),
                quotes: collection.quotes.clone(),
                error: Some(e.to_string()),
            };
        }
    };

    match parse_points(&completion) {
        Some(raw_points) => {
            let points: Vec<WorldviewPoint> = raw_points
                .into_iter()
                .take(n_points)
                .map(|p| WorldviewPoint {
                    point: p.point,
                    elaboration: p.elaboration,
                    confidence: p.confidence.clamp(0.0, 1.0),
                    evidence: p.supporting_evidence,
                    sources: collection
                        .quotes
                        .iter()
                        .map(|q| q.source_id.clone())
                        .collect::<std::collections::BTreeSet<_>>()
                        .into_iter()
                        .collect(),
                })
                .collect();
            info!(points = points.len(), "quote-grounded synthesis complete");
            QuoteGroundedOutcome {
                subject: subject.to_string(),
                worldview_points: points,
                quotes: collection.quotes.clone(),
                error: None,
            }
        }
        None => QuoteGroundedOutcome {
            subject: subject.to_string(),
            worldview_points: Vec::new(),
            quotes: collection.quotes.clone(),
            error: Some("model response contained no parseable worldview points".to_string()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use worldlens_core::Result;

    struct StubGenerator {
        response: Result<String>,
    }

    impl TextGenerator for StubGenerator {
        fn name(&self) -> &str {
            "stub"
        }

        fn is_available(&self) -> bool {
            true
        }

        fn complete(&self, _prompt: &str) -> Result<String> {
            match &self.response {
                Ok(s) => Ok(s.clone()),
                Err(e) => Err(worldlens_core::Error::Synthesis(e.to_string())),
            }
        }
    }

    fn quote(text: &str) -> Quote {
        Quote {
            text: text.to_string(),
            source_id: "ep1".to_string(),
            source_title: "Episode 1".to_string(),
            timestamp_approx: None,
            position: 0.0,
            context: None,
            score: 0.5,
            reasons: vec!["contrarian".to_string()],
            is_contrarian: true,
        }
    }

    fn collection() -> QuoteCollection {
        QuoteCollection {
            subject: Some("Subject".to_string()),
            quotes: vec![quote("School teaches obedience."), quote("Ranking rewards compliance.")],
            source_count: 1,
            created_at: None,
        }
    }

    #[test]
    fn test_zero_quotes_is_explicit_error_result() {
        let empty = QuoteCollection {
            subject: None,
            quotes: Vec::new(),
            source_count: 0,
            created_at: None,
        };
        let generator = StubGenerator { response: Ok(String::new()) };
        let outcome = synthesize_from_quotes(&empty, "Subject", 3, &generator);
        assert!(outcome.worldview_points.is_empty());
        assert!(outcome.error.is_some());
    }

    #[test]
    fn test_generation_failure_preserves_quotes() {
        let generator = StubGenerator {
            response: Err(worldlens_core::Error::Synthesis("connection refused".to_string())),
        };
        let outcome = synthesize_from_quotes(&collection(), "Subject", 3, &generator);
        assert!(outcome.worldview_points.is_empty());
        assert_eq!(outcome.quotes.len(), 2);
        assert!(outcome.error.as_deref().unwrap().contains("connection refused"));
    }

    #[test]
    fn test_successful_synthesis_cites_quotes() {
        let generator = StubGenerator {
            response: Ok(r#"{"worldview_points": [{"point": "Education optimizes for obedience.", "confidence": 0.9, "supporting_evidence": ["School teaches obedience.", "Ranking rewards compliance."]}]}"#.to_string()),
        };
        let outcome = synthesize_from_quotes(&collection(), "Subject", 3, &generator);
        assert!(outcome.error.is_none());
        assert_eq!(outcome.worldview_points.len(), 1);
        assert_eq!(outcome.worldview_points[0].evidence.len(), 2);
        assert_eq!(outcome.worldview_points[0].sources, vec!["ep1"]);
        assert_eq!(outcome.quotes.len(), 2);
    }

    #[test]
    fn test_non_json_response_keeps_quotes() {
        let generator = StubGenerator {
            response: Ok("no json here".to_string()),
        };
        let outcome = synthesize_from_quotes(&collection(), "Subject", 3, &generator);
        assert!(outcome.worldview_points.is_empty());
        assert_eq!(outcome.quotes.len(), 2);
        assert!(outcome.error.is_some());
    }
}
