//! The three synthesis depths and the degrade state machine.
//!
//! Quick ranks clusters and reuses their labels. Medium enriches the
//! same ranking with extraction statistics. Deep builds a prompt for a
//! generative backend and, on any failure at that boundary, degrades to
//! the statistical path. The degrade is recorded as a first-class state
//! transition, not an invisible catch.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use worldlens_core::{
    Cluster, ClusterResult, Depth, Error, Extraction, Result, SynthConfig, SynthesisMethod,
    Worldview, WorldviewPoint,
};

use crate::generator::TextGenerator;
use crate::json::parse_points;
use crate::prompt::deep_prompt;

/// One transition in a synthesis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SynthesisState {
    Requested { depth: Depth },
    Degraded { from: Depth, to: Depth },
    Completed { method: SynthesisMethod },
}

/// A finished synthesis with its transition log.
#[derive(Debug, Clone)]
pub struct SynthesisOutcome {
    pub worldview: Worldview,
    pub states: Vec<SynthesisState>,
}

impl SynthesisOutcome {
    /// Whether the run degraded from its requested depth.
    pub fn degraded(&self) -> bool {
        self.states
            .iter()
            .any(|s| matches!(s, SynthesisState::Degraded { .. }))
    }
}

/// Clusters ranked by impact, `coherence * member_count` descending.
fn ranked_clusters(clusters: &ClusterResult) -> Vec<&Cluster> {
    let mut sorted: Vec<&Cluster> = clusters.clusters.iter().collect();
    sorted.sort_by(|a, b| {
        let ia = a.coherence * a.members.len() as f64;
        let ib = b.coherence * b.members.len() as f64;
        ib.partial_cmp(&ia)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.id.cmp(&b.id))
    });
    sorted
}

/// Label-only synthesis. No extraction data, no external calls.
pub fn synthesize_quick(
    clusters: &ClusterResult,
    subject: &str,
    n_points: usize,
) -> Worldview {
    let mut points = Vec::new();

    for cluster in ranked_clusters(clusters).into_iter().take(n_points) {
        let point = if cluster.centroid_terms.len() > 2 {
            format!(
                "Focus on {}, {}, and related concepts",
                cluster.centroid_terms[0], cluster.centroid_terms[1]
            )
        } else {
            cluster.label.replace(" / ", " and ")
        };
        let evidence: Vec<String> = cluster
            .members
            .iter()
            .take(5)
            .map(|m| m.term.clone())
            .collect();

        points.push(WorldviewPoint {
            point,
            elaboration: None,
            confidence: cluster.coherence,
            evidence,
            sources: Vec::new(),
        });
    }

    Worldview {
        subject: subject.to_string(),
        points,
        method: SynthesisMethod::LabelOnly,
        depth: Depth::Quick,
        source_documents: Vec::new(),
        generated_at: Some(Utc::now()),
    }
}

/// Statistical synthesis. Requires extraction data, no external calls.
pub fn synthesize_medium(
    clusters: &ClusterResult,
    extraction: &Extraction,
    subject: &str,
    n_points: usize,
) -> Worldview {
    let mut points = Vec::new();

    for cluster in ranked_clusters(clusters).into_iter().take(n_points) {
        let top_terms: Vec<&str> = cluster
            .centroid_terms
            .iter()
            .take(3)
            .map(String::as_str)
            .collect();

        // Up to two extracted phrases containing a top centroid term.
        let mut related_phrases: Vec<&str> = Vec::new();
        for phrase in extraction.phrases.iter().take(20) {
            let lower = phrase.phrase.to_lowercase();
            if top_terms.iter().any(|t| lower.contains(&t.to_lowercase())) {
                related_phrases.push(&phrase.phrase);
                if related_phrases.len() >= 2 {
                    break;
                }
            }
        }

        let point = if let Some(first) = related_phrases.first() {
            format!("{}: {}", titlecase(top_terms[0]), first)
        } else {
            top_terms
                .iter()
                .take(2)
                .map(|t| titlecase(t))
                .collect::<Vec<_>>()
                .join(" and ")
        };

        let mut evidence: Vec<String> = cluster
            .members
            .iter()
            .take(5)
            .map(|m| m.term.clone())
            .collect();
        evidence.extend(related_phrases.iter().map(|p| p.to_string()));

        // Confidence averages the cluster's coherence with the mean
        // TF-IDF weight of its top terms, both clamped to [0, 1].
        let mean_tfidf = if top_terms.is_empty() {
            0.0
        } else {
            top_terms
                .iter()
                .map(|t| {
                    extraction
                        .tfidf
                        .iter()
                        .find(|w| w.term.eq_ignore_ascii_case(t))
                        .map(|w| w.score)
                        .unwrap_or(0.0)
                })
                .sum::<f64>()
                / top_terms.len() as f64
        };
        let confidence =
            (cluster.coherence.clamp(0.0, 1.0) + mean_tfidf.clamp(0.0, 1.0)) / 2.0;

        points.push(WorldviewPoint {
            point,
            elaboration: Some(format!("Related concepts: {}", top_terms.join(", "))),
            confidence,
            evidence,
            sources: extraction.source_transcripts.iter().take(3).cloned().collect(),
        });
    }

    Worldview {
        subject: subject.to_string(),
        points,
        method: SynthesisMethod::Statistical,
        depth: Depth::Medium,
        source_documents: extraction.source_transcripts.clone(),
        generated_at: Some(Utc::now()),
    }
}

/// Model-grounded synthesis with degrade-to-statistical fallback.
pub fn synthesize_deep(
    clusters: &ClusterResult,
    extraction: &Extraction,
    subject: &str,
    config: &SynthConfig,
    generator: &dyn TextGenerator,
) -> SynthesisOutcome {
    let mut states = vec![SynthesisState::Requested { depth: Depth::Deep }];

    let completion = if generator.is_available() {
        let prompt = deep_prompt(clusters, extraction, subject, config.n_points);
        match generator.complete(&prompt) {
            Ok(text) => Some(text),
            Err(e) => {
                warn!(backend = generator.name(), error = %e, "generation failed");
                None
            }
        }
    } else {
        warn!(backend = generator.name(), "generative backend unavailable");
        None
    };

    let parsed = completion.as_deref().and_then(parse_points);

    match parsed {
        Some(raw_points) => {
            let points: Vec<WorldviewPoint> = raw_points
                .into_iter()
                .take(config.n_points)
                .map(|p| WorldviewPoint {
                    point: p.point,
                    elaboration: p.elaboration,
                    confidence: p.confidence.clamp(0.0, 1.0),
                    evidence: p.supporting_evidence,
                    sources: extraction.source_transcripts.iter().take(3).cloned().collect(),
                })
                .collect();

            info!(points = points.len(), "model-grounded synthesis complete");
            states.push(SynthesisState::Completed {
                method: SynthesisMethod::ModelGrounded,
            });
            SynthesisOutcome {
                worldview: Worldview {
                    subject: subject.to_string(),
                    points,
                    method: SynthesisMethod::ModelGrounded,
                    depth: Depth::Deep,
                    source_documents: extraction.source_transcripts.clone(),
                    generated_at: Some(Utc::now()),
                },
                states,
            }
        }
        None => {
            info!("degrading deep synthesis to the statistical path");
            states.push(SynthesisState::Degraded {
                from: Depth::Deep,
                to: Depth::Medium,
            });
            let worldview =
                synthesize_medium(clusters, extraction, subject, config.n_points);
            states.push(SynthesisState::Completed {
                method: SynthesisMethod::Statistical,
            });
            SynthesisOutcome { worldview, states }
        }
    }
}

/// Synthesize at the requested depth.
///
/// Medium and deep require extraction data; calling them without it is
/// a caller-contract violation and errors immediately.
pub fn synthesize(
    clusters: &ClusterResult,
    extraction: Option<&Extraction>,
    subject: &str,
    depth: Depth,
    config: &SynthConfig,
    generator: &dyn TextGenerator,
) -> Result<SynthesisOutcome> {
    match depth {
        Depth::Quick => {
            let worldview = synthesize_quick(clusters, subject, config.n_points);
            Ok(SynthesisOutcome {
                worldview,
                states: vec![
                    SynthesisState::Requested { depth: Depth::Quick },
                    SynthesisState::Completed {
                        method: SynthesisMethod::LabelOnly,
                    },
                ],
            })
        }
        Depth::Medium => {
            let extraction = extraction.ok_or_else(|| {
                Error::Precondition("medium synthesis requires extraction data".to_string())
            })?;
            let worldview = synthesize_medium(clusters, extraction, subject, config.n_points);
            Ok(SynthesisOutcome {
                worldview,
                states: vec![
                    SynthesisState::Requested { depth: Depth::Medium },
                    SynthesisState::Completed {
                        method: SynthesisMethod::Statistical,
                    },
                ],
            })
        }
        Depth::Deep => {
            let extraction = extraction.ok_or_else(|| {
                Error::Precondition("deep synthesis requires extraction data".to_string())
            })?;
            Ok(synthesize_deep(clusters, extraction, subject, config, generator))
        }
    }
}

fn titlecase(term: &str) -> String {
    term.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
