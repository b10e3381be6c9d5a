//! Clustering engine: pools extracted terms, embeds them and partitions
//! the embedding space.

use std::sync::Arc;

use chrono::Utc;
use ndarray::Array1;
use tracing::{debug, info, warn};

use worldlens_core::{Cluster, ClusterConfig, ClusterMember, ClusterResult, Extraction, Result};
use worldlens_infer::EmbedderBackend;

use crate::kmeans::{distance, kmeans};
use crate::silhouette::silhouette_score;

/// Fewer terms than this and clustering is skipped entirely.
const MIN_TERMS: usize = 3;

/// Pool candidate terms from an extraction.
///
/// Keywords first, then TF-IDF terms, then phrases; the first
/// occurrence of a term wins, so keyword ranking takes precedence over
/// later sources.
pub fn pool_terms(extraction: &Extraction) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut terms = Vec::new();

    let candidates = extraction
        .keywords
        .iter()
        .map(|k| k.term.as_str())
        .chain(extraction.tfidf.iter().map(|t| t.term.as_str()))
        .chain(extraction.phrases.iter().map(|p| p.phrase.as_str()));

    for term in candidates {
        let normalized = term.trim().to_lowercase();
        if normalized.is_empty() {
            continue;
        }
        if seen.insert(normalized.clone()) {
            terms.push(normalized);
        }
    }
    terms
}

/// Cluster the pooled terms of an extraction.
///
/// With fewer than three terms the run degrades gracefully: all terms
/// land in `unclustered` and the silhouette score is 0. When
/// `config.n_clusters` is 0 the cluster count is chosen by silhouette
/// search over `config.k_range`; either way the final k is capped at
/// `terms - 1`.
pub fn cluster_terms(
    extraction: &Extraction,
    config: &ClusterConfig,
    embedder: Arc<dyn EmbedderBackend>,
) -> Result<ClusterResult> {
    let terms = pool_terms(extraction);

    if terms.len() < MIN_TERMS {
        warn!(terms = terms.len(), "too few terms to cluster");
        return Ok(ClusterResult {
            clusters: Vec::new(),
            unclustered: terms,
            silhouette_score: 0.0,
            embedding_model: embedder.model_name().to_string(),
            created_at: Some(Utc::now()),
        });
    }

    info!(terms = terms.len(), model = embedder.model_name(), "embedding terms");

    let mut vectors: Vec<Array1<f32>> = Vec::with_capacity(terms.len());
    let mut embedded_terms: Vec<String> = Vec::with_capacity(terms.len());
    let mut unclustered: Vec<String> = Vec::new();
    for term in terms {
        match embedder.embed(&term) {
            Some(result) => {
                vectors.push(result.embedding);
                embedded_terms.push(term);
            }
            None => unclustered.push(term),
        }
    }

    if embedded_terms.len() < MIN_TERMS {
        warn!("embedding backend produced too few vectors to cluster");
        unclustered.extend(embedded_terms);
        return Ok(ClusterResult {
            clusters: Vec::new(),
            unclustered,
            silhouette_score: 0.0,
            embedding_model: embedder.model_name().to_string(),
            created_at: Some(Utc::now()),
        });
    }

    let n = embedded_terms.len();
    let (outcome, score) = if config.n_clusters > 0 {
        // k never reaches the term count, so at least one cluster has
        // more than one member.
        let k = config.n_clusters.min(n.saturating_sub(1)).max(1);
        let outcome = kmeans(&vectors, k, config.max_iterations)?;
        let score = silhouette_score(&vectors, &outcome.assignments);
        (outcome, score)
    } else {
        select_k(&vectors, config)?
    };

    let clusters = build_clusters(&embedded_terms, &vectors, &outcome.centroids, &outcome.assignments);

    info!(
        clusters = clusters.len(),
        silhouette = score,
        "clustering complete"
    );

    Ok(ClusterResult {
        clusters,
        unclustered,
        silhouette_score: score,
        embedding_model: embedder.model_name().to_string(),
        created_at: Some(Utc::now()),
    })
}

/// Silhouette search over the configured k range.
fn select_k(
    vectors: &[Array1<f32>],
    config: &ClusterConfig,
) -> Result<(crate::kmeans::KMeansOutcome, f64)> {
    let n = vectors.len();
    let cap = n.saturating_sub(1);
    let (lo, hi) = config.k_range;
    let lo = lo.max(2).min(cap);
    let hi = hi.min(cap).max(lo);

    let mut best: Option<(crate::kmeans::KMeansOutcome, f64)> = None;
    for k in lo..=hi {
        let outcome = kmeans(vectors, k, config.max_iterations)?;
        let score = silhouette_score(vectors, &outcome.assignments);
        debug!(k, score, "candidate partition scored");
        let better = match &best {
            Some((_, best_score)) => score > *best_score,
            None => true,
        };
        if better {
            best = Some((outcome, score));
        }
    }
    // lo <= hi always holds, so at least one run happened
    best.ok_or_else(|| worldlens_core::Error::Clustering("k selection produced no partition".to_string()))
}

fn build_clusters(
    terms: &[String],
    vectors: &[Array1<f32>],
    centroids: &[Array1<f32>],
    assignments: &[usize],
) -> Vec<Cluster> {
    let mut clusters: Vec<Cluster> = Vec::new();

    for (id, centroid) in centroids.iter().enumerate() {
        let mut members: Vec<ClusterMember> = assignments
            .iter()
            .enumerate()
            .filter(|(_, &a)| a == id)
            .map(|(i, _)| ClusterMember {
                term: terms[i].clone(),
                distance: distance(&vectors[i], centroid) as f64,
            })
            .collect();
        if members.is_empty() {
            continue;
        }
        members.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.term.cmp(&b.term))
        });

        let centroid_terms: Vec<String> =
            members.iter().take(3).map(|m| m.term.clone()).collect();
        let label = members
            .iter()
            .take(2)
            .map(|m| m.term.as_str())
            .collect::<Vec<_>>()
            .join(" / ");
        let mean_dist =
            members.iter().map(|m| m.distance).sum::<f64>() / members.len() as f64;
        let coherence = 1.0 / (1.0 + mean_dist);

        clusters.push(Cluster {
            id,
            label,
            centroid_terms,
            members,
            coherence,
        });
    }

    clusters.sort_by(|a, b| {
        b.coherence
            .partial_cmp(&a.coherence)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.id.cmp(&b.id))
    });
    clusters
}

#[cfg(test)]
mod tests {
    use super::*;
    use worldlens_core::{ExtractedKeyword, ExtractedPhrase, TfidfTerm};
    use worldlens_infer::HashEmbedder;

    fn keyword(term: &str) -> ExtractedKeyword {
        ExtractedKeyword {
            term: term.to_string(),
            score: 0.1,
            frequency: 1,
            sources: vec!["ep1".to_string()],
        }
    }

    fn extraction_with(terms: &[&str]) -> Extraction {
        Extraction {
            keywords: terms.iter().map(|t| keyword(t)).collect(),
            ..Extraction::default()
        }
    }

    #[test]
    fn test_pool_terms_first_wins() {
        let extraction = Extraction {
            keywords: vec![keyword("School")],
            tfidf: vec![
                TfidfTerm { term: "school".to_string(), score: 2.0 },
                TfidfTerm { term: "obedience".to_string(), score: 1.0 },
            ],
            phrases: vec![ExtractedPhrase {
                phrase: "school system".to_string(),
                count: 2,
                sources: vec!["ep1".to_string()],
            }],
            ..Extraction::default()
        };
        let terms = pool_terms(&extraction);
        assert_eq!(terms, vec!["school", "obedience", "school system"]);
    }

    #[test]
    fn test_too_few_terms_all_unclustered() {
        let extraction = extraction_with(&["school", "ranking"]);
        let result = cluster_terms(
            &extraction,
            &ClusterConfig::default(),
            Arc::new(HashEmbedder::default()),
        )
        .unwrap();
        assert!(result.clusters.is_empty());
        assert_eq!(result.unclustered.len(), 2);
        assert_eq!(result.silhouette_score, 0.0);
    }

    #[test]
    fn test_partition_invariant() {
        // Every term ends up in exactly one cluster or unclustered.
        let terms = [
            "school", "conformity", "obedience", "ranking", "market",
            "pricing", "leverage", "curriculum",
        ];
        let extraction = extraction_with(&terms);
        let result = cluster_terms(
            &extraction,
            &ClusterConfig::default(),
            Arc::new(HashEmbedder::default()),
        )
        .unwrap();
        assert_eq!(result.term_count(), terms.len());

        let mut seen = std::collections::HashSet::new();
        for cluster in &result.clusters {
            for member in &cluster.members {
                assert!(seen.insert(member.term.clone()), "duplicate {}", member.term);
            }
        }
        for term in &result.unclustered {
            assert!(seen.insert(term.clone()));
        }
    }

    #[test]
    fn test_explicit_k_single_cluster() {
        let extraction = extraction_with(&["school", "conformity", "obedience", "ranking"]);
        let config = ClusterConfig {
            n_clusters: 1,
            ..ClusterConfig::default()
        };
        let result =
            cluster_terms(&extraction, &config, Arc::new(HashEmbedder::default())).unwrap();
        assert_eq!(result.clusters.len(), 1);
        assert_eq!(result.clusters[0].members.len(), 4);
    }

    #[test]
    fn test_explicit_k_capped_below_term_count() {
        let terms = ["school", "conformity", "obedience", "ranking"];
        let extraction = extraction_with(&terms);
        let config = ClusterConfig {
            n_clusters: terms.len(),
            ..ClusterConfig::default()
        };
        let result =
            cluster_terms(&extraction, &config, Arc::new(HashEmbedder::default())).unwrap();
        assert!(
            result.clusters.len() < terms.len(),
            "k must stay below the term count, got {} clusters",
            result.clusters.len()
        );
        assert_eq!(result.term_count(), terms.len());
    }

    #[test]
    fn test_auto_k_range_above_term_count_is_capped() {
        let extraction = extraction_with(&["school", "conformity", "obedience", "ranking"]);
        let config = ClusterConfig {
            n_clusters: 0,
            k_range: (10, 12),
            ..ClusterConfig::default()
        };
        let result =
            cluster_terms(&extraction, &config, Arc::new(HashEmbedder::default())).unwrap();
        assert!(!result.clusters.is_empty());
        assert!(result.clusters.len() <= 3);
    }

    #[test]
    fn test_coherence_in_unit_interval() {
        let extraction = extraction_with(&["school", "conformity", "obedience", "ranking", "tests"]);
        let result = cluster_terms(
            &extraction,
            &ClusterConfig::default(),
            Arc::new(HashEmbedder::default()),
        )
        .unwrap();
        for cluster in &result.clusters {
            assert!(cluster.coherence > 0.0 && cluster.coherence <= 1.0);
        }
    }

    #[test]
    fn test_members_sorted_by_distance() {
        let extraction = extraction_with(&["school", "conformity", "obedience", "ranking", "tests"]);
        let config = ClusterConfig {
            n_clusters: 1,
            ..ClusterConfig::default()
        };
        let result =
            cluster_terms(&extraction, &config, Arc::new(HashEmbedder::default())).unwrap();
        for cluster in &result.clusters {
            for pair in cluster.members.windows(2) {
                assert!(pair[0].distance <= pair[1].distance);
            }
            assert!(!cluster.label.is_empty());
            assert!(cluster.centroid_terms.len() <= 3);
        }
    }

    #[test]
    fn test_clusters_sorted_by_coherence() {
        let extraction = extraction_with(&[
            "school", "conformity", "obedience", "ranking", "market", "pricing",
        ]);
        let result = cluster_terms(
            &extraction,
            &ClusterConfig::default(),
            Arc::new(HashEmbedder::default()),
        )
        .unwrap();
        for pair in result.clusters.windows(2) {
            assert!(pair[0].coherence >= pair[1].coherence);
        }
    }

    #[test]
    fn test_deterministic() {
        let extraction = extraction_with(&[
            "school", "conformity", "obedience", "ranking", "market", "pricing",
        ]);
        let run = || {
            cluster_terms(
                &extraction,
                &ClusterConfig::default(),
                Arc::new(HashEmbedder::default()),
            )
            .unwrap()
        };
        let a = run();
        let b = run();
        assert_eq!(a.silhouette_score, b.silhouette_score);
        assert_eq!(a.clusters.len(), b.clusters.len());
        for (ca, cb) in a.clusters.iter().zip(b.clusters.iter()) {
            assert_eq!(ca.label, cb.label);
            assert_eq!(
                ca.members.iter().map(|m| &m.term).collect::<Vec<_>>(),
                cb.members.iter().map(|m| &m.term).collect::<Vec<_>>()
            );
        }
    }
}
