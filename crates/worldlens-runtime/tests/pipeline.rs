//! End-to-end pipeline behavior over a small two-document corpus.

use std::sync::Arc;

use worldlens_core::{ClusterConfig, Depth, Document, PipelineConfig};
use worldlens_infer::HashEmbedder;
use worldlens_runtime::Pipeline;

const BELIEF: &str =
    "I believe that most people think school teaches conformity, but actually it teaches obedience.";

fn corpus() -> Vec<Document> {
    vec![
        Document::new(
            "ep1",
            format!(
                "{BELIEF} School rewards compliance over curiosity, and ranking \
                 reinforces obedience across every grade."
            ),
        )
        .with_title("Episode 1"),
        Document::new(
            "ep2",
            format!(
                "{BELIEF} Conformity and ranking pressure students away from \
                 independent thought in school."
            ),
        )
        .with_title("Episode 2"),
    ]
}

#[test]
fn quote_scorer_flags_the_contrarian_belief() {
    let pipeline = Pipeline::new(PipelineConfig::default());
    let collection = pipeline.run_quotes(&corpus());

    assert_eq!(collection.source_count, 2);
    let best = collection
        .quotes
        .iter()
        .find(|q| q.text.contains("but actually"))
        .expect("belief sentence should survive scoring");
    assert!(best.score >= 0.5, "score = {}", best.score);
    assert!(best.is_contrarian);
}

#[test]
fn extractor_surfaces_the_core_terms() {
    let pipeline = Pipeline::new(PipelineConfig::default());
    let extraction = pipeline.run_extraction(&corpus()).unwrap();

    let keyword_terms: Vec<&str> = extraction.keywords.iter().map(|k| k.term.as_str()).collect();
    for expected in ["school", "conformity", "obedience"] {
        assert!(
            keyword_terms.iter().any(|t| t.contains(expected)),
            "missing {expected} in {keyword_terms:?}"
        );
    }
    assert_eq!(extraction.source_transcripts, vec!["ep1", "ep2"]);
}

#[test]
fn single_cluster_quick_synthesis_reports_its_coherence() {
    let config = PipelineConfig {
        cluster: ClusterConfig {
            n_clusters: 1,
            ..ClusterConfig::default()
        },
        ..PipelineConfig::default()
    };
    let pipeline = Pipeline::new(config);

    let extraction = pipeline.run_extraction(&corpus()).unwrap();
    let clusters = pipeline.run_clustering(&extraction).unwrap();
    assert_eq!(clusters.clusters.len(), 1);

    let cluster_terms: Vec<&str> = clusters.clusters[0]
        .members
        .iter()
        .map(|m| m.term.as_str())
        .collect();
    for expected in ["school", "conformity", "obedience"] {
        assert!(
            cluster_terms.iter().any(|t| t.contains(expected)),
            "missing {expected} in cluster"
        );
    }

    let outcome = pipeline
        .run_synthesis(&clusters, Some(&extraction), "Subject", Depth::Quick)
        .unwrap();
    assert_eq!(outcome.worldview.points.len(), 1);
    assert_eq!(
        outcome.worldview.points[0].confidence,
        clusters.clusters[0].coherence
    );
}

#[test]
fn extraction_is_idempotent() {
    let pipeline = Pipeline::new(PipelineConfig::default());
    let a = pipeline.run_extraction(&corpus()).unwrap();
    let b = pipeline.run_extraction(&corpus()).unwrap();

    // Content fields match exactly; only the creation timestamp varies.
    assert_eq!(
        serde_json::to_value(&a.keywords).unwrap(),
        serde_json::to_value(&b.keywords).unwrap()
    );
    assert_eq!(
        serde_json::to_value(&a.entities).unwrap(),
        serde_json::to_value(&b.entities).unwrap()
    );
    assert_eq!(
        serde_json::to_value(&a.phrases).unwrap(),
        serde_json::to_value(&b.phrases).unwrap()
    );
    assert_eq!(
        serde_json::to_value(&a.tfidf).unwrap(),
        serde_json::to_value(&b.tfidf).unwrap()
    );
    assert_eq!(
        serde_json::to_value(&a.co_occurrences).unwrap(),
        serde_json::to_value(&b.co_occurrences).unwrap()
    );
    assert_eq!(a.source_transcripts, b.source_transcripts);
}

#[test]
fn clustering_is_idempotent() {
    let pipeline =
        Pipeline::new(PipelineConfig::default()).with_embedder(Arc::new(HashEmbedder::default()));
    let extraction = pipeline.run_extraction(&corpus()).unwrap();
    let a = pipeline.run_clustering(&extraction).unwrap();
    let b = pipeline.run_clustering(&extraction).unwrap();

    assert_eq!(a.silhouette_score, b.silhouette_score);
    assert_eq!(a.clusters.len(), b.clusters.len());
    for (ca, cb) in a.clusters.iter().zip(b.clusters.iter()) {
        assert_eq!(ca.label, cb.label);
        assert_eq!(ca.coherence, cb.coherence);
    }
}

#[test]
fn full_run_persists_loadable_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = Pipeline::new(PipelineConfig::default());
    let run = pipeline
        .run(&corpus(), "Subject", Depth::Medium, Some(dir.path()))
        .unwrap();

    assert!(!run.worldview().points.is_empty());

    let worldview = worldlens_core::Artifact::load(&dir.path().join("worldview.json"))
        .unwrap()
        .into_worldview()
        .unwrap();
    assert_eq!(worldview.subject, "Subject");
    assert_eq!(worldview.points.len(), run.worldview().points.len());
}
