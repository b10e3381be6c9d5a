//! Semantic clustering of extracted terms.
//!
//! Terms pooled from an extraction are embedded and partitioned with a
//! deterministic k-means. The cluster count is either fixed by
//! configuration or chosen by silhouette search. Identical input always
//! produces an identical partition.

pub mod engine;
pub mod kmeans;
pub mod silhouette;

pub use engine::{cluster_terms, pool_terms};
pub use kmeans::{kmeans, KMeansOutcome};
pub use silhouette::silhouette_score;
