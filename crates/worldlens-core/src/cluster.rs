//! Clustering data model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A term assigned to a cluster, with its distance to the centroid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterMember {
    pub term: String,
    pub distance: f64,
}

/// A thematic cluster of related terms.
///
/// `id` is the centroid index assigned during clustering; the final
/// cluster list is re-sorted by coherence, so `id` is not a rank.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cluster {
    pub id: usize,
    /// The one or two nearest-to-centroid terms joined by " / ".
    pub label: String,
    /// Up to three nearest-to-centroid terms.
    pub centroid_terms: Vec<String>,
    /// Members sorted by ascending distance to centroid.
    pub members: Vec<ClusterMember>,
    /// `1 / (1 + mean(member distances))`, in (0, 1].
    pub coherence: f64,
}

/// Result of clustering extracted terms.
///
/// Every input term appears in exactly one cluster or in `unclustered`,
/// never both and never omitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterResult {
    pub clusters: Vec<Cluster>,
    #[serde(default)]
    pub unclustered: Vec<String>,
    /// Silhouette score of the final partition; 0 for degenerate runs.
    pub silhouette_score: f64,
    pub embedding_model: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl ClusterResult {
    /// Total number of terms across clusters and the unclustered list.
    pub fn term_count(&self) -> usize {
        self.clusters.iter().map(|c| c.members.len()).sum::<usize>() + self.unclustered.len()
    }
}
