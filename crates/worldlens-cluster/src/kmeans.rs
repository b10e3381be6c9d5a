//! Deterministic k-means over embedding vectors.
//!
//! Initialization is farthest-point: the first centroid is the first
//! vector, each subsequent centroid is the point farthest from all
//! chosen centroids. No randomness, so the same input always yields the
//! same partition. Iteration is standard Lloyd's.

use ndarray::Array1;
use tracing::debug;

use worldlens_core::{Error, Result};

/// Convergence threshold for centroid movement.
const CONVERGENCE_THRESHOLD: f32 = 1e-6;

/// Output of one k-means run.
pub struct KMeansOutcome {
    pub centroids: Vec<Array1<f32>>,
    /// Cluster index per input vector.
    pub assignments: Vec<usize>,
    pub iterations: usize,
    pub converged: bool,
}

fn distance_squared(a: &Array1<f32>, b: &Array1<f32>) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum()
}

pub fn distance(a: &Array1<f32>, b: &Array1<f32>) -> f32 {
    distance_squared(a, b).sqrt()
}

/// Farthest-point initialization.
fn init_centroids(vectors: &[Array1<f32>], k: usize) -> Vec<Array1<f32>> {
    let mut centroids = Vec::with_capacity(k);
    centroids.push(vectors[0].clone());

    let mut min_distances = vec![f32::MAX; vectors.len()];
    for _ in 1..k {
        let last = centroids.last().cloned();
        if let Some(last) = last {
            for (i, vector) in vectors.iter().enumerate() {
                let dist = distance_squared(vector, &last);
                if dist < min_distances[i] {
                    min_distances[i] = dist;
                }
            }
        }
        // Point with maximum distance to its nearest centroid. Ties
        // break toward the higher index (`max_by` keeps the last
        // maximum), keeping the run deterministic.
        let next = min_distances
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(i, _)| i)
            .unwrap_or(0);
        centroids.push(vectors[next].clone());
    }
    centroids
}

fn nearest_centroid(vector: &Array1<f32>, centroids: &[Array1<f32>]) -> usize {
    let mut best = 0;
    let mut best_dist = f32::MAX;
    for (j, centroid) in centroids.iter().enumerate() {
        let dist = distance_squared(vector, centroid);
        if dist < best_dist {
            best_dist = dist;
            best = j;
        }
    }
    best
}

fn recompute_centroids(
    vectors: &[Array1<f32>],
    assignments: &[usize],
    old: &[Array1<f32>],
) -> Vec<Array1<f32>> {
    let dim = vectors[0].len();
    let k = old.len();
    let mut sums = vec![Array1::<f32>::zeros(dim); k];
    let mut counts = vec![0usize; k];

    for (vector, &cluster) in vectors.iter().zip(assignments.iter()) {
        sums[cluster] = &sums[cluster] + vector;
        counts[cluster] += 1;
    }

    sums.into_iter()
        .zip(counts)
        .enumerate()
        .map(|(j, (sum, count))| {
            if count > 0 {
                sum / count as f32
            } else {
                // Empty cluster keeps its previous centroid.
                old[j].clone()
            }
        })
        .collect()
}

/// Cluster `vectors` into `k` groups.
///
/// `k` must be in `[1, vectors.len()]` and all vectors must share a
/// dimension.
pub fn kmeans(vectors: &[Array1<f32>], k: usize, max_iterations: usize) -> Result<KMeansOutcome> {
    if vectors.is_empty() {
        return Err(Error::Clustering("no vectors to cluster".to_string()));
    }
    if k == 0 || k > vectors.len() {
        return Err(Error::Clustering(format!(
            "k ({}) must be in [1, {}]",
            k,
            vectors.len()
        )));
    }
    let dim = vectors[0].len();
    if vectors.iter().any(|v| v.len() != dim) {
        return Err(Error::Clustering("inconsistent vector dimensions".to_string()));
    }

    let mut centroids = init_centroids(vectors, k);
    let mut assignments = vec![0usize; vectors.len()];
    let mut iterations = 0;
    let mut converged = false;

    for iter in 0..max_iterations {
        iterations = iter + 1;

        for (i, vector) in vectors.iter().enumerate() {
            assignments[i] = nearest_centroid(vector, &centroids);
        }

        let new_centroids = recompute_centroids(vectors, &assignments, &centroids);

        let max_movement = centroids
            .iter()
            .zip(new_centroids.iter())
            .map(|(old, new)| distance(old, new))
            .fold(0.0f32, f32::max);

        centroids = new_centroids;

        if max_movement < CONVERGENCE_THRESHOLD {
            converged = true;
            break;
        }
    }

    debug!(k, iterations, converged, "k-means run finished");

    Ok(KMeansOutcome {
        centroids,
        assignments,
        iterations,
        converged,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn two_blobs() -> Vec<Array1<f32>> {
        vec![
            array![0.0, 0.0],
            array![0.1, 0.0],
            array![0.0, 0.1],
            array![5.0, 5.0],
            array![5.1, 5.0],
            array![5.0, 5.1],
        ]
    }

    #[test]
    fn test_rejects_empty_input() {
        assert!(kmeans(&[], 2, 100).is_err());
    }

    #[test]
    fn test_rejects_k_above_n() {
        let vectors = vec![array![1.0], array![2.0]];
        assert!(kmeans(&vectors, 3, 100).is_err());
    }

    #[test]
    fn test_separates_two_blobs() {
        let vectors = two_blobs();
        let outcome = kmeans(&vectors, 2, 100).unwrap();
        assert!(outcome.converged);
        // First three points on one side, last three on the other.
        assert_eq!(outcome.assignments[0], outcome.assignments[1]);
        assert_eq!(outcome.assignments[0], outcome.assignments[2]);
        assert_eq!(outcome.assignments[3], outcome.assignments[4]);
        assert_ne!(outcome.assignments[0], outcome.assignments[3]);
    }

    #[test]
    fn test_deterministic_across_runs() {
        let vectors = two_blobs();
        let a = kmeans(&vectors, 2, 100).unwrap();
        let b = kmeans(&vectors, 2, 100).unwrap();
        assert_eq!(a.assignments, b.assignments);
        assert_eq!(a.iterations, b.iterations);
    }

    #[test]
    fn test_k_equals_one() {
        let vectors = two_blobs();
        let outcome = kmeans(&vectors, 1, 100).unwrap();
        assert!(outcome.assignments.iter().all(|&a| a == 0));
    }

    #[test]
    fn test_identical_points() {
        let vectors = vec![array![1.0, 1.0]; 4];
        let outcome = kmeans(&vectors, 2, 100).unwrap();
        assert_eq!(outcome.assignments.len(), 4);
        assert!(outcome.converged);
    }
}
