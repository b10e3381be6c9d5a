//! Silhouette score for evaluating a k-means partition.

use ndarray::Array1;

use crate::kmeans::distance;

/// Mean silhouette coefficient over all points, in [-1, 1].
///
/// Degenerate partitions score 0: fewer than two points, a single
/// populated cluster, or every point alone in its own cluster.
pub fn silhouette_score(vectors: &[Array1<f32>], assignments: &[usize]) -> f64 {
    let n = vectors.len();
    if n < 2 {
        return 0.0;
    }
    let mut labels: Vec<usize> = assignments.to_vec();
    labels.sort_unstable();
    labels.dedup();
    if labels.len() < 2 || labels.len() == n {
        return 0.0;
    }

    let mut total = 0.0f64;
    for (i, vector) in vectors.iter().enumerate() {
        let own = assignments[i];

        // Mean distance to other members of the same cluster.
        let mut intra_sum = 0.0f64;
        let mut intra_count = 0usize;
        // Mean distance to each other cluster, take the minimum.
        let mut inter: Vec<(f64, usize)> = labels
            .iter()
            .filter(|&&l| l != own)
            .map(|&l| (0.0, l))
            .collect();

        for (j, other) in vectors.iter().enumerate() {
            if i == j {
                continue;
            }
            let d = distance(vector, other) as f64;
            if assignments[j] == own {
                intra_sum += d;
                intra_count += 1;
            } else if let Some(entry) = inter.iter_mut().find(|(_, l)| *l == assignments[j]) {
                entry.0 += d;
            }
        }

        if intra_count == 0 {
            // Singleton cluster contributes 0.
            continue;
        }
        let a = intra_sum / intra_count as f64;

        let b = inter
            .iter()
            .filter_map(|(sum, l)| {
                let count = assignments.iter().filter(|&&x| x == *l).count();
                if count > 0 {
                    Some(sum / count as f64)
                } else {
                    None
                }
            })
            .fold(f64::MAX, f64::min);

        if b == f64::MAX {
            continue;
        }

        let denom = a.max(b);
        if denom > 0.0 {
            total += (b - a) / denom;
        }
    }

    total / n as f64
}
