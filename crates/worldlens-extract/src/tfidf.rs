//! Corpus-wide TF-IDF term weighting.
//!
//! Unigrams and bigrams over stopword-filtered tokens, smoothed idf
//! (`ln((1+n)/(1+df)) + 1`), per-document L2 normalization, weights
//! summed across documents. Higher score = more relevant. A
//! single-document corpus skips the `max_df` pruning so it cannot
//! empty the vocabulary.

use std::collections::{BTreeMap, HashMap};

use worldlens_core::TfidfTerm;

use crate::stopwords::ENGLISH_STOPWORDS;

const MAX_DF_RATIO: f64 = 0.95;

fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.len() >= 2 && !ENGLISH_STOPWORDS.contains(*w))
        .map(|w| w.to_string())
        .collect()
}

/// Unigram + bigram counts for one document.
fn term_counts(text: &str) -> HashMap<String, usize> {
    let tokens = tokenize(text);
    let mut counts = HashMap::new();
    for token in &tokens {
        *counts.entry(token.clone()).or_insert(0) += 1;
    }
    for pair in tokens.windows(2) {
        *counts.entry(pair.join(" ")).or_insert(0) += 1;
    }
    counts
}

/// Compute summed TF-IDF weights over the corpus, descending.
pub fn extract_tfidf(texts: &[&str], top_n: usize, max_features: usize) -> Vec<TfidfTerm> {
    if texts.is_empty() {
        return Vec::new();
    }
    let n_docs = texts.len();

    let doc_counts: Vec<HashMap<String, usize>> =
        texts.iter().map(|t| term_counts(t)).collect();

    // Document frequency and corpus frequency per term.
    let mut df: BTreeMap<String, usize> = BTreeMap::new();
    let mut corpus_tf: BTreeMap<String, usize> = BTreeMap::new();
    for counts in &doc_counts {
        for (term, count) in counts {
            *df.entry(term.clone()).or_insert(0) += 1;
            *corpus_tf.entry(term.clone()).or_insert(0) += count;
        }
    }

    // Prune overly common terms, but never on a single-document corpus.
    if n_docs > 1 {
        let max_df = (MAX_DF_RATIO * n_docs as f64).floor() as usize;
        df.retain(|_, d| *d <= max_df.max(1));
    }

    // Cap vocabulary by corpus frequency.
    if df.len() > max_features {
        let mut ranked: Vec<(&String, usize)> =
            df.keys().map(|t| (t, corpus_tf[t])).collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        let keep: std::collections::HashSet<String> = ranked
            .into_iter()
            .take(max_features)
            .map(|(t, _)| t.clone())
            .collect();
        df.retain(|t, _| keep.contains(t));
    }

    let idf: BTreeMap<&String, f64> = df
        .iter()
        .map(|(term, d)| {
            let idf = ((1.0 + n_docs as f64) / (1.0 + *d as f64)).ln() + 1.0;
            (term, idf)
        })
        .collect();

    // Per-document L2-normalized rows, summed into corpus weights.
    let mut scores: BTreeMap<String, f64> = BTreeMap::new();
    for counts in &doc_counts {
        let row: Vec<(&String, f64)> = counts
            .iter()
            .filter_map(|(term, count)| idf.get(term).map(|i| (term, *count as f64 * i)))
            .collect();
        let norm = row.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        if norm <= f64::EPSILON {
            continue;
        }
        for (term, weight) in row {
            *scores.entry(term.clone()).or_insert(0.0) += weight / norm;
        }
    }

    let mut results: Vec<TfidfTerm> = scores
        .into_iter()
        .map(|(term, score)| TfidfTerm { term, score })
        .collect();
    results.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.term.cmp(&b.term))
    });
    results.truncate(top_n);
    results
}
