//! Unsupervised statistical keyword extraction (YAKE-style).
//!
//! Scores single terms per document from casing, position, normalized
//! frequency, neighborhood relatedness, and sentence dispersion, then
//! composes candidate n-gram scores from the member term scores. Lower
//! score means more relevant — the inverse of every other extractor in
//! this crate. Scores are averaged across documents and source sets are
//! unioned before the final ascending truncation.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use tracing::debug;

use worldlens_core::ExtractedKeyword;
use worldlens_quotes::split_sentences;

use crate::stopwords::ENGLISH_STOPWORDS;

/// Per-term occurrence statistics collected in one pass.
#[derive(Debug, Default)]
struct TermStats {
    tf: usize,
    tf_upper: usize,
    tf_proper: usize,
    sentence_indices: Vec<usize>,
    left_neighbors: HashSet<String>,
    right_neighbors: HashSet<String>,
    left_total: usize,
    right_total: usize,
}

fn tokenize_sentence(sentence: &str) -> Vec<String> {
    sentence
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.len() >= 2 && w.chars().any(|c| c.is_alphabetic()))
        .map(|w| w.to_string())
        .collect()
}

fn is_all_caps(word: &str) -> bool {
    word.len() > 1 && word.chars().all(|c| c.is_uppercase())
}

fn is_proper(word: &str) -> bool {
    let mut chars = word.chars();
    matches!(chars.next(), Some(c) if c.is_uppercase())
        && chars.next().map(|c| c.is_lowercase()).unwrap_or(false)
}

/// Score every qualifying term and n-gram candidate in one document.
///
/// Returns lowercased candidate → score. Empty text yields an empty map.
pub fn score_document(text: &str, max_ngram: usize) -> HashMap<String, f64> {
    let sentences: Vec<Vec<String>> = split_sentences(text)
        .iter()
        .map(|s| tokenize_sentence(s))
        .filter(|tokens| !tokens.is_empty())
        .collect();
    let total_sentences = sentences.len();
    if total_sentences == 0 {
        return HashMap::new();
    }

    // Single pass: per-term stats keyed by lowercased surface.
    let mut stats: BTreeMap<String, TermStats> = BTreeMap::new();
    for (si, tokens) in sentences.iter().enumerate() {
        for (wi, word) in tokens.iter().enumerate() {
            let key = word.to_lowercase();
            let entry = stats.entry(key).or_default();
            entry.tf += 1;
            if is_all_caps(word) {
                entry.tf_upper += 1;
            }
            if wi > 0 && is_proper(word) {
                entry.tf_proper += 1;
            }
            entry.sentence_indices.push(si);
            if wi > 0 {
                entry.left_neighbors.insert(tokens[wi - 1].to_lowercase());
                entry.left_total += 1;
            }
            if wi + 1 < tokens.len() {
                entry.right_neighbors.insert(tokens[wi + 1].to_lowercase());
                entry.right_total += 1;
            }
        }
    }

    let tfs: Vec<f64> = stats.values().map(|s| s.tf as f64).collect();
    let mean_tf = tfs.iter().sum::<f64>() / tfs.len() as f64;
    let var_tf = tfs.iter().map(|t| (t - mean_tf).powi(2)).sum::<f64>() / tfs.len() as f64;
    let std_tf = var_tf.sqrt();
    let max_tf = tfs.iter().cloned().fold(1.0, f64::max);

    // Single-term scores.
    let mut term_scores: HashMap<String, f64> = HashMap::new();
    for (term, s) in &stats {
        let tf = s.tf as f64;

        let casing = s.tf_upper.max(s.tf_proper) as f64 / (1.0 + tf.ln());

        let mut indices = s.sentence_indices.clone();
        indices.sort_unstable();
        let median = indices[indices.len() / 2] as f64;
        let position = (3.0 + median).ln().ln();

        let frequency = tf / (mean_tf + std_tf).max(f64::EPSILON);

        let dl = if s.left_total > 0 {
            s.left_neighbors.len() as f64 / s.left_total as f64
        } else {
            0.0
        };
        let dr = if s.right_total > 0 {
            s.right_neighbors.len() as f64 / s.right_total as f64
        } else {
            0.0
        };
        let relatedness = 1.0 + (dl + dr) * (tf / max_tf);

        let dispersion = s.sentence_indices.iter().collect::<HashSet<_>>().len() as f64
            / total_sentences as f64;

        let score =
            (relatedness * position) / (casing + frequency / relatedness + dispersion / relatedness);
        term_scores.insert(term.clone(), score);
    }

    // N-gram candidates that do not start or end with a stopword.
    let mut candidate_tf: HashMap<String, usize> = HashMap::new();
    let mut candidate_terms: HashMap<String, Vec<String>> = HashMap::new();
    for tokens in &sentences {
        let lowered: Vec<String> = tokens.iter().map(|w| w.to_lowercase()).collect();
        for n in 1..=max_ngram {
            for window in lowered.windows(n) {
                if ENGLISH_STOPWORDS.contains(window[0].as_str())
                    || ENGLISH_STOPWORDS.contains(window[n - 1].as_str())
                {
                    continue;
                }
                let surface = window.join(" ");
                *candidate_tf.entry(surface.clone()).or_insert(0) += 1;
                candidate_terms
                    .entry(surface)
                    .or_insert_with(|| window.to_vec());
            }
        }
    }

    // Compose candidate scores from member term scores.
    let mut scores = HashMap::new();
    for (surface, members) in candidate_terms {
        let member_scores: Vec<f64> = members
            .iter()
            .filter_map(|m| term_scores.get(m))
            .copied()
            .collect();
        if member_scores.len() != members.len() {
            continue;
        }
        let product: f64 = member_scores.iter().product();
        let sum: f64 = member_scores.iter().sum();
        let tf = candidate_tf[&surface] as f64;
        scores.insert(surface, product / (tf * (1.0 + sum)));
    }

    scores
}

/// Extract keywords across a corpus.
///
/// Per-document scores are averaged for each unique lowercased term and
/// source sets are unioned; the final ranking is ascending by averaged
/// score (lower = more relevant), truncated to `top_n`.
pub fn extract_keywords(
    texts: &[&str],
    source_ids: &[&str],
    top_n: usize,
    max_ngram: usize,
) -> Vec<ExtractedKeyword> {
    let mut score_sums: BTreeMap<String, (f64, usize)> = BTreeMap::new();
    let mut sources: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

    for (text, source_id) in texts.iter().zip(source_ids.iter()) {
        for (term, score) in score_document(text, max_ngram) {
            let entry = score_sums.entry(term.clone()).or_insert((0.0, 0));
            entry.0 += score;
            entry.1 += 1;
            sources
                .entry(term)
                .or_default()
                .insert((*source_id).to_string());
        }
    }

    let mut results: Vec<ExtractedKeyword> = score_sums
        .into_iter()
        .map(|(term, (sum, count))| ExtractedKeyword {
            score: sum / count as f64,
            frequency: count,
            sources: sources.remove(&term).unwrap_or_default().into_iter().collect(),
            term,
        })
        .collect();

    results.sort_by(|a, b| {
        a.score
            .partial_cmp(&b.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.term.cmp(&b.term))
    });
    results.truncate(top_n);

    debug!("Extracted {} keywords (ascending score)", results.len());
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_yields_nothing() {
        assert!(extract_keywords(&[""], &["a"], 50, 3).is_empty());
        assert!(extract_keywords(&[], &[], 50, 3).is_empty());
    }

    #[test]
    fn test_content_words_surface() {
        let text = "School teaches conformity. School rewards obedience. \
                    Obedience is the hidden curriculum of school.";
        let keywords = extract_keywords(&[text], &["vid1"], 50, 3);
        let terms: Vec<&str> = keywords.iter().map(|k| k.term.as_str()).collect();
        assert!(terms.contains(&"school"));
        assert!(terms.contains(&"obedience"));
        assert!(terms.contains(&"conformity"));
    }

    #[test]
    fn test_ascending_order_and_truncation() {
        let text = "Money compounds quietly. Attention compounds loudly. \
                    Skills compound over decades of deliberate practice.";
        let keywords = extract_keywords(&[text], &["a"], 4, 2);
        assert!(keywords.len() <= 4);
        for pair in keywords.windows(2) {
            assert!(pair[0].score <= pair[1].score);
        }
    }

    #[test]
    fn test_sources_unioned_across_documents() {
        let text = "School teaches conformity above everything else.";
        let keywords = extract_keywords(&[text, text], &["a", "b"], 50, 3);
        let school = keywords.iter().find(|k| k.term == "school").unwrap();
        assert_eq!(school.sources, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(school.frequency, 2);
    }

    #[test]
    fn test_candidates_never_edge_on_stopwords() {
        let text = "The market rewards the patient investor over the clever one.";
        let keywords = extract_keywords(&[text], &["a"], 100, 3);
        for kw in &keywords {
            let words: Vec<&str> = kw.term.split(' ').collect();
            assert!(!ENGLISH_STOPWORDS.contains(words[0]), "term {}", kw.term);
            assert!(
                !ENGLISH_STOPWORDS.contains(*words.last().unwrap()),
                "term {}",
                kw.term
            );
        }
    }
}
