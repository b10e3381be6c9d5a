//! Frequency-weighted n-gram phrase mining.

use std::collections::{BTreeMap, BTreeSet};

use once_cell::sync::Lazy;
use regex::Regex;

use worldlens_core::ExtractedPhrase;

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[a-zA-Z]{2,}\b").unwrap());

fn tokenize(text: &str) -> Vec<String> {
    WORD.find_iter(&text.to_lowercase())
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Extract contiguous n-gram phrases (n in [2, 4]) occurring more than
/// once across the corpus, ranked by count descending.
pub fn extract_phrases(
    texts: &[&str],
    source_ids: &[&str],
    top_n: usize,
) -> Vec<ExtractedPhrase> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut sources: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

    for (text, source_id) in texts.iter().zip(source_ids.iter()) {
        let tokens = tokenize(text);
        for n in 2..=4usize {
            for window in tokens.windows(n) {
                let phrase = window.join(" ");
                *counts.entry(phrase.clone()).or_insert(0) += 1;
                sources
                    .entry(phrase)
                    .or_default()
                    .insert((*source_id).to_string());
            }
        }
    }

    let mut results: Vec<ExtractedPhrase> = counts
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(phrase, count)| ExtractedPhrase {
            sources: sources.remove(&phrase).unwrap_or_default().into_iter().collect(),
            phrase,
            count,
        })
        .collect();

    results.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.phrase.cmp(&b.phrase)));
    results.truncate(top_n);
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_singletons_dropped() {
        let phrases = extract_phrases(&["alpha beta gamma delta"], &["a"], 50);
        assert!(phrases.is_empty());
    }

    #[test]
    fn test_repeated_phrase_counted() {
        let text = "free markets work. free markets work.";
        let phrases = extract_phrases(&[text], &["a"], 50);
        let top = &phrases[0];
        assert_eq!(top.phrase, "free markets");
        assert_eq!(top.count, 2);
    }

    #[test]
    fn test_truncation_keeps_highest_counts() {
        let text = "one two one two one two three four three four";
        let phrases = extract_phrases(&[text], &["a"], 1);
        assert_eq!(phrases.len(), 1);
        assert_eq!(phrases[0].phrase, "one two");
    }

    #[test]
    fn test_sources_span_documents() {
        let phrases = extract_phrases(
            &["free markets work well", "free markets work badly"],
            &["a", "b"],
            50,
        );
        let fm = phrases.iter().find(|p| p.phrase == "free markets").unwrap();
        assert_eq!(fm.sources, vec!["a".to_string(), "b".to_string()]);
    }
}
