//! Sliding-window term co-occurrence counting.

use std::collections::BTreeMap;

use worldlens_core::CoOccurrence;

use crate::stopwords::COOCCURRENCE_STOPWORDS;

fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphabetic())
        .filter(|w| w.len() >= 3 && !COOCCURRENCE_STOPWORDS.contains(*w))
        .map(|w| w.to_string())
        .collect()
}

/// Count co-occurring term pairs inside a sliding window over all texts.
///
/// Pairs are unordered: (a, b) and (b, a) accumulate into the same
/// canonical pair. Texts shorter than the window contribute nothing.
pub fn extract_cooccurrences(texts: &[&str], window_size: usize, top_n: usize) -> Vec<CoOccurrence> {
    if window_size < 2 {
        return Vec::new();
    }
    let mut counts: BTreeMap<[String; 2], usize> = BTreeMap::new();
    for text in texts {
        let tokens = tokenize(text);
        if tokens.len() < window_size {
            continue;
        }
        for window in tokens.windows(window_size) {
            for i in 0..window.len() {
                for j in (i + 1)..window.len() {
                    if window[i] == window[j] {
                        continue;
                    }
                    let pair = if window[i] <= window[j] {
                        [window[i].clone(), window[j].clone()]
                    } else {
                        [window[j].clone(), window[i].clone()]
                    };
                    *counts.entry(pair).or_insert(0) += 1;
                }
            }
        }
    }

    let mut pairs: Vec<CoOccurrence> = counts
        .into_iter()
        .map(|(pair, count)| CoOccurrence::new(pair[0].clone(), pair[1].clone(), count))
        .collect();
    pairs.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.pair.cmp(&b.pair)));
    pairs.truncate(top_n);
    pairs
}
