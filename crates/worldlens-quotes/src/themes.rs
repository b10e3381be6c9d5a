//! Theme grouping over pooled quotes.
//!
//! Groups top quotable sentences under their most frequent content
//! words, so each theme is grounded in actual quotes rather than bare
//! keyword counts.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::quotes::QuoteCollection;

const THEME_STOPWORDS: &[&str] = &[
    "the", "a", "an", "is", "are", "was", "were", "be", "been", "being", "have", "has", "had",
    "do", "does", "did", "will", "would", "could", "should", "may", "might", "must", "shall",
    "can", "to", "of", "in", "for", "on", "with", "at", "by", "from", "as", "or", "and", "but",
    "if", "then", "so", "than", "that", "this", "these", "those", "it", "its", "you", "your",
    "i", "my", "me", "we", "our", "they", "their",
];

/// A quote that supports a theme.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupportingQuote {
    pub text: String,
    pub source: String,
}

/// A theme with its supporting quotes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteTheme {
    pub name: String,
    pub frequency: usize,
    pub supporting_quotes: Vec<SupportingQuote>,
}

/// Group quotes into up to `max_themes` word-anchored themes.
///
/// Each quote supports at most one theme; themes with no unused
/// supporting quote are dropped.
pub fn group_themes(collection: &QuoteCollection, max_themes: usize) -> Vec<QuoteTheme> {
    let stopwords: HashSet<&str> = THEME_STOPWORDS.iter().copied().collect();

    let mut word_counts: HashMap<String, usize> = HashMap::new();
    for quote in &collection.quotes {
        for word in quote.text.to_lowercase().split_whitespace() {
            let word: String = word.chars().filter(|c| c.is_alphanumeric()).collect();
            if word.len() > 3 && !stopwords.contains(word.as_str()) {
                *word_counts.entry(word).or_insert(0) += 1;
            }
        }
    }

    // Most frequent first; ties alphabetical for determinism.
    let mut ranked: Vec<(String, usize)> = word_counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let mut themes = Vec::new();
    let mut used: HashSet<&str> = HashSet::new();

    for (word, count) in ranked.iter().take(max_themes * 2) {
        if themes.len() >= max_themes {
            break;
        }

        let mut supporting = Vec::new();
        for quote in &collection.quotes {
            if used.contains(quote.text.as_str()) {
                continue;
            }
            if quote.text.to_lowercase().contains(word.as_str()) {
                supporting.push(SupportingQuote {
                    text: quote.text.clone(),
                    source: quote.source_id.clone(),
                });
                used.insert(quote.text.as_str());
                if supporting.len() >= 3 {
                    break;
                }
            }
        }

        if !supporting.is_empty() {
            themes.push(QuoteTheme {
                name: titlecase(word),
                frequency: *count,
                supporting_quotes: supporting,
            });
        }
    }

    themes
}

fn titlecase(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
