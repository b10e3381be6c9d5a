//! Quote extraction: per-document scoring and corpus-level pooling.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use worldlens_core::{Document, QuoteConfig};

use crate::score::score_sentence;
use crate::sentences::{split_sentences, truncate_chars};

/// A notable sentence extracted from a document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    pub text: String,
    pub source_id: String,
    pub source_title: String,
    /// Approximate position as a percentage string, e.g. "~42%".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp_approx: Option<String>,
    /// `sentence_index / total_sentences`, a proxy timestamp.
    pub position: f64,
    /// Previous and next sentences (truncated) around the quote.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    pub score: f64,
    pub reasons: Vec<String>,
    pub is_contrarian: bool,
}

/// Pooled quotes from a corpus, globally ranked by score.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuoteCollection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub quotes: Vec<Quote>,
    pub source_count: usize,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl QuoteCollection {
    /// View of the contrarian quotes only, preserving rank order.
    pub fn contrarian(&self) -> Vec<&Quote> {
        self.quotes.iter().filter(|q| q.is_contrarian).collect()
    }
}

/// Extract notable quotes from a single document.
///
/// Empty or whitespace-only text yields an empty list, not an error.
/// The result is sorted by score descending; ties keep document order.
pub fn extract_quotes(doc: &Document, config: &QuoteConfig) -> Vec<Quote> {
    let sentences = split_sentences(&doc.text);
    let total = sentences.len();
    let mut quotes = Vec::new();

    for (i, sentence) in sentences.iter().enumerate() {
        let word_count = sentence.split_whitespace().count();
        if word_count < config.min_words || word_count > config.max_words {
            continue;
        }

        let scored = score_sentence(sentence, &config.weights);
        if scored.score < config.min_score {
            continue;
        }

        let position = i as f64 / total.max(1) as f64;

        let mut context_parts = Vec::new();
        if i > 0 {
            context_parts.push(truncate_chars(&sentences[i - 1], 100).to_string());
        }
        context_parts.push(format!(">>> {}", sentence));
        if i + 1 < total {
            context_parts.push(truncate_chars(&sentences[i + 1], 100).to_string());
        }

        quotes.push(Quote {
            text: sentence.clone(),
            source_id: doc.source_id.clone(),
            source_title: doc.title.clone(),
            timestamp_approx: Some(format!("~{}%", (position * 100.0) as u32)),
            position,
            context: Some(context_parts.join(" ... ")),
            score: scored.score,
            reasons: scored.reasons,
            is_contrarian: scored.is_contrarian,
        });
    }

    // Stable sort keeps document order for equal scores.
    quotes.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    quotes
}

/// Extract and pool quotes from a whole corpus, truncated globally.
pub fn extract_quotes_all(docs: &[Document], config: &QuoteConfig) -> QuoteCollection {
    let mut all = Vec::new();
    for doc in docs {
        all.extend(extract_quotes(doc, config));
    }
    all.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    all.truncate(config.max_quotes);

    debug!(
        "Pooled {} quotes from {} documents (cap {})",
        all.len(),
        docs.len(),
        config.max_quotes
    );

    QuoteCollection {
        subject: None,
        quotes: all,
        source_count: docs.len(),
        created_at: Some(Utc::now()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(id: &str, text: &str) -> Document {
        Document::new(id, text)
    }

    #[test]
    fn test_word_window_filter() {
        // 40-word sentence: excluded at max_words=30, included at 60.
        let text = format!("Hi. {}.", "word ".repeat(40).trim());
        let mut config = QuoteConfig {
            min_score: 0.0,
            ..QuoteConfig::default()
        };

        config.max_words = 30;
        assert!(extract_quotes(&doc("a", &text), &config).is_empty());

        config.max_words = 60;
        let quotes = extract_quotes(&doc("a", &text), &config);
        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].text.split_whitespace().count(), 40);
    }

    #[test]
    fn test_empty_document_yields_nothing() {
        let config = QuoteConfig::default();
        assert!(extract_quotes(&doc("a", ""), &config).is_empty());
        assert!(extract_quotes(&doc("a", "   \n "), &config).is_empty());
    }

    #[test]
    fn test_scoring_and_context() {
        let text = "Setup sentence comes before the interesting part. \
                    I believe that most people think school teaches conformity, \
                    but actually it teaches obedience. \
                    And here is the sentence after it.";
        let config = QuoteConfig::default();
        let quotes = extract_quotes(&doc("vid1", text), &config);

        assert_eq!(quotes.len(), 1);
        let q = &quotes[0];
        assert!(q.score >= 0.5, "score was {}", q.score);
        assert!(q.is_contrarian);
        let context = q.context.as_deref().unwrap();
        assert!(context.contains(">>>"));
        assert!(context.contains("Setup sentence"));
        assert!(context.contains("after it"));
    }

    #[test]
    fn test_pooled_truncation_and_order() {
        let text = "I believe that most people think school teaches conformity, \
                    but actually it teaches obedience. \
                    I think the key is doing fewer things with far more focus and care.";
        let docs = vec![doc("a", text), doc("b", text)];
        let config = QuoteConfig {
            max_quotes: 2,
            ..QuoteConfig::default()
        };

        let collection = extract_quotes_all(&docs, &config);
        assert_eq!(collection.quotes.len(), 2);
        assert_eq!(collection.source_count, 2);
        // Highest score first.
        assert!(collection.quotes[0].score >= collection.quotes[1].score);
    }

    #[test]
    fn test_contrarian_view() {
        let text = "I believe that most people think school teaches conformity, \
                    but actually it teaches obedience. \
                    I think the key is doing fewer things with far more focus and care.";
        let collection = extract_quotes_all(&[doc("a", text)], &QuoteConfig::default());
        let contrarian = collection.contrarian();
        assert_eq!(contrarian.len(), 1);
        assert!(contrarian[0].is_contrarian);
    }
}
