//! Term extraction data model.
//!
//! Shapes match the extraction interchange file: `keywords`, `entities`
//! (grouped by label), `phrases`, `tfidf`, `co_occurrences`, plus the
//! contributing source ids. All `sources` lists are kept sorted so that
//! identical input produces byte-identical output.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A keyword scored by the statistical keyword extractor.
///
/// Lower `score` means more relevant (inverted scale, YAKE convention).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedKeyword {
    pub term: String,
    pub score: f64,
    /// Number of documents the keyword was scored in.
    pub frequency: usize,
    pub sources: Vec<String>,
}

/// A named entity aggregated across documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedEntity {
    pub text: String,
    /// Entity label: PERSON, ORG, GPE, DATE, MONEY, ...
    pub label: String,
    pub frequency: usize,
    pub sources: Vec<String>,
}

/// A contiguous n-gram phrase (n in [2, 4]) occurring more than once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedPhrase {
    pub phrase: String,
    pub count: usize,
    pub sources: Vec<String>,
}

/// A term weighted by summed corpus TF-IDF. Higher is more relevant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfTerm {
    pub term: String,
    pub score: f64,
}

/// An unordered pair of terms seen inside the same sliding window.
///
/// The pair is canonicalized by lexicographic sort, so `(a, b)` and
/// `(b, a)` always collapse to one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoOccurrence {
    pub pair: [String; 2],
    pub count: usize,
}

impl CoOccurrence {
    /// Build a canonicalized pair.
    pub fn new(a: impl Into<String>, b: impl Into<String>, count: usize) -> Self {
        let (a, b) = (a.into(), b.into());
        let pair = if a <= b { [a, b] } else { [b, a] };
        Self { pair, count }
    }
}

/// Combined output of all extractors for one pipeline run.
///
/// Read-only downstream; later stages never mutate it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Extraction {
    pub keywords: Vec<ExtractedKeyword>,
    pub entities: BTreeMap<String, Vec<ExtractedEntity>>,
    pub phrases: Vec<ExtractedPhrase>,
    pub tfidf: Vec<TfidfTerm>,
    pub co_occurrences: Vec<CoOccurrence>,
    pub source_transcripts: Vec<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Extraction {
    /// Total number of extracted items across all categories.
    pub fn item_count(&self) -> usize {
        self.keywords.len()
            + self.entities.values().map(Vec::len).sum::<usize>()
            + self.phrases.len()
            + self.tfidf.len()
            + self.co_occurrences.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cooccurrence_canonical_order() {
        let ab = CoOccurrence::new("zebra", "apple", 3);
        let ba = CoOccurrence::new("apple", "zebra", 3);
        assert_eq!(ab, ba);
        assert_eq!(ab.pair[0], "apple");
    }
}
