//! Stopword lists used by the extractors.

use std::collections::HashSet;

use once_cell::sync::Lazy;

/// English stopwords used by the TF-IDF and keyword extractors.
pub static ENGLISH_STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any",
        "are", "aren", "as", "at", "be", "because", "been", "before", "being", "below",
        "between", "both", "but", "by", "can", "cannot", "could", "couldn", "did", "didn",
        "do", "does", "doesn", "doing", "don", "down", "during", "each", "few", "for", "from",
        "further", "had", "hadn", "has", "hasn", "have", "haven", "having", "he", "her",
        "here", "hers", "herself", "him", "himself", "his", "how", "i", "if", "in", "into",
        "is", "isn", "it", "its", "itself", "just", "let", "ll", "me", "more", "most",
        "mustn", "my", "myself", "no", "nor", "not", "now", "of", "off", "on", "once",
        "only", "or", "other", "ought", "our", "ours", "ourselves", "out", "over", "own",
        "re", "same", "shan", "she", "should", "shouldn", "so", "some", "such", "than",
        "that", "the", "their", "theirs", "them", "themselves", "then", "there", "these",
        "they", "this", "those", "through", "to", "too", "under", "until", "up", "ve",
        "very", "was", "wasn", "we", "were", "weren", "what", "when", "where", "which",
        "while", "who", "whom", "why", "will", "with", "won", "would", "wouldn", "you",
        "your", "yours", "yourself", "yourselves",
    ]
    .into_iter()
    .collect()
});

/// Broader stopword list used by the co-occurrence extractor.
pub static COOCCURRENCE_STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "the", "and", "that", "this", "with", "for", "are", "was", "were", "been", "have",
        "has", "had", "will", "would", "could", "should", "can", "may", "might", "must",
        "shall", "into", "from", "about", "what", "which", "who", "whom", "when", "where",
        "why", "how", "all", "each", "every", "both", "few", "more", "most", "other", "some",
        "such", "than", "too", "very", "just", "also", "now", "only", "then", "there",
        "here", "these", "those", "their", "your", "its", "his", "her", "our", "they",
        "you", "she", "him", "them",
    ]
    .into_iter()
    .collect()
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lists_contain_basics() {
        assert!(ENGLISH_STOPWORDS.contains("the"));
        assert!(COOCCURRENCE_STOPWORDS.contains("the"));
        assert!(!ENGLISH_STOPWORDS.contains("school"));
    }
}
