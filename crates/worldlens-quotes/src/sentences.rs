//! Sentence boundary detection.
//!
//! Breaks after `.`, `!`, or `?` followed by whitespace. This is a
//! heuristic rule and will mis-split abbreviations and decimals, which
//! is acceptable for transcript text; downstream filters absorb the
//! resulting fragments.

use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Normalize runs of whitespace to single spaces.
pub fn normalize_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text.trim(), " ").into_owned()
}

/// Split normalized text into sentences (lookbehind-free boundary scan).
pub fn split_sentences(text: &str) -> Vec<String> {
    let text = normalize_whitespace(text);
    let mut sentences = Vec::new();
    let mut start = 0;
    let bytes = text.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        if (b == b'.' || b == b'!' || b == b'?')
            && i + 1 < bytes.len()
            && bytes[i + 1].is_ascii_whitespace()
        {
            let s = text[start..=i].trim();
            if !s.is_empty() {
                sentences.push(s.to_string());
            }
            start = i + 1;
        }
    }
    let s = text[start..].trim();
    if !s.is_empty() {
        sentences.push(s.to_string());
    }
    sentences
}

/// Truncate to at most `max_chars` characters, respecting char boundaries.
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_basic() {
        let sentences = split_sentences("First sentence. Second one! Third?");
        assert_eq!(sentences.len(), 3);
        assert_eq!(sentences[0], "First sentence.");
        assert_eq!(sentences[2], "Third?");
    }

    #[test]
    fn test_split_collapses_whitespace() {
        let sentences = split_sentences("One  thing.\n\nAnother   thing.");
        assert_eq!(sentences, vec!["One thing.", "Another thing."]);
    }

    #[test]
    fn test_empty_input() {
        assert!(split_sentences("").is_empty());
        assert!(split_sentences("   \n\t ").is_empty());
    }

    #[test]
    fn test_truncate_respects_char_boundary() {
        assert_eq!(truncate_chars("héllo wörld", 5), "héllo");
        assert_eq!(truncate_chars("short", 100), "short");
    }
}
