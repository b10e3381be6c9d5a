//! Additive notability scoring for single sentences.
//!
//! Each signal contributes its configured weight at most once; only the
//! first matching phrase in a category counts. A sentence that trips no
//! signal scores 0.0, never an error.

use once_cell::sync::Lazy;
use regex::Regex;

use worldlens_core::ScoreWeights;

/// Prefixes that mark an opinion or belief statement.
pub const OPINION_STARTERS: &[&str] = &[
    "i believe",
    "i think",
    "the truth is",
    "most people",
    "the problem is",
    "what matters is",
    "the key is",
    "contrary to",
    "unlike most",
    "the reality is",
    "in my view",
    "in my experience",
    "i've found that",
    "what i've learned",
    "the important thing",
];

/// Substrings that frame a view as counter to majority belief.
pub const CONTRARIAN_PHRASES: &[&str] = &[
    "but actually",
    "however",
    "on the contrary",
    "most people think",
    "conventional wisdom",
    "the opposite is true",
    "counterintuitively",
    "what's often missed",
    "contrary to popular",
    "the counterintuitive",
    "surprisingly",
];

static SPECIFICITY_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\d+%",
        r"\d+ (years|months|days|percent|people|times)",
        r"\$\d+",
        r"\b(first|second|third|specifically|exactly)\b",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Outcome of scoring one sentence.
#[derive(Debug, Clone)]
pub struct SentenceScore {
    pub score: f64,
    pub reasons: Vec<String>,
    pub is_contrarian: bool,
}

/// Score a sentence for quote-worthiness.
pub fn score_sentence(sentence: &str, weights: &ScoreWeights) -> SentenceScore {
    let mut score = 0.0;
    let mut reasons = Vec::new();
    let mut is_contrarian = false;
    let lower = sentence.to_lowercase();

    if let Some(starter) = OPINION_STARTERS.iter().find(|s| lower.starts_with(**s)) {
        score += weights.opinion_starter;
        reasons.push(format!("opinion_starter:{}", starter));
    }

    if CONTRARIAN_PHRASES.iter().any(|p| lower.contains(*p)) {
        score += weights.contrarian;
        reasons.push("contrarian".to_string());
        is_contrarian = true;
    }

    if SPECIFICITY_PATTERNS.iter().any(|re| re.is_match(&lower)) {
        score += weights.specificity;
        reasons.push("specific".to_string());
    }

    let word_count = sentence.split_whitespace().count();
    if (10..=30).contains(&word_count) {
        score += weights.good_length;
        reasons.push("good_length".to_string());
    }

    if capitalized_mid_sentence(sentence) >= 2 {
        score += weights.named_entities;
        reasons.push("named_entities".to_string());
    }

    SentenceScore {
        score,
        reasons,
        is_contrarian,
    }
}

/// Count capitalized words that are not sentence-initial and not ALL_CAPS.
fn capitalized_mid_sentence(sentence: &str) -> usize {
    sentence
        .split_whitespace()
        .skip(1)
        .filter(|word| {
            let cleaned: String = word.chars().filter(|c| c.is_alphanumeric()).collect();
            let mut chars = cleaned.chars();
            match chars.next() {
                Some(first) => {
                    first.is_uppercase() && chars.next().map(|c| c.is_lowercase()).unwrap_or(false)
                }
                None => false,
            }
        })
        .count()
}
