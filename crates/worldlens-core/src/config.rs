//! Pipeline configuration.
//!
//! One `PipelineConfig` value is constructed per run and passed into the
//! pipeline entry points. There is no ambient or process-global state;
//! every tunable (scoring weights, thresholds, truncation limits) lives
//! here with defaults matching the reference behavior.

use serde::{Deserialize, Serialize};

/// Additive weights for the sentence notability signals.
///
/// Each signal contributes its weight at most once per sentence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreWeights {
    /// Sentence starts with an opinion marker ("i believe", ...).
    pub opinion_starter: f64,
    /// Sentence contains a contrarian marker ("but actually", ...).
    pub contrarian: f64,
    /// Sentence contains a specificity pattern (percent, money, ordinals).
    pub specificity: f64,
    /// Word count within the punchy range [10, 30].
    pub good_length: f64,
    /// At least two capitalized words that are not sentence-initial.
    pub named_entities: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            opinion_starter: 0.30,
            contrarian: 0.25,
            specificity: 0.15,
            good_length: 0.10,
            named_entities: 0.10,
        }
    }
}

/// Quote scorer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteConfig {
    /// Minimum words per candidate sentence.
    pub min_words: usize,
    /// Maximum words per candidate sentence.
    pub max_words: usize,
    /// Minimum total score to keep a sentence.
    pub min_score: f64,
    /// Global cap after pooling sentences from all documents.
    pub max_quotes: usize,
    /// Signal weights.
    pub weights: ScoreWeights,
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self {
            min_words: 8,
            max_words: 60,
            min_score: 0.3,
            max_quotes: 50,
            weights: ScoreWeights::default(),
        }
    }
}

/// Term extractor settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractConfig {
    /// Items kept per extractor after ranking.
    pub top_n: usize,
    /// Maximum n-gram length for keyword candidates.
    pub max_ngram: usize,
    /// Maximum TF-IDF vocabulary size.
    pub max_features: usize,
    /// Sliding window size for co-occurrence counting.
    pub window_size: usize,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            top_n: 50,
            max_ngram: 3,
            max_features: 1000,
            window_size: 5,
        }
    }
}

/// Semantic clusterer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterConfig {
    /// Explicit cluster count; `0` auto-selects via silhouette search.
    pub n_clusters: usize,
    /// Inclusive search range for auto-selected k.
    pub k_range: (usize, usize),
    /// Maximum Lloyd's iterations per k-means run.
    pub max_iterations: usize,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            n_clusters: 0,
            k_range: (2, 10),
            max_iterations: 100,
        }
    }
}

/// Worldview synthesizer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthConfig {
    /// Number of worldview points requested.
    pub n_points: usize,
    /// Generative model name passed to the backend.
    pub model: String,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            n_points: 5,
            model: "llama3".to_string(),
        }
    }
}

/// Top-level configuration for one pipeline run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub quotes: QuoteConfig,
    pub extract: ExtractConfig,
    pub cluster: ClusterConfig,
    pub synth: SynthConfig,
}
