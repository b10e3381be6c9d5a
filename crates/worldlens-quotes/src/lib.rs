//! Worldlens Quotes — sentence splitting and notability scoring.
//!
//! Splits documents into sentences, scores each against opinion,
//! contrarian, specificity, length, and named-entity signals, and pools
//! the survivors into a corpus-wide ranked collection.

pub mod quotes;
pub mod score;
pub mod sentences;
pub mod themes;

pub use quotes::{extract_quotes, extract_quotes_all, Quote, QuoteCollection};
pub use score::{score_sentence, SentenceScore, CONTRARIAN_PHRASES, OPINION_STARTERS};
pub use sentences::split_sentences;
pub use themes::{group_themes, QuoteTheme, SupportingQuote};
