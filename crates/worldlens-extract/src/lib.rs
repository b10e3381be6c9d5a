//! Statistical term extraction over a document corpus.
//!
//! Five extractors run over the same texts and their results combine
//! into one [`Extraction`]: scored keywords, grouped named entities,
//! repeated phrases, corpus TF-IDF weights and windowed term
//! co-occurrence pairs. Everything here is deterministic; the same
//! corpus always yields the same extraction (timestamps aside).

pub mod cooccur;
pub mod entities;
pub mod keywords;
pub mod phrases;
pub mod stopwords;
pub mod tfidf;

use chrono::Utc;
use tracing::{debug, info, warn};

use worldlens_core::{Document, ExtractConfig, Extraction, Result};

pub use entities::{aggregate_entities, EntityMention, HeuristicNer, NerBackend, UnavailableNer};
pub use cooccur::extract_cooccurrences;
pub use keywords::extract_keywords;
pub use phrases::extract_phrases;
pub use tfidf::extract_tfidf;

/// Run every extractor over the corpus.
///
/// The NER backend is probed once up front; an unavailable backend
/// degrades to an empty entity map rather than failing the run. An
/// empty corpus yields an empty extraction.
pub fn extract_all(
    documents: &[Document],
    config: &ExtractConfig,
    ner: &dyn NerBackend,
) -> Result<Extraction> {
    if documents.is_empty() {
        warn!("extraction requested for empty corpus");
        return Ok(Extraction {
            created_at: Some(Utc::now()),
            ..Extraction::default()
        });
    }

    let texts: Vec<&str> = documents.iter().map(|d| d.text.as_str()).collect();
    let source_ids: Vec<&str> = documents.iter().map(|d| d.source_id.as_str()).collect();

    info!(documents = documents.len(), "running term extraction");

    let keywords = extract_keywords(&texts, &source_ids, config.top_n, config.max_ngram);
    debug!(keywords = keywords.len(), "keyword extraction complete");

    let entities = if ner.is_available() {
        let mut per_doc = Vec::with_capacity(documents.len());
        for doc in documents {
            per_doc.push((doc.source_id.clone(), ner.extract(&doc.text)?));
        }
        aggregate_entities(&per_doc)
    } else {
        warn!(backend = ner.name(), "NER backend unavailable, skipping entities");
        Default::default()
    };

    let phrases = extract_phrases(&texts, &source_ids, config.top_n);
    let tfidf = extract_tfidf(&texts, config.top_n, config.max_features);
    let co_occurrences = extract_cooccurrences(&texts, config.window_size, config.top_n);

    let mut source_transcripts: Vec<String> =
        source_ids.iter().map(|s| s.to_string()).collect();
    source_transcripts.sort();

    let extraction = Extraction {
        keywords,
        entities,
        phrases,
        tfidf,
        co_occurrences,
        source_transcripts,
        created_at: Some(Utc::now()),
    };
    info!(items = extraction.item_count(), "extraction complete");
    Ok(extraction)
}
