//! Source documents consumed by the pipeline.

use serde::{Deserialize, Serialize};

/// One ingested transcript or article. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Caller-supplied identifier (video id, file stem, url slug).
    pub source_id: String,
    /// Human-readable title; falls back to the source id.
    pub title: String,
    /// Raw text.
    pub text: String,
}

impl Document {
    pub fn new(source_id: impl Into<String>, text: impl Into<String>) -> Self {
        let source_id = source_id.into();
        Self {
            title: source_id.clone(),
            source_id,
            text: text.into(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}
