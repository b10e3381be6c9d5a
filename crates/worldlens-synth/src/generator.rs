//! Generative text backend trait.

use worldlens_core::Result;

/// A generative text-completion backend.
///
/// `is_available` is probed once before a synthesis run; a backend that
/// answers `false` is never called. `complete` makes a single blocking
/// attempt, no retries.
pub trait TextGenerator: Send + Sync {
    fn name(&self) -> &str;

    /// Whether the backend can serve completions right now.
    fn is_available(&self) -> bool;

    /// Send one prompt and return the raw completion text. The text is
    /// expected, but not guaranteed, to contain a JSON object.
    fn complete(&self, prompt: &str) -> Result<String>;
}

/// Generator for environments with no generative backend configured.
#[derive(Debug, Default)]
pub struct UnavailableGenerator;

impl TextGenerator for UnavailableGenerator {
    fn name(&self) -> &str {
        "unavailable"
    }

    fn is_available(&self) -> bool {
        false
    }

    fn complete(&self, _prompt: &str) -> Result<String> {
        Err(worldlens_core::Error::Synthesis(
            "no generative backend configured".to_string(),
        ))
    }
}
