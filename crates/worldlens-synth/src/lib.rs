//! Worldview synthesis.
//!
//! Turns clustered terms (plus extraction statistics) into an ordered
//! list of evidence-backed worldview points, at three depths. The deep
//! path calls a generative backend and degrades to the statistical path
//! on any failure at that boundary. An alternate path derives beliefs
//! directly from scored quotes.

pub mod depths;
pub mod generator;
pub mod json;
pub mod ollama;
pub mod prompt;
pub mod quotes_grounded;

pub use depths::{
    synthesize, synthesize_deep, synthesize_medium, synthesize_quick, SynthesisOutcome,
    SynthesisState,
};
pub use generator::{TextGenerator, UnavailableGenerator};
pub use quotes_grounded::{synthesize_from_quotes, QuoteGroundedOutcome};

#[cfg(feature = "ollama")]
pub use ollama::OllamaGenerator;
