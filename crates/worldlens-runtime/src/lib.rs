//! Pipeline orchestration.
//!
//! Wires the stages together: corpus loading, quote scoring, term
//! extraction, clustering and synthesis, with optional artifact
//! persistence for resumable runs.

pub mod corpus;
pub mod orchestrator;

pub use corpus::{load_directory, CorpusSource, DirectorySource, MemorySource};
pub use orchestrator::{Pipeline, PipelineRun};
