//! Error types for worldlens.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("Clustering error: {0}")]
    Clustering(String),

    #[error("Synthesis error: {0}")]
    Synthesis(String),

    #[error("Inference error: {0}")]
    Inference(String),

    #[error("Precondition violated: {0}")]
    Precondition(String),

    #[error("Corpus error: {0}")]
    Corpus(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
