//! Term embedding for semantic clustering.
//!
//! Provides the `EmbedderBackend` trait. When the `onnx` feature is
//! enabled and model files are present, `OnnxEmbedder` loads
//! all-MiniLM-L6-v2 for 384-dim embeddings. Otherwise the deterministic
//! `HashEmbedder` keeps clustering available without model files.

pub mod cache;
pub mod embedder;
pub mod onnx_embedder;

pub use cache::{CachingEmbedder, EmbeddingCache};
pub use embedder::{EmbedderBackend, EmbeddingResult, HashEmbedder, NoopEmbedder, HASH_DIM};

#[cfg(feature = "onnx")]
pub use onnx_embedder::OnnxEmbedder;

use std::path::Path;
use std::sync::Arc;

/// Create the best available embedder for the given model directory.
///
/// Tries ONNX first (if the feature is enabled and model files are
/// present), then falls back to the hashing embedder. Either way the
/// returned backend is wrapped in an embedding cache.
pub fn create_embedder(model_dir: &Path) -> Arc<dyn EmbedderBackend> {
    #[cfg(feature = "onnx")]
    {
        match OnnxEmbedder::load(model_dir) {
            Ok(embedder) => {
                tracing::info!("Using ONNX embedder (dim={})", embedder.dimension());
                return Arc::new(CachingEmbedder::new(embedder));
            }
            Err(e) => {
                tracing::warn!("ONNX embedder unavailable: {}. Falling back to hashing.", e);
            }
        }
    }

    #[cfg(not(feature = "onnx"))]
    {
        let _ = model_dir;
        tracing::info!("ONNX feature disabled. Using hashing embedder.");
    }

    Arc::new(CachingEmbedder::new(HashEmbedder::default()))
}
