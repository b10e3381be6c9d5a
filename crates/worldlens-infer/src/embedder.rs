//! Embedding backend trait and the built-in hashing embedder.
//!
//! The `EmbedderBackend` trait abstracts over embedding generation.
//! Implementations:
//! - `HashEmbedder`: deterministic feature hashing, always available
//! - `OnnxEmbedder`: ONNX Runtime with all-MiniLM-L6-v2 (requires the `onnx` feature)
//! - `NoopEmbedder`: returns None to signal no embeddings available

use ndarray::Array1;

/// Result of an embedding operation.
pub struct EmbeddingResult {
    /// Float32 embedding vector.
    pub embedding: Array1<f32>,
    /// Whether this was served from cache.
    pub cached: bool,
}

/// Trait for embedding backends.
pub trait EmbedderBackend: Send + Sync {
    /// Generate an embedding for a text string.
    /// Returns None if the embedder is not available.
    fn embed(&self, text: &str) -> Option<EmbeddingResult>;

    /// Generate embeddings for a batch of texts.
    fn embed_batch(&self, texts: &[&str]) -> Vec<Option<EmbeddingResult>> {
        texts.iter().map(|t| self.embed(t)).collect()
    }

    /// Name of the backing model, recorded in cluster artifacts.
    fn model_name(&self) -> &str;

    /// Get the embedding dimension.
    fn dimension(&self) -> usize;

    /// Check if the embedder is available (model loaded).
    fn is_available(&self) -> bool;
}

/// Placeholder embedder that always returns None.
pub struct NoopEmbedder {
    dim: usize,
}

impl NoopEmbedder {
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }
}

impl EmbedderBackend for NoopEmbedder {
    fn embed(&self, _text: &str) -> Option<EmbeddingResult> {
        None
    }

    fn model_name(&self) -> &str {
        "none"
    }

    fn dimension(&self) -> usize {
        self.dim
    }

    fn is_available(&self) -> bool {
        false
    }
}

/// Default embedding dimension for the hashing embedder.
pub const HASH_DIM: usize = 256;

/// Deterministic feature-hashing embedder.
///
/// Hashes character trigrams and whole words into a fixed-size vector
/// and L2-normalizes the result. No model files, no I/O, identical
/// input always maps to the identical vector. Quality is far below a
/// transformer model but the geometry is stable enough for term
/// clustering, and it keeps the pipeline runnable everywhere.
pub struct HashEmbedder {
    dim: usize,
}

impl HashEmbedder {
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(HASH_DIM)
    }
}

/// FNV-1a over bytes. Stable across platforms and runs.
fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf29ce484222325;
    for &b in bytes {
        hash ^= b as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}

impl EmbedderBackend for HashEmbedder {
    fn embed(&self, text: &str) -> Option<EmbeddingResult> {
        let normalized = text.to_lowercase();
        let mut vector = Array1::<f32>::zeros(self.dim);

        // Character trigrams over the padded string capture subword
        // similarity between related terms.
        let padded: Vec<char> = format!(" {} ", normalized).chars().collect();
        for trigram in padded.windows(3) {
            let key: String = trigram.iter().collect();
            let h = fnv1a(key.as_bytes());
            let slot = (h % self.dim as u64) as usize;
            let sign = if (h >> 32) & 1 == 0 { 1.0 } else { -1.0 };
            vector[slot] += sign;
        }

        // Whole words, weighted heavier than trigrams.
        for word in normalized.split_whitespace() {
            let h = fnv1a(word.as_bytes());
            let slot = (h % self.dim as u64) as usize;
            let sign = if (h >> 32) & 1 == 0 { 1.0 } else { -1.0 };
            vector[slot] += 2.0 * sign;
        }

        let norm = vector.dot(&vector).sqrt();
        if norm > f32::EPSILON {
            vector /= norm;
        }

        Some(EmbeddingResult {
            embedding: vector,
            cached: false,
        })
    }

    fn model_name(&self) -> &str {
        "hash-trigram"
    }

    fn dimension(&self) -> usize {
        self.dim
    }

    fn is_available(&self) -> bool {
        true
    }
}
