//! LRU cache for computed embeddings.
//!
//! Keys are SHA-256 digests of the input text so arbitrarily long terms
//! hash to fixed-size keys. Default: 1000 entries, 1-hour TTL. The
//! cache is advisory only; hits and misses never change the vectors a
//! caller observes.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use ndarray::Array1;
use parking_lot::Mutex;
use sha2::{Digest, Sha256};

use crate::embedder::{EmbedderBackend, EmbeddingResult};

fn cache_key(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}

struct CacheEntry {
    embedding: Array1<f32>,
    inserted_at: Instant,
}

/// Thread-safe LRU cache for embeddings.
pub struct EmbeddingCache {
    inner: Mutex<CacheInner>,
}

struct CacheInner {
    entries: HashMap<String, CacheEntry>,
    order: Vec<String>,
    max_size: usize,
    ttl: Duration,
}

impl EmbeddingCache {
    /// Create a new cache with the given capacity and TTL.
    pub fn new(max_size: usize, ttl: Duration) -> Self {
        Self {
            inner: Mutex::new(CacheInner {
                entries: HashMap::with_capacity(max_size),
                order: Vec::with_capacity(max_size),
                max_size,
                ttl,
            }),
        }
    }

    /// Create a cache with default settings (1000 entries, 1hr TTL).
    pub fn default_cache() -> Self {
        Self::new(1000, Duration::from_secs(3600))
    }

    /// Get a cached embedding. Returns None on miss or expired entry.
    pub fn get(&self, text: &str) -> Option<Array1<f32>> {
        let key = cache_key(text);
        let mut inner = self.inner.lock();

        let expired = inner
            .entries
            .get(&key)
            .map(|e| e.inserted_at.elapsed() >= inner.ttl);

        match expired {
            Some(false) => {
                let embedding = inner.entries.get(&key)?.embedding.clone();
                if let Some(pos) = inner.order.iter().position(|k| k == &key) {
                    let key = inner.order.remove(pos);
                    inner.order.push(key);
                }
                Some(embedding)
            }
            Some(true) => {
                inner.entries.remove(&key);
                inner.order.retain(|k| k != &key);
                None
            }
            None => None,
        }
    }

    /// Insert an embedding into the cache.
    pub fn put(&self, text: &str, embedding: Array1<f32>) {
        let key = cache_key(text);
        let mut inner = self.inner.lock();

        if inner.entries.contains_key(&key) {
            inner.entries.insert(
                key.clone(),
                CacheEntry {
                    embedding,
                    inserted_at: Instant::now(),
                },
            );
            inner.order.retain(|k| k != &key);
            inner.order.push(key);
            return;
        }

        // Evict oldest at capacity
        while inner.entries.len() >= inner.max_size && !inner.order.is_empty() {
            let oldest = inner.order.remove(0);
            inner.entries.remove(&oldest);
        }

        inner.order.push(key.clone());
        inner.entries.insert(
            key,
            CacheEntry {
                embedding,
                inserted_at: Instant::now(),
            },
        );
    }

    /// Number of entries in the cache.
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clear all entries.
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.entries.clear();
        inner.order.clear();
    }
}

/// Wraps any backend with an [`EmbeddingCache`].
pub struct CachingEmbedder<B> {
    backend: B,
    cache: EmbeddingCache,
}

impl<B: EmbedderBackend> CachingEmbedder<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            cache: EmbeddingCache::default_cache(),
        }
    }

    pub fn with_cache(backend: B, cache: EmbeddingCache) -> Self {
        Self { backend, cache }
    }
}

impl<B: EmbedderBackend> EmbedderBackend for CachingEmbedder<B> {
    fn embed(&self, text: &str) -> Option<EmbeddingResult> {
        if let Some(cached) = self.cache.get(text) {
            return Some(EmbeddingResult {
                embedding: cached,
                cached: true,
            });
        }
        let result = self.backend.embed(text)?;
        self.cache.put(text, result.embedding.clone());
        Some(result)
    }

    fn model_name(&self) -> &str {
        self.backend.model_name()
    }

    fn dimension(&self) -> usize {
        self.backend.dimension()
    }

    fn is_available(&self) -> bool {
        self.backend.is_available()
    }
}
