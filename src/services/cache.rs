use crate::models::EmbeddingVector;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// In-process embedding cache
///
/// Embeddings are deterministic per input text, so vectors are keyed by
/// model and normalised content. Only provider results are stored; fallback
/// vectors never enter the cache.
#[derive(Clone)]
pub struct EmbeddingCache {
    inner: Option<moka::future::Cache<String, Arc<EmbeddingVector>>>,
}

impl EmbeddingCache {
    /// Create a new cache. A capacity of zero disables caching.
    pub fn new(capacity: u64, ttl_secs: u64) -> Self {
        if capacity == 0 {
            return Self::disabled();
        }

        let inner = moka::future::CacheBuilder::new(capacity)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self { inner: Some(inner) }
    }

    pub fn disabled() -> Self {
        Self { inner: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.is_some()
    }

    pub async fn get(&self, key: &str) -> Option<Arc<EmbeddingVector>> {
        let cache = self.inner.as_ref()?;
        let hit = cache.get(key).await;
        if hit.is_some() {
            tracing::trace!("Embedding cache hit: {}", key);
        }
        hit
    }

    /// Return the cached vector for `key`, or run `init` and store its result
    ///
    /// Concurrent callers with the same key share one `init` evaluation.
    /// Errors are returned to every waiting caller and never cached. The flag
    /// is true when this call produced the value.
    pub async fn get_or_try_insert_with<F, E>(
        &self,
        key: String,
        init: F,
    ) -> Result<(Arc<EmbeddingVector>, bool), Arc<E>>
    where
        F: Future<Output = Result<Arc<EmbeddingVector>, E>>,
        E: Send + Sync + 'static,
    {
        let Some(cache) = &self.inner else {
            return init.await.map(|vector| (vector, true)).map_err(Arc::new);
        };

        let entry = cache.entry(key).or_try_insert_with(init).await?;
        if !entry.is_fresh() {
            tracing::trace!("Embedding cache hit: {}", entry.key());
        }
        let fresh = entry.is_fresh();
        Ok((entry.into_value(), fresh))
    }

    pub async fn insert(&self, key: String, vector: Arc<EmbeddingVector>) {
        if let Some(cache) = &self.inner {
            cache.insert(key, vector).await;
        }
    }

    pub fn invalidate_all(&self) {
        if let Some(cache) = &self.inner {
            cache.invalidate_all();
        }
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            enabled: self.is_enabled(),
            entries: self.inner.as_ref().map(|c| c.entry_count()).unwrap_or(0),
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    pub enabled: bool,
    pub entries: u64,
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    /// Build a cache key for an embedding of `text` under `model`
    pub fn embedding(model: &str, text: &str) -> String {
        format!("emb:{}:{}", model, text.trim())
    }
}
