use crate::models::EmbeddingVector;
use crate::services::cache::{CacheKey, EmbeddingCache};
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when calling an embedding provider
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Unauthorized: invalid API key")]
    Unauthorized,

    #[error("Rate limited by provider")]
    RateLimited,

    #[error("API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("Embedding request timed out")]
    Timeout,

    #[error("No API key configured")]
    MissingApiKey,
}

impl ProviderError {
    /// Short label used in logs and in `EmbeddingSource::Fallback`
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::Request(_) => "request",
            ProviderError::Unauthorized => "unauthorized",
            ProviderError::RateLimited => "rate_limited",
            ProviderError::Api { .. } => "api",
            ProviderError::InvalidResponse(_) => "invalid_response",
            ProviderError::Timeout => "timeout",
            ProviderError::MissingApiKey => "missing_api_key",
        }
    }
}

/// A text-to-vector embedding backend
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single text. Empty text is passed through unchanged.
    async fn embed(&self, text: &str) -> Result<EmbeddingVector, ProviderError>;

    /// Length of vectors produced by this provider
    fn dimensions(&self) -> usize;

    /// Model name, also used to namespace cache keys
    fn name(&self) -> &str;
}

/// Where an embedding came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingSource {
    Provider,
    Cache,
    /// Random substitute; carries the provider error kind
    Fallback(&'static str),
}

/// Result of an embed call. Always holds a vector.
#[derive(Debug, Clone)]
pub struct Embedding {
    pub vector: Arc<EmbeddingVector>,
    pub source: EmbeddingSource,
}

impl Embedding {
    pub fn is_degraded(&self) -> bool {
        matches!(self.source, EmbeddingSource::Fallback(_))
    }
}

/// Embedding Provider Adapter
///
/// Wraps a provider with a content cache and a per-call timeout. An embed
/// call never fails: on any provider error or timeout it returns a vector of
/// uniformly random values in [0, 1) and marks the result as degraded.
#[derive(Clone)]
pub struct Embedder {
    provider: Arc<dyn EmbeddingProvider>,
    cache: EmbeddingCache,
    timeout: Duration,
}

impl Embedder {
    pub fn new(provider: Arc<dyn EmbeddingProvider>, cache: EmbeddingCache, timeout: Duration) -> Self {
        Self {
            provider,
            cache,
            timeout,
        }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn cache(&self) -> &EmbeddingCache {
        &self.cache
    }

    /// Embed `text`, degrading to a random vector on failure
    ///
    /// Surrounding whitespace is trimmed before both the cache lookup and the
    /// provider call.
    pub async fn embed(&self, text: &str) -> Embedding {
        let text = text.trim();
        let key = CacheKey::embedding(self.provider.name(), text);
        let load = async {
            match tokio::time::timeout(self.timeout, self.provider.embed(text)).await {
                Ok(result) => result.map(Arc::new),
                Err(_) => Err(ProviderError::Timeout),
            }
        };

        match self.cache.get_or_try_insert_with(key, load).await {
            Ok((vector, fresh)) => Embedding {
                vector,
                source: if fresh { EmbeddingSource::Provider } else { EmbeddingSource::Cache },
            },
            Err(e) => {
                tracing::warn!(
                    provider = self.provider.name(),
                    kind = e.kind(),
                    "Embedding provider failed, using random fallback vector: {}",
                    e
                );
                Embedding {
                    vector: Arc::new(random_vector(self.provider.dimensions())),
                    source: EmbeddingSource::Fallback(e.kind()),
                }
            }
        }
    }

    /// Embed independent texts with at most `concurrency` calls in flight
    ///
    /// Output order matches input order. Identical texts in one batch share a
    /// single provider call when the cache is enabled.
    pub async fn embed_many(&self, texts: &[String], concurrency: usize) -> Vec<Embedding> {
        let calls: Vec<_> = texts.iter().map(|text| self.embed(text)).collect();
        stream::iter(calls)
            .buffered(concurrency.max(1))
            .collect()
            .await
    }
}

/// Vector of uniformly random components in [0, 1)
pub fn random_vector(dimensions: usize) -> EmbeddingVector {
    let mut rng = rand::thread_rng();
    (0..dimensions).map(|_| rng.gen::<f32>()).collect()
}
