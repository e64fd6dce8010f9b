// Service exports
pub mod cache;
pub mod embedder;
pub mod gemini;

pub use cache::{EmbeddingCache, CacheKey, CacheStats};
pub use embedder::{Embedder, Embedding, EmbeddingProvider, EmbeddingSource, ProviderError, random_vector};
pub use gemini::GeminiClient;
