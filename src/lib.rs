//! Rukna Match - guide and tourist matching for the Rukna marketplace
//!
//! Ranks local guides against a tourist's interests, either by cosine
//! similarity of provider embeddings or by keyword overlap. Ranking never
//! fails: provider outages degrade the result instead of surfacing errors.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{Matcher, MatchingStrategy, cosine_similarity, lexical_score};
pub use models::{InterestProfile, GuideCandidate, MatchResult, StrategyKind, FindMatchesRequest, FindMatchesResponse};
pub use services::{Embedder, EmbeddingProvider, EmbeddingCache, GeminiClient, ProviderError};
