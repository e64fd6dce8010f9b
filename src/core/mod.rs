// Core algorithm exports
pub mod matcher;
pub mod overlap;
pub mod scoring;
pub mod similarity;

pub use matcher::{Matcher, RankedMatches, fallback_ranking};
pub use overlap::{shared_interests, lexical_score, explanation};
pub use scoring::{MatchingStrategy, EmbeddingSimilarityStrategy, LexicalOverlapStrategy};
pub use similarity::{cosine_similarity, similarity_to_score, ScoringError};
