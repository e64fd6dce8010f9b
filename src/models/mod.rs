// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{EmbeddingVector, InterestProfile, GuideCandidate, MatchResult, StrategyKind, MatchingLimits};
pub use requests::{FindMatchesRequest, RankGuidesRequest};
pub use responses::{FindMatchesResponse, HealthResponse, ErrorResponse};
