use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::models::domain::{GuideCandidate, StrategyKind};

/// Request to find the best guides for a tourist
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FindMatchesRequest {
    #[serde(alias = "tourist_interests", rename = "touristInterests", default)]
    pub tourist_interests: Vec<String>,
    #[validate(nested)]
    #[serde(default)]
    pub guides: Vec<GuideCandidate>,
    #[serde(default)]
    pub strategy: Option<StrategyKind>,
    #[serde(default)]
    pub limit: Option<u16>,
}

/// Request to rank a discover listing by keyword overlap
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RankGuidesRequest {
    #[serde(alias = "tourist_interests", rename = "touristInterests", default)]
    pub tourist_interests: Vec<String>,
    #[validate(nested)]
    #[serde(default)]
    pub guides: Vec<GuideCandidate>,
    #[serde(default)]
    pub limit: Option<u16>,
}
