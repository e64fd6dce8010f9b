use serde::{Deserialize, Serialize};
use validator::Validate;

/// Fixed-length semantic encoding of a text blob
pub type EmbeddingVector = Vec<f32>;

/// A tourist's stated interests for a single matching request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InterestProfile {
    pub interests: Vec<String>,
}

impl InterestProfile {
    pub fn new<I, S>(interests: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            interests: interests.into_iter().map(Into::into).collect(),
        }
    }

    /// Text sent to the embedding provider
    pub fn embedding_text(&self) -> String {
        self.interests.join(" ")
    }

    pub fn len(&self) -> usize {
        self.interests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interests.is_empty()
    }
}

/// A guide considered for matching. Never mutated by the matcher.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GuideCandidate {
    #[validate(length(min = 1))]
    pub id: String,
    #[serde(default)]
    pub specialties: Vec<String>,
    #[serde(default)]
    pub bio: Option<String>,
}

impl GuideCandidate {
    pub fn new<S: Into<String>>(id: S, specialties: Vec<String>, bio: Option<String>) -> Self {
        Self {
            id: id.into(),
            specialties,
            bio,
        }
    }

    /// Specialties followed by the bio, space separated.
    ///
    /// A missing bio is treated the same as an empty one.
    pub fn embedding_text(&self) -> String {
        let mut parts: Vec<&str> = self.specialties.iter().map(String::as_str).collect();
        parts.push(self.bio.as_deref().unwrap_or(""));
        parts.join(" ")
    }
}

/// Ranked match for one guide
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    #[serde(rename = "guideId")]
    pub guide_id: String,
    pub score: u8,
    #[serde(rename = "sharedInterests")]
    pub shared_interests: Vec<String>,
    pub explanation: String,
}

/// Which scorer ranks a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    /// Cosine similarity over provider embeddings
    #[default]
    Embedding,
    /// Keyword overlap ratio, no provider calls
    Lexical,
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StrategyKind::Embedding => write!(f, "embedding"),
            StrategyKind::Lexical => write!(f, "lexical"),
        }
    }
}

/// Matching limits
#[derive(Debug, Clone, Copy)]
pub struct MatchingLimits {
    /// Cap for `find_matches`
    pub max_results: usize,
    /// Parallel provider calls per request
    pub concurrency: usize,
}

impl Default for MatchingLimits {
    fn default() -> Self {
        Self {
            max_results: 5,
            concurrency: 8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matching_limits() {
        let limits = MatchingLimits::default();
        assert_eq!(limits.max_results, 5);
        assert_eq!(limits.concurrency, 8);
    }

    #[test]
    fn test_guide_embedding_text() {
        let guide = GuideCandidate::new(
            "g1",
            vec!["hiking".to_string(), "nature".to_string()],
            Some("Mountain guide".to_string()),
        );
        assert_eq!(guide.embedding_text(), "hiking nature Mountain guide");

        let no_bio = GuideCandidate::new("g2", vec!["cooking".to_string()], None);
        assert_eq!(no_bio.embedding_text(), "cooking ");
    }

    #[test]
    fn test_strategy_kind_serde() {
        let kind: StrategyKind = serde_json::from_str("\"lexical\"").unwrap();
        assert_eq!(kind, StrategyKind::Lexical);
        assert_eq!(StrategyKind::default(), StrategyKind::Embedding);
        assert_eq!(StrategyKind::Embedding.to_string(), "embedding");
    }
}
